//! Example strategy: walk to the closest power-up, detonate when someone is in range.

use log::{debug, warn};

use crate::client::messages::MapUpdateEvent;
use crate::game::graph::GraphCache;
use crate::game::map_utility::MapUtility;
use crate::game::types::{Action, Coordinate, GameSettings};
use crate::strategy::Strategy;

#[derive(Debug, Default)]
pub struct PowerUpHunter {
    graph_cache: GraphCache,
}

impl PowerUpHunter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph_cache(&self) -> &GraphCache {
        &self.graph_cache
    }
}

/// First legal cardinal move, or stay.
fn fallback_move(utility: &MapUtility<'_>) -> Action {
    Action::MOVEMENTS
        .into_iter()
        .find(|&action| utility.can_move(action))
        .unwrap_or(Action::Stay)
}

impl Strategy for PowerUpHunter {
    fn calculate_move(&mut self, settings: &GameSettings, event: &MapUpdateEvent) -> Action {
        let Some(player_id) = event.receiving_player_id else {
            warn!("[Strategy] Map update without receiving player, staying");
            return Action::Stay;
        };
        let utility = match MapUtility::new(&event.map, player_id) {
            Ok(utility) => utility,
            Err(e) => {
                warn!("[Strategy] {}, staying", e);
                return Action::Stay;
            }
        };
        let graph = self.graph_cache.graph_for(event.game_id, &utility);
        let me = utility.me();

        if me.is_stunned() {
            return Action::Stay;
        }

        if me.carrying_power_up && utility.is_any_player_within_explosion_range(graph, settings.explosion_range) {
            debug!("[Strategy] Player within explosion range, detonating");
            return Action::Explode;
        }

        let closest: Option<(Coordinate, u32)> = utility
            .power_up_coordinates()
            .into_iter()
            .filter_map(|coordinate| match utility.distance_to(graph, coordinate) {
                Ok(distance) => Some((coordinate, distance)),
                Err(e) => {
                    debug!("[Strategy] {}", e);
                    None
                }
            })
            .min_by_key(|&(_, distance)| distance);

        let Some((target, distance)) = closest else {
            return fallback_move(&utility);
        };

        // Already carrying one: detonate rather than waste the next pickup.
        if distance == 1 && me.carrying_power_up {
            return Action::Explode;
        }

        match utility.shortest_path_to(graph, target) {
            Ok(path) if path.len() > 1 => utility.direction_to(path[1]),
            Ok(_) => fallback_move(&utility),
            Err(e) => {
                warn!("[Strategy] {}", e);
                fallback_move(&utility)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{CharacterInfo, Map};
    use uuid::Uuid;

    fn event(me: CharacterInfo, others: Vec<CharacterInfo>, map: Map) -> MapUpdateEvent {
        let receiving_player_id = Some(me.id);
        let mut character_infos = vec![me];
        character_infos.extend(others);
        MapUpdateEvent {
            receiving_player_id,
            game_id: Uuid::from_u128(7),
            game_tick: 1,
            map: Map { character_infos, ..map },
        }
    }

    fn settings() -> GameSettings {
        GameSettings { explosion_range: 2, ..GameSettings::default() }
    }

    #[test]
    fn test_walks_towards_closest_power_up() {
        let me = CharacterInfo::new(Uuid::new_v4(), 0);
        // 5x5, power-ups at (2,0) and (0,4); the wall at (1,0) forces a detour to the first.
        let map = Map {
            width: 5,
            height: 5,
            power_up_positions: vec![2, 20],
            obstacle_positions: vec![1],
            ..Map::default()
        };
        let mut hunter = PowerUpHunter::new();
        assert_eq!(hunter.calculate_move(&settings(), &event(me, vec![], map)), Action::Down);
    }

    #[test]
    fn test_stunned_player_stays() {
        let mut me = CharacterInfo::new(Uuid::new_v4(), 0);
        me.stunned_for_game_ticks = 2;
        let map = Map { width: 3, height: 3, power_up_positions: vec![1], ..Map::default() };
        let mut hunter = PowerUpHunter::new();
        assert_eq!(hunter.calculate_move(&settings(), &event(me, vec![], map)), Action::Stay);
    }

    #[test]
    fn test_detonates_when_enemy_in_range() {
        let mut me = CharacterInfo::new(Uuid::new_v4(), 0);
        me.carrying_power_up = true;
        let enemy = CharacterInfo::new(Uuid::new_v4(), 2);
        let map = Map { width: 5, height: 5, ..Map::default() };
        let mut hunter = PowerUpHunter::new();
        assert_eq!(hunter.calculate_move(&settings(), &event(me, vec![enemy], map)), Action::Explode);
    }

    #[test]
    fn test_enemy_out_of_range_is_ignored() {
        let mut me = CharacterInfo::new(Uuid::new_v4(), 0);
        me.carrying_power_up = true;
        let enemy = CharacterInfo::new(Uuid::new_v4(), 24);
        let map = Map { width: 5, height: 5, power_up_positions: vec![10], ..Map::default() };
        let mut hunter = PowerUpHunter::new();
        assert_eq!(hunter.calculate_move(&settings(), &event(me, vec![enemy], map)), Action::Down);
    }

    #[test]
    fn test_unreachable_power_up_falls_back_to_legal_move() {
        let me = CharacterInfo::new(Uuid::new_v4(), 0);
        // Power-up walled off in the bottom row.
        let map = Map {
            width: 3,
            height: 3,
            power_up_positions: vec![8],
            obstacle_positions: vec![3, 4, 5],
            ..Map::default()
        };
        let mut hunter = PowerUpHunter::new();
        let action = hunter.calculate_move(&settings(), &event(me, vec![], map));
        assert_eq!(action, Action::Right);
    }

    #[test]
    fn test_unknown_player_stays() {
        let me = CharacterInfo::new(Uuid::new_v4(), 0);
        let mut update = event(me, vec![], Map { width: 3, height: 3, ..Map::default() });
        update.receiving_player_id = Some(Uuid::new_v4());
        let mut hunter = PowerUpHunter::new();
        assert_eq!(hunter.calculate_move(&settings(), &update), Action::Stay);
    }

    #[test]
    fn test_graph_is_reused_between_ticks() {
        let id = Uuid::new_v4();
        let map = Map { width: 4, height: 4, power_up_positions: vec![15], obstacle_positions: vec![5], ..Map::default() };
        let mut hunter = PowerUpHunter::new();
        for position in [0, 1, 2] {
            let update = event(CharacterInfo::new(id, position), vec![], map.clone());
            hunter.calculate_move(&settings(), &update);
        }
        assert_eq!(hunter.graph_cache().builds(), 1);
    }
}
