//! Map utility.
//!
//! Read-only view over one [`Map`] snapshot from the point of view of the
//! current player: coordinate conversion, tile classification, move legality
//! and shortest-path queries against a prebuilt [`Graph`].

use thiserror::Error;
use uuid::Uuid;

use crate::game::graph::Graph;
use crate::game::state::{CharacterInfo, Map};
use crate::game::types::{Action, Coordinate, Tile};

/// Recoverable failures surfaced to the strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("player {0} is not part of the snapshot")]
    UnknownPlayer(Uuid),
    #[error("coordinates are unreachable: ({}, {})", .0.x, .0.y)]
    Unreachable(Coordinate),
}

pub struct MapUtility<'a> {
    map: &'a Map,
    current_player: usize,
}

impl<'a> MapUtility<'a> {
    /// Fails if `current_player_id` has no character in the snapshot.
    pub fn new(map: &'a Map, current_player_id: Uuid) -> Result<Self, MapError> {
        let current_player = map
            .character_infos
            .iter()
            .position(|c| c.id == current_player_id)
            .ok_or(MapError::UnknownPlayer(current_player_id))?;
        Ok(Self { map, current_player })
    }

    pub fn map(&self) -> &'a Map {
        self.map
    }

    /// Information about the current player.
    pub fn me(&self) -> &'a CharacterInfo {
        &self.map.character_infos[self.current_player]
    }

    /// Information about any player in the snapshot.
    pub fn character(&self, player_id: Uuid) -> Option<&'a CharacterInfo> {
        self.map.character_infos.iter().find(|c| c.id == player_id)
    }

    pub fn my_coordinate(&self) -> Coordinate {
        self.coordinate_of(self.me().position)
    }

    /// Converts a flattened position to a coordinate.
    pub fn coordinate_of(&self, position: usize) -> Coordinate {
        let width = self.map.width.max(1);
        Coordinate {
            x: (position % width) as i32,
            y: (position / width) as i32,
        }
    }

    /// Converts a coordinate to a flattened position.
    ///
    /// Only meaningful for coordinates inside the grid.
    pub fn position_of(&self, coordinate: Coordinate) -> usize {
        (coordinate.y as i64 * self.map.width as i64 + coordinate.x as i64) as usize
    }

    pub fn coordinates_of(&self, positions: &[usize]) -> Vec<Coordinate> {
        positions.iter().map(|&p| self.coordinate_of(p)).collect()
    }

    pub fn positions_of(&self, coordinates: &[Coordinate]) -> Vec<usize> {
        coordinates.iter().map(|&c| self.position_of(c)).collect()
    }

    pub fn is_out_of_bounds(&self, coordinate: Coordinate) -> bool {
        coordinate.x < 0
            || coordinate.y < 0
            || coordinate.x as i64 >= self.map.width as i64
            || coordinate.y as i64 >= self.map.height as i64
    }

    /// Type of object at the given coordinate. Out of bounds reads as an obstacle.
    pub fn tile_at(&self, coordinate: Coordinate) -> Tile {
        if self.is_out_of_bounds(coordinate) {
            return Tile::Obstacle;
        }
        self.tile_at_position(self.position_of(coordinate))
    }

    fn tile_at_position(&self, position: usize) -> Tile {
        if self.map.obstacle_positions.contains(&position) {
            Tile::Obstacle
        } else if self.map.power_up_positions.contains(&position) {
            Tile::PowerUp
        } else if self.map.character_infos.iter().any(|c| c.position == position) {
            Tile::Player
        } else {
            Tile::Open
        }
    }

    pub fn is_walkable(&self, coordinate: Coordinate) -> bool {
        self.tile_at(coordinate).is_walkable()
    }

    /// Coordinate reached after performing `action` from `coordinate`.
    pub fn translate(&self, action: Action, coordinate: Coordinate) -> Coordinate {
        let Coordinate { x, y } = coordinate;
        match action {
            Action::Left => Coordinate::new(x - 1, y),
            Action::Right => Coordinate::new(x + 1, y),
            Action::Up => Coordinate::new(x, y - 1),
            Action::Down => Coordinate::new(x, y + 1),
            Action::Stay | Action::Explode => coordinate,
        }
    }

    /// Whether the current player can perform `action`, assuming nobody else moves.
    pub fn can_move(&self, action: Action) -> bool {
        let me = self.me();
        if me.is_stunned() {
            return false;
        }
        match action {
            Action::Explode => me.carrying_power_up,
            Action::Stay => true,
            _ => self.is_walkable(self.translate(action, self.my_coordinate())),
        }
    }

    pub fn power_up_coordinates(&self) -> Vec<Coordinate> {
        self.coordinates_of(&self.map.power_up_positions)
    }

    pub fn obstacle_coordinates(&self) -> Vec<Coordinate> {
        self.coordinates_of(&self.map.obstacle_positions)
    }

    /// Coordinates coloured by the given player, empty if the player is unknown.
    pub fn coordinates_coloured_by(&self, player_id: Uuid) -> Vec<Coordinate> {
        self.character(player_id)
            .map(|c| self.coordinates_of(&c.coloured_positions))
            .unwrap_or_default()
    }

    /// Player owning the colour of a tile, if any.
    pub fn coloured_by(&self, coordinate: Coordinate) -> Option<&'a CharacterInfo> {
        if self.is_out_of_bounds(coordinate) {
            return None;
        }
        let position = self.position_of(coordinate);
        self.map
            .character_infos
            .iter()
            .find(|c| c.coloured_positions.contains(&position))
    }

    pub fn player_positions(&self) -> Vec<usize> {
        self.map.character_infos.iter().map(|c| c.position).collect()
    }

    /// Cardinal move from the current player to an adjacent position.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not a cardinal neighbour of the current player.
    pub fn direction_to(&self, position: usize) -> Action {
        let target = self.coordinate_of(position);
        let me = self.my_coordinate();
        Action::MOVEMENTS
            .into_iter()
            .find(|&action| self.translate(action, me) == target)
            .unwrap_or_else(|| {
                panic!(
                    "position {} ({}, {}) is not a neighbour of ({}, {})",
                    position, target.x, target.y, me.x, me.y
                )
            })
    }

    /// Shortest path from the current player to `destination`, source included.
    pub fn shortest_path_to(&self, graph: &Graph, destination: Coordinate) -> Result<Vec<usize>, MapError> {
        let to = self.reachable_position(destination)?;
        graph
            .shortest(self.me().position, to)
            .map(|best| best.path)
            .map_err(|_| MapError::Unreachable(destination))
    }

    /// Number of steps from the current player to `destination`.
    pub fn distance_to(&self, graph: &Graph, destination: Coordinate) -> Result<u32, MapError> {
        let to = self.reachable_position(destination)?;
        graph
            .shortest(self.me().position, to)
            .map(|best| best.distance)
            .map_err(|_| MapError::Unreachable(destination))
    }

    /// True if another player can be reached within `range` steps.
    pub fn is_any_player_within_explosion_range(&self, graph: &Graph, range: u32) -> bool {
        let me = self.me();
        self.map
            .character_infos
            .iter()
            .filter(|c| c.id != me.id)
            .filter_map(|c| self.distance_to(graph, self.coordinate_of(c.position)).ok())
            .any(|distance| distance <= range)
    }

    fn reachable_position(&self, destination: Coordinate) -> Result<usize, MapError> {
        if self.is_out_of_bounds(destination) || !self.is_walkable(destination) {
            return Err(MapError::Unreachable(destination));
        }
        Ok(self.position_of(destination))
    }
}
