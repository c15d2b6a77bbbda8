use serde::{Serialize, Deserialize};
use uuid::Uuid;

/// Grid snapshot sent by the server on every tick.
///
/// Cells are addressed by flattened position (`y * width + x`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    pub world_tick: u32,
    pub character_infos: Vec<CharacterInfo>,
    pub power_up_positions: Vec<usize>,
    pub obstacle_positions: Vec<usize>,
}

impl Map {
    /// Number of cells in the grid.
    pub fn size(&self) -> usize {
        self.width * self.height
    }
}

/// A player as seen in one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInfo {
    #[serde(default)]
    pub name: String,
    pub id: Uuid,
    #[serde(default)]
    pub points: i32,
    pub position: usize,
    #[serde(default)]
    pub coloured_positions: Vec<usize>,
    #[serde(default)]
    pub stunned_for_game_ticks: u32,
    #[serde(default)]
    pub carrying_power_up: bool,
}

impl CharacterInfo {
    pub fn new(id: Uuid, position: usize) -> Self {
        Self {
            name: String::new(),
            id,
            points: 0,
            position,
            coloured_positions: Vec::new(),
            stunned_for_game_ticks: 0,
            carrying_power_up: false,
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned_for_game_ticks > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_decodes_server_field_names() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"width":3,"height":2,"worldTick":7,
                "characterInfos":[{{"name":"bot","id":"{id}","points":4,"position":5,
                    "colouredPositions":[4,5],"stunnedForGameTicks":2,"carryingPowerUp":true}}],
                "powerUpPositions":[1],"obstaclePositions":[0],"collisionInfos":[],"explosionInfos":[]}}"#
        );
        let map: Map = serde_json::from_str(&json).unwrap();
        assert_eq!(map.size(), 6);
        assert_eq!(map.world_tick, 7);
        assert_eq!(map.power_up_positions, vec![1]);
        assert_eq!(map.obstacle_positions, vec![0]);
        let me = &map.character_infos[0];
        assert_eq!(me.id, id);
        assert_eq!(me.coloured_positions, vec![4, 5]);
        assert!(me.is_stunned());
        assert!(me.carrying_power_up);
    }
}
