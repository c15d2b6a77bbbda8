//! Movement graph and shortest paths.
//!
//! One vertex per flattened position, a directed edge of weight 1 towards
//! every walkable cardinal neighbour. The graph only reflects the obstacles of
//! the snapshot it was built from; [`GraphCache`] decides when to rebuild it.

use log::debug;
use pathfinding::prelude::dijkstra;
use thiserror::Error;
use uuid::Uuid;

use crate::game::map_utility::MapUtility;
use crate::game::types::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("no path from {from} to {to}")]
    Unreachable { from: usize, to: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    to: usize,
    weight: u32,
}

/// Result of a successful shortest-path query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestPath {
    pub distance: u32,
    /// Positions from source to destination, both included.
    pub path: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    /// Builds the movement graph of the snapshot behind `utility`.
    pub fn build(utility: &MapUtility<'_>) -> Self {
        let size = utility.map().size();
        let adjacency = (0..size)
            .map(|position| {
                let coordinate = utility.coordinate_of(position);
                Action::MOVEMENTS
                    .into_iter()
                    .map(|action| utility.translate(action, coordinate))
                    .filter(|&neighbour| utility.is_walkable(neighbour))
                    .map(|neighbour| Edge {
                        to: utility.position_of(neighbour),
                        weight: 1,
                    })
                    .collect()
            })
            .collect();
        Self { adjacency }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Neighbours reachable in one step from `position`.
    pub fn neighbours(&self, position: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency
            .get(position)
            .into_iter()
            .flatten()
            .map(|edge| edge.to)
    }

    /// Dijkstra from `from` to `to`.
    pub fn shortest(&self, from: usize, to: usize) -> Result<BestPath, PathError> {
        if from >= self.vertex_count() || to >= self.vertex_count() {
            return Err(PathError::Unreachable { from, to });
        }

        let successors = |&vertex: &usize| {
            self.adjacency[vertex]
                .iter()
                .map(|edge| (edge.to, edge.weight))
                .collect::<Vec<_>>()
        };
        let (path, distance) =
            dijkstra(&from, successors, |&vertex| vertex == to).ok_or(PathError::Unreachable { from, to })?;

        Ok(BestPath { distance, path })
    }
}

/// Identifies the obstacle layout a graph was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GraphKey {
    game_id: Uuid,
    width: usize,
    height: usize,
    obstacles: Vec<usize>,
}

/// Graph cache owned by a strategy.
///
/// The cached graph is rebuilt when the game, the grid dimensions or the set
/// of obstacle positions differs from the snapshot it was built from. Players
/// and power-ups never block movement, so they do not invalidate the graph.
#[derive(Debug, Default)]
pub struct GraphCache {
    cached: Option<(GraphKey, Graph)>,
    builds: usize,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph matching the snapshot behind `utility`, rebuilding if needed.
    pub fn graph_for(&mut self, game_id: Uuid, utility: &MapUtility<'_>) -> &Graph {
        let map = utility.map();
        let mut obstacles = map.obstacle_positions.clone();
        obstacles.sort_unstable();
        obstacles.dedup();
        let key = GraphKey {
            game_id,
            width: map.width,
            height: map.height,
            obstacles,
        };

        let entry = match self.cached.take() {
            Some((cached_key, graph)) if cached_key == key => (cached_key, graph),
            _ => {
                debug!("[Graph] Building graph {}x{} for game {}", map.width, map.height, game_id);
                self.builds += 1;
                (key, Graph::build(utility))
            }
        };
        &self.cached.insert(entry).1
    }

    /// Drops the cached graph, forcing a rebuild on next use.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Number of graphs built since creation.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{CharacterInfo, Map};
    use crate::game::types::Coordinate;

    fn open_map(me: Uuid, width: usize, height: usize) -> Map {
        Map {
            width,
            height,
            character_infos: vec![CharacterInfo::new(me, 0)],
            ..Map::default()
        }
    }

    #[test]
    fn test_open_grid_corner_to_corner() {
        let me = Uuid::new_v4();
        let map = open_map(me, 5, 5);
        let utility = MapUtility::new(&map, me).unwrap();
        let graph = Graph::build(&utility);

        let best = graph.shortest(0, 24).unwrap();
        assert_eq!(best.distance, 8);
        assert_eq!(best.path.len(), 9);
        assert_eq!(best.path.first(), Some(&0));
        assert_eq!(best.path.last(), Some(&24));
        for step in best.path.windows(2) {
            let (a, b) = (utility.coordinate_of(step[0]), utility.coordinate_of(step[1]));
            assert_eq!(a.manhattan_distance(b), 1);
        }
        assert_eq!(utility.distance_to(&graph, Coordinate::new(4, 4)), Ok(8));
    }

    #[test]
    fn test_obstacle_row_splits_grid() {
        let me = Uuid::new_v4();
        let mut map = open_map(me, 5, 5);
        map.obstacle_positions = (10..15).collect();
        let utility = MapUtility::new(&map, me).unwrap();
        let graph = Graph::build(&utility);

        assert_eq!(graph.shortest(0, 24), Err(PathError::Unreachable { from: 0, to: 24 }));
        assert!(utility.shortest_path_to(&graph, Coordinate::new(4, 4)).is_err());
    }

    #[test]
    fn test_edges_skip_obstacles_and_grid_edges() {
        let me = Uuid::new_v4();
        let mut map = open_map(me, 3, 3);
        map.obstacle_positions = vec![1];
        let utility = MapUtility::new(&map, me).unwrap();
        let graph = Graph::build(&utility);

        assert_eq!(graph.vertex_count(), 9);
        assert_eq!(graph.neighbours(0).collect::<Vec<_>>(), vec![3]);
        let mut centre: Vec<_> = graph.neighbours(4).collect();
        centre.sort_unstable();
        assert_eq!(centre, vec![3, 5, 7]);
        assert_eq!(graph.neighbours(42).count(), 0);
    }

    #[test]
    fn test_detour_around_wall() {
        let me = Uuid::new_v4();
        let mut map = open_map(me, 5, 5);
        // Wall in column 2 except the bottom row.
        map.obstacle_positions = vec![2, 7, 12, 17];
        let utility = MapUtility::new(&map, me).unwrap();
        let graph = Graph::build(&utility);

        let best = graph.shortest(0, 4).unwrap();
        assert_eq!(best.distance, 12);
        assert!(best.path.contains(&22));
    }

    #[test]
    fn test_path_to_own_position() {
        let me = Uuid::new_v4();
        let map = open_map(me, 3, 3);
        let utility = MapUtility::new(&map, me).unwrap();
        let graph = Graph::build(&utility);

        assert_eq!(graph.shortest(4, 4), Ok(BestPath { distance: 0, path: vec![4] }));
        assert_eq!(graph.shortest(3, 4), Ok(BestPath { distance: 1, path: vec![3, 4] }));
    }

    #[test]
    fn test_absent_vertices_are_unreachable() {
        let graph = Graph::default();
        assert_eq!(graph.shortest(0, 0), Err(PathError::Unreachable { from: 0, to: 0 }));
    }

    #[test]
    fn test_rebuilt_graph_gives_same_paths() {
        let me = Uuid::new_v4();
        let mut map = open_map(me, 6, 4);
        map.obstacle_positions = vec![2, 8, 9, 15];
        let utility = MapUtility::new(&map, me).unwrap();

        let first = Graph::build(&utility);
        let second = Graph::build(&utility);
        assert_eq!(first, second);
        assert_eq!(first.shortest(0, 23), second.shortest(0, 23));
    }

    #[test]
    fn test_cache_rebuild_policy() {
        let me = Uuid::new_v4();
        let game = Uuid::new_v4();
        let mut cache = GraphCache::new();

        let mut map = open_map(me, 4, 4);
        map.obstacle_positions = vec![5, 6];
        cache.graph_for(game, &MapUtility::new(&map, me).unwrap());
        assert_eq!(cache.builds(), 1);

        // Players and power-ups moving around keep the graph.
        map.character_infos[0].position = 3;
        map.power_up_positions = vec![10];
        map.obstacle_positions = vec![6, 5];
        cache.graph_for(game, &MapUtility::new(&map, me).unwrap());
        assert_eq!(cache.builds(), 1);

        // New obstacle.
        map.obstacle_positions.push(9);
        let graph = cache.graph_for(game, &MapUtility::new(&map, me).unwrap());
        assert_eq!(graph.neighbours(8).count(), 2);
        assert_eq!(cache.builds(), 2);

        // New game with the same layout.
        cache.graph_for(Uuid::new_v4(), &MapUtility::new(&map, me).unwrap());
        assert_eq!(cache.builds(), 3);

        cache.invalidate();
        cache.graph_for(game, &MapUtility::new(&map, me).unwrap());
        assert_eq!(cache.builds(), 4);
    }
}
