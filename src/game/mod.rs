pub mod types;
pub mod state;
pub mod map_utility;
pub mod graph;
