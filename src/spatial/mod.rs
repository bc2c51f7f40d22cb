//! Hex geometry and pathfinding shared by both map layers

pub mod hex;
pub mod pathfinding;

pub use hex::{hex_distance, neighbor_of, HexDirection};
pub use pathfinding::{find_path, path_cost};
