// tile_world/server/src/world/mod.rs
pub mod config_file;
pub mod loader;
pub mod map_file;
pub mod registry;
pub mod snapshot;
pub mod tile_map;
