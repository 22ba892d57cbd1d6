// tile_world/server/src/concurrent/mod.rs
pub mod spatial_index;
