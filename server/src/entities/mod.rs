// tile_world/server/src/entities/mod.rs
pub mod world_object;
