// tile_world/server/src/operational/mod.rs
pub mod monitoring;
