// tile_world/server/src/operational/monitoring/mod.rs
pub mod metrics;
