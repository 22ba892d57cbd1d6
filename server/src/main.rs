// tile_world/server/src/main.rs
use tile_world_core::core::config::WorldConfig;
use tile_world_core::operational::monitoring::metrics::{init_logging, LogFormat};
use tile_world_core::world::registry::WorldRegistry;

use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

fn load_config() -> anyhow::Result<WorldConfig> {
    match std::env::args().nth(1) {
        Some(path) => WorldConfig::from_yaml_file(&path)
            .with_context(|| format!("Failed to load world config from {}", path)),
        None => {
            info!("No config path given, using default Envir layout.");
            Ok(WorldConfig::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let log_format: LogFormat = std::env::var("TILE_WORLD_LOG_FORMAT")
        .unwrap_or_default()
        .parse()?;
    if let Err(e) = init_logging(log_format) {
        eprintln!("Failed to initialize logging: {:?}", e);
        return Err(e);
    }

    info!("Tile world starting up...");

    let config = load_config()?;
    info!("World configuration loaded. Maps dir: {}", config.maps_dir.display());

    let registry = Arc::new(WorldRegistry::new(config));
    let snapshot = registry
        .reload()
        .context("Initial world load failed")?;

    let mut maps: Vec<_> = snapshot.maps().collect();
    maps.sort_by(|a, b| a.id().cmp(b.id()));
    for map in maps {
        let walkable = map.walkable_count();
        if walkable == 0 {
            warn!("Map {} has no walkable tiles.", map.id());
        }
        info!(
            "Map {:<12} {:>5}x{:<5} walkable: {:>8}  mini map: {:<6} {}",
            map.id(),
            map.width(),
            map.height(),
            walkable,
            map.mini_map_id().unwrap_or("-"),
            map.description()
        );
    }

    let spawn = snapshot.spawn_point();
    info!(
        "Spawn point {} (walkable: {})",
        spawn,
        registry.can_walk(spawn)
    );
    info!("Tile world ready: {} maps loaded.", snapshot.map_count());
    Ok(())
}
