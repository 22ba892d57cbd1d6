// tile_world/server/src/world/loader.rs
//
// Builds a complete WorldSnapshot from the config sources and map files.
// Nothing here touches the live registry; a failure simply drops the staging
// data.

use crate::core::config::WorldConfig;
use crate::core::constants::{MAP_LIST_COLUMNS, MINI_MAP_COLUMNS, START_POINT_COLUMNS};
use crate::core::error::{WorldError, WorldResult};
use crate::core::types::MapPoint;
use crate::world::config_file::{load_records, ConfigRecord};
use crate::world::map_file::read_map_file;
use crate::world::snapshot::WorldSnapshot;
use crate::world::tile_map::TileMap;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapListEntry {
    pub id: String,
    pub description: String,
}

pub fn load_snapshot(config: &WorldConfig) -> WorldResult<WorldSnapshot> {
    let entries = read_map_list(&config.map_list_file)?;
    info!("Map list {} names {} maps", config.map_list_file.display(), entries.len());

    let mut maps = decode_maps(config, &entries)?;
    apply_mini_maps(&config.mini_map_file, &mut maps)?;
    let spawn_point = read_spawn_point(&config.start_point_file, &maps)?;

    let maps = maps
        .into_iter()
        .map(|(id, map)| (id, Arc::new(map)))
        .collect();
    Ok(WorldSnapshot::new(maps, spawn_point))
}

pub fn read_map_list(path: &Path) -> WorldResult<Vec<MapListEntry>> {
    map_list_from_records(load_records(path, MAP_LIST_COLUMNS)?, path)
}

fn map_list_from_records(records: Vec<ConfigRecord>, path: &Path) -> WorldResult<Vec<MapListEntry>> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let id = record.field(0).to_owned();
        if !seen.insert(id.clone()) {
            return Err(WorldError::ConfigInconsistency(format!(
                "map id {} is listed more than once ({} line {})",
                id,
                path.display(),
                record.line
            )));
        }
        entries.push(MapListEntry {
            id,
            description: record.field(1).to_owned(),
        });
    }
    Ok(entries)
}

/// Decodes every listed map on the rayon pool. Reports the first failure in
/// list order.
pub fn decode_maps(config: &WorldConfig, entries: &[MapListEntry]) -> WorldResult<HashMap<String, TileMap>> {
    let decoded: Vec<WorldResult<TileMap>> = entries
        .par_iter()
        .map(|entry| -> WorldResult<TileMap> {
            let data = read_map_file(&config.map_file_path(&entry.id))?;
            TileMap::from_file_data(entry.id.clone(), entry.description.clone(), data)
        })
        .collect();

    let mut maps = HashMap::with_capacity(decoded.len());
    for result in decoded {
        let map = result?;
        debug!(
            "Loaded map {} ({}x{}, {} walkable tiles)",
            map.id(),
            map.width(),
            map.height(),
            map.walkable_count()
        );
        maps.insert(map.id().to_owned(), map);
    }
    Ok(maps)
}

pub fn apply_mini_maps(path: &Path, maps: &mut HashMap<String, TileMap>) -> WorldResult<()> {
    for record in load_records(path, MINI_MAP_COLUMNS)? {
        let map_id = record.field(0);
        let map = maps.get_mut(map_id).ok_or_else(|| {
            WorldError::ConfigInconsistency(format!(
                "mini map entry references unknown map {} ({} line {})",
                map_id,
                path.display(),
                record.line
            ))
        })?;
        if let Some(previous) = map.set_mini_map_id(record.field(1).to_owned()) {
            warn!("Mini map for {} reassigned from {} to {}", map_id, previous, record.field(1));
        }
    }
    Ok(())
}

/// Uses the first spawn record only; later lines are not validated.
pub fn read_spawn_point(path: &Path, maps: &HashMap<String, TileMap>) -> WorldResult<MapPoint> {
    let records = load_records(path, 1)?;
    let record = records.first().ok_or_else(|| {
        WorldError::ConfigInconsistency(format!("no spawn point configured in {}", path.display()))
    })?;
    if record.fields.len() < START_POINT_COLUMNS {
        return Err(WorldError::ConfigError(format!(
            "{} line {}: expected {} columns, found {}",
            path.display(),
            record.line,
            START_POINT_COLUMNS,
            record.fields.len()
        )));
    }
    if records.len() > 1 {
        debug!("Ignoring {} extra spawn records in {}", records.len() - 1, path.display());
    }

    let map_id = record.field(0);
    let map = maps.get(map_id).ok_or_else(|| {
        WorldError::ConfigInconsistency(format!(
            "spawn point references unknown map {} ({} line {})",
            map_id,
            path.display(),
            record.line
        ))
    })?;

    let x = parse_coordinate(record, 1, path)?;
    let y = parse_coordinate(record, 2, path)?;
    if !map.can_walk(x, y) {
        warn!(
            "Spawn point {}:{},{} is not a walkable tile of a {}x{} map",
            map_id,
            x,
            y,
            map.width(),
            map.height()
        );
    }
    Ok(MapPoint::with_map(map.shared_id(), x, y))
}

fn parse_coordinate(record: &ConfigRecord, idx: usize, path: &Path) -> WorldResult<u16> {
    let raw = record.field(idx);
    raw.parse::<u16>().map_err(|e| {
        WorldError::MalformedData(format!(
            "bad spawn coordinate {:?} ({} line {}): {}",
            raw,
            path.display(),
            record.line,
            e
        ))
    })
}
