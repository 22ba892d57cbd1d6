// tile_world/server/src/world/snapshot.rs
use crate::core::types::MapPoint;
use crate::world::tile_map::TileMap;
use std::collections::HashMap;
use std::sync::Arc;

/// A complete, internally consistent world: every loaded map plus the spawn
/// point. Never mutated after it is published; a reload replaces it whole.
#[derive(Debug)]
pub struct WorldSnapshot {
    maps: HashMap<String, Arc<TileMap>>,
    spawn_point: MapPoint,
}

impl WorldSnapshot {
    pub fn new(maps: HashMap<String, Arc<TileMap>>, spawn_point: MapPoint) -> Self {
        WorldSnapshot { maps, spawn_point }
    }

    pub fn map(&self, id: &str) -> Option<&Arc<TileMap>> {
        self.maps.get(id)
    }

    pub fn spawn_point(&self) -> &MapPoint {
        &self.spawn_point
    }

    pub fn maps(&self) -> impl Iterator<Item = &Arc<TileMap>> {
        self.maps.values()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    pub fn walkable_tile_count(&self) -> usize {
        self.maps.values().map(|m| m.walkable_count()).sum()
    }

    /// False for an unknown map or off-map coordinates.
    pub fn can_walk(&self, point: &MapPoint) -> bool {
        self.maps
            .get(point.map_id())
            .map_or(false, |map| map.can_walk(point.x, point.y))
    }
}
