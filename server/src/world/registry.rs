// tile_world/server/src/world/registry.rs
use crate::core::config::WorldConfig;
use crate::core::error::WorldResult;
use crate::core::types::MapPoint;
use crate::entities::world_object::{ObjectRef, WorldObject};
use crate::operational::monitoring::metrics::WorldMetrics;
use crate::world::loader::load_snapshot;
use crate::world::snapshot::WorldSnapshot;
use crate::world::tile_map::TileMap;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The live world. Starts Unloaded; every successful `reload` publishes a new
/// snapshot with one atomic pointer swap.
///
/// Readers holding an older snapshot keep using it until they drop it. Objects
/// registered on the old snapshot's tiles are not carried over, so game logic
/// re-places its entities after a reload.
pub struct WorldRegistry {
    config: WorldConfig,
    current: ArcSwapOption<WorldSnapshot>,
    reload_lock: Mutex<()>,
    metrics: WorldMetrics,
}

impl WorldRegistry {
    pub fn new(config: WorldConfig) -> Self {
        WorldRegistry {
            config,
            current: ArcSwapOption::empty(),
            reload_lock: Mutex::new(()),
            metrics: WorldMetrics::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Rebuilds the world from disk and publishes it. On any failure the
    /// previously published snapshot (or the Unloaded state) is left as is.
    /// Concurrent callers are serialized.
    pub fn reload(&self) -> WorldResult<Arc<WorldSnapshot>> {
        let _guard = self.reload_lock.lock();
        let started = Instant::now();
        info!("Reloading world from {}", self.config.map_list_file.display());

        match load_snapshot(&self.config) {
            Ok(snapshot) => {
                let published = self.store(snapshot);
                self.metrics.record_reload(
                    started.elapsed(),
                    published.map_count(),
                    published.walkable_tile_count(),
                );
                info!(
                    "World reloaded: {} maps, spawn point {} (took {:?})",
                    published.map_count(),
                    published.spawn_point(),
                    started.elapsed()
                );
                Ok(published)
            }
            Err(e) => {
                self.metrics.record_reload_failure(started.elapsed());
                error!("World reload failed, keeping previous world: {}", e);
                Err(e)
            }
        }
    }

    /// Publishes a prebuilt snapshot, serialized with `reload`. None of the
    /// loader's cross-reference checks run here.
    pub(crate) fn publish(&self, snapshot: WorldSnapshot) -> Arc<WorldSnapshot> {
        let _guard = self.reload_lock.lock();
        self.store(snapshot)
    }

    fn store(&self, snapshot: WorldSnapshot) -> Arc<WorldSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.current.store(Some(snapshot.clone()));
        snapshot
    }

    pub fn is_loaded(&self) -> bool {
        self.with_snapshot(|_| ()).is_some()
    }

    /// The live snapshot, for callers that need several queries to agree.
    pub fn snapshot(&self) -> Option<Arc<WorldSnapshot>> {
        self.current.load_full()
    }

    pub fn get_map(&self, map_id: &str) -> Option<Arc<TileMap>> {
        self.with_snapshot(|snapshot| snapshot.map(map_id).cloned())
            .flatten()
    }

    pub fn spawn_point(&self) -> Option<MapPoint> {
        self.with_snapshot(|snapshot| snapshot.spawn_point().clone())
    }

    /// Movement legality: false when unloaded, for unknown maps and off-map
    /// coordinates.
    pub fn can_walk(&self, point: &MapPoint) -> bool {
        self.with_snapshot(|snapshot| snapshot.can_walk(point))
            .unwrap_or(false)
    }

    /// Registers `object` on the tile at its current position. Returns false
    /// (and changes nothing) for an unknown map or off-map coordinates.
    pub fn put_object(&self, object: &ObjectRef) -> bool {
        let position = object.position();
        self.with_map(position.map_id(), |map| map.put_object(object))
    }

    /// Removes `object` from the tile at its current position. Removing an
    /// object that is not there is a no-op.
    pub fn remove_object(&self, object: &dyn WorldObject) -> bool {
        let position = object.position();
        self.with_map(position.map_id(), |map| map.remove_object(object))
    }

    /// `TileMap::objects_in_rect` on the live snapshot's map; empty for an
    /// unknown map.
    pub fn objects_in_rect_on(
        &self,
        map_id: &str,
        start_x: i32,
        width: i32,
        start_y: i32,
        height: i32,
    ) -> Vec<ObjectRef> {
        self.get_map(map_id)
            .map(|map| map.objects_in_rect(start_x, width, start_y, height))
            .unwrap_or_default()
    }

    pub fn random_walkable_point(&self, map_id: &str) -> Option<MapPoint> {
        self.get_map(map_id)
            .and_then(|map| map.random_walkable_point(&mut rand::thread_rng()))
    }

    fn with_snapshot<R>(&self, f: impl FnOnce(&WorldSnapshot) -> R) -> Option<R> {
        let guard = self.current.load();
        match &*guard {
            Some(snapshot) => Some(f(snapshot)),
            None => None,
        }
    }

    fn with_map(&self, map_id: &str, f: impl FnOnce(&TileMap) -> bool) -> bool {
        self.with_snapshot(|snapshot| snapshot.map(map_id).map_or(false, |map| f(map)))
            .unwrap_or(false)
    }
}
