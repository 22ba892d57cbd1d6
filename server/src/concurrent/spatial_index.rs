// tile_world/server/src/concurrent/spatial_index.rs

use crate::core::types::EntityId;
use crate::entities::world_object::ObjectRef;
use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use tracing::{debug, trace};

/// One grid cell: static walkability plus the objects currently standing on it.
pub struct Tile {
    can_walk: bool,
    objects: RwLock<AHashMap<EntityId, ObjectRef>>,
}

impl Tile {
    pub fn new(can_walk: bool) -> Self {
        Tile {
            can_walk,
            objects: RwLock::new(AHashMap::new()),
        }
    }

    #[inline]
    pub fn can_walk(&self) -> bool {
        self.can_walk
    }

    /// Registers `object` under its id, replacing any previous entry with that id.
    pub fn insert(&self, object: ObjectRef) -> Option<ObjectRef> {
        let id = object.object_id();
        self.objects.write().insert(id, object)
    }

    pub fn remove(&self, id: EntityId) -> Option<ObjectRef> {
        self.objects.write().remove(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.objects.read().contains_key(&id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }

    pub fn object_ids(&self) -> Vec<EntityId> {
        self.objects.read().keys().copied().collect()
    }

    pub fn objects(&self) -> Vec<ObjectRef> {
        self.objects.read().values().cloned().collect()
    }
}

impl std::fmt::Debug for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tile")
            .field("can_walk", &self.can_walk)
            .field("objects", &self.object_count())
            .finish()
    }
}

/// Fixed-size grid of tiles stored x-major (`x * height + y`), matching the
/// order tiles appear in a map file.
pub struct TileGrid {
    tiles: Vec<Tile>,
    width: u16,
    height: u16,
}

impl TileGrid {
    /// `walkable` must hold exactly `width * height` flags in x-major order.
    pub(crate) fn from_walkability(width: u16, height: u16, walkable: Vec<bool>) -> Self {
        debug_assert_eq!(walkable.len(), width as usize * height as usize);
        let tiles: Vec<Tile> = walkable.into_iter().map(Tile::new).collect();

        debug!(
            "Tile grid initialized: {}x{} grid, {} total tiles",
            width, height, tiles.len()
        );

        TileGrid { tiles, width, height }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn tile_index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(x as usize * self.height as usize + y as usize)
    }

    #[inline]
    pub fn tile(&self, x: u16, y: u16) -> Option<&Tile> {
        self.tile_index(x, y).map(|idx| &self.tiles[idx])
    }

    pub fn can_walk(&self, x: u16, y: u16) -> bool {
        self.tile(x, y).map_or(false, Tile::can_walk)
    }

    /// Returns false, leaving every tile untouched, when (x, y) is off the grid.
    pub fn put(&self, x: u16, y: u16, object: ObjectRef) -> bool {
        match self.tile(x, y) {
            Some(tile) => {
                trace!("put object {} at ({}, {})", object.object_id(), x, y);
                tile.insert(object);
                true
            }
            None => false,
        }
    }

    /// Returns true only if an entry for `id` was actually removed.
    pub fn remove(&self, x: u16, y: u16, id: EntityId) -> bool {
        self.tile(x, y)
            .map_or(false, |tile| tile.remove(id).is_some())
    }

    /// Collects every object on tiles inside the rectangle, clamped to the grid.
    ///
    /// Tiles are read one at a time, so a concurrent move may make an object
    /// invisible for this call; it is never reported twice.
    pub fn collect_rect(&self, start_x: i32, width: i32, start_y: i32, height: i32) -> Vec<ObjectRef> {
        let (x_range, y_range) = match self.clamp_rect(start_x, width, start_y, height) {
            Some(ranges) => ranges,
            None => return Vec::new(),
        };

        let mut found = Vec::new();
        let mut seen = AHashSet::new();
        for x in x_range {
            for y in y_range.clone() {
                let tile = &self.tiles[x * self.height as usize + y];
                let guard = tile.objects.read();
                for (id, object) in guard.iter() {
                    if seen.insert(*id) {
                        found.push(object.clone());
                    }
                }
            }
        }
        found
    }

    fn clamp_rect(
        &self,
        start_x: i32,
        width: i32,
        start_y: i32,
        height: i32,
    ) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
        let clamp_axis = |start: i32, len: i32, limit: u16| {
            let begin = (start as i64).max(0);
            let end = (start as i64 + len as i64).min(limit as i64);
            if begin >= end {
                None
            } else {
                Some(begin as usize..end as usize)
            }
        };
        let xs = clamp_axis(start_x, width, self.width)?;
        let ys = clamp_axis(start_y, height, self.height)?;
        Some((xs, ys))
    }

    pub fn get_stats(&self) -> TileGridStats {
        let mut occupied_tiles = 0;
        let mut total_objects = 0;
        let mut max_objects_per_tile = 0;
        let mut walkable_tiles = 0;

        for tile in &self.tiles {
            if tile.can_walk {
                walkable_tiles += 1;
            }
            let count = tile.object_count();
            if count > 0 {
                occupied_tiles += 1;
                total_objects += count;
                max_objects_per_tile = max_objects_per_tile.max(count);
            }
        }

        TileGridStats {
            total_tiles: self.tiles.len(),
            walkable_tiles,
            occupied_tiles,
            total_objects,
            max_objects_per_tile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGridStats {
    pub total_tiles: usize,
    pub walkable_tiles: usize,
    pub occupied_tiles: usize,
    pub total_objects: usize,
    pub max_objects_per_tile: usize,
}
