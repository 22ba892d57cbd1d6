// tile_world/server/src/world/tile_map.rs
use crate::concurrent::spatial_index::{Tile, TileGrid, TileGridStats};
use crate::core::constants::MAP_TITLE_LEN;
use crate::core::error::{WorldError, WorldResult};
use crate::core::types::{pack_xy, unpack_xy, EntityId, MapId, MapPoint, PackedXY};
use crate::entities::world_object::{ObjectRef, WorldObject};
use crate::world::map_file::MapFileData;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// One loaded map: static terrain plus the live per-tile object registry.
///
/// Everything except the tile registries is fixed once the map is built, so
/// metadata reads need no synchronization.
pub struct TileMap {
    id: MapId,
    title: [u8; MAP_TITLE_LEN],
    description: String,
    mini_map_id: Option<String>,
    grid: TileGrid,
    walkable_xy: Vec<PackedXY>,
}

impl TileMap {
    /// Attaches decoded terrain to a map id. The walkable list is derived
    /// from the tile flags here, so the two can never disagree.
    pub fn from_file_data(
        id: impl Into<String>,
        description: impl Into<String>,
        data: MapFileData,
    ) -> WorldResult<Self> {
        let id = id.into();
        let MapFileData { width, height, title, walkable } = data;
        let tile_count = width as usize * height as usize;
        if walkable.len() != tile_count {
            return Err(WorldError::MalformedData(format!(
                "map {} has {} tile flags for a {}x{} grid",
                id,
                walkable.len(),
                width,
                height
            )));
        }

        let walkable_xy = walkable_coordinates(height, &walkable);
        Ok(TileMap {
            id: Arc::new(id),
            title,
            description: description.into(),
            mini_map_id: None,
            grid: TileGrid::from_walkability(width, height, walkable),
            walkable_xy,
        })
    }

    pub(crate) fn set_mini_map_id(&mut self, mini_map_id: String) -> Option<String> {
        self.mini_map_id.replace(mini_map_id)
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn shared_id(&self) -> MapId {
        self.id.clone()
    }

    /// The 16 title bytes as UTF-8, padding included. Titles in other
    /// encodings (GBK in most map packs) come back with replacement
    /// characters; use `title_bytes` for the raw bytes.
    pub fn title(&self) -> String {
        String::from_utf8_lossy(&self.title).into_owned()
    }

    pub fn title_bytes(&self) -> &[u8; MAP_TITLE_LEN] {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn mini_map_id(&self) -> Option<&str> {
        self.mini_map_id.as_deref()
    }

    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    pub fn tile(&self, x: u16, y: u16) -> Option<&Tile> {
        self.grid.tile(x, y)
    }

    pub fn can_walk(&self, x: u16, y: u16) -> bool {
        self.grid.can_walk(x, y)
    }

    pub fn walkable_tiles(&self) -> &[PackedXY] {
        &self.walkable_xy
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable_xy.len()
    }

    pub fn random_walkable_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MapPoint> {
        self.walkable_xy.choose(rng).map(|key| {
            let (x, y) = unpack_xy(*key);
            MapPoint::with_map(self.id.clone(), x, y)
        })
    }

    /// Registers `object` on the tile at its current position. Off-map
    /// positions are ignored. The position's map id is not checked here.
    pub fn put_object(&self, object: &ObjectRef) -> bool {
        let pos = object.position();
        self.grid.put(pos.x, pos.y, object.clone())
    }

    pub fn remove_object(&self, object: &dyn WorldObject) -> bool {
        let pos = object.position();
        self.grid.remove(pos.x, pos.y, object.object_id())
    }

    pub fn remove_object_at(&self, x: u16, y: u16, id: EntityId) -> bool {
        self.grid.remove(x, y, id)
    }

    pub fn objects_in_rect(&self, start_x: i32, width: i32, start_y: i32, height: i32) -> Vec<ObjectRef> {
        self.grid.collect_rect(start_x, width, start_y, height)
    }

    pub fn objects_at(&self, x: u16, y: u16) -> Vec<ObjectRef> {
        self.grid.tile(x, y).map(Tile::objects).unwrap_or_default()
    }

    pub fn stats(&self) -> TileGridStats {
        self.grid.get_stats()
    }
}

// Flags are x-major, so tile `i` sits at (i / height, i % height).
fn walkable_coordinates(height: u16, walkable: &[bool]) -> Vec<PackedXY> {
    let height = height as usize;
    walkable
        .iter()
        .enumerate()
        .filter(|(_, can_walk)| **can_walk)
        .map(|(i, _)| pack_xy((i / height) as u16, (i % height) as u16))
        .collect()
}

impl std::fmt::Debug for TileMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileMap")
            .field("id", &self.id)
            .field("title", &self.title())
            .field("description", &self.description)
            .field("mini_map_id", &self.mini_map_id)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("walkable", &self.walkable_xy.len())
            .finish()
    }
}
