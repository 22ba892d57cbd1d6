// tile_world/server/src/core/types.rs
use std::fmt;
use std::sync::Arc;

pub type EntityId = u32;
pub type MapId = Arc<String>;

/// A walkable coordinate packed as `x << 16 | y`.
pub type PackedXY = u32;

#[inline]
pub fn pack_xy(x: u16, y: u16) -> PackedXY {
    (x as u32) << 16 | y as u32
}

#[inline]
pub fn unpack_xy(key: PackedXY) -> (u16, u16) {
    ((key >> 16) as u16, (key & 0xFFFF) as u16)
}

/// A map id plus tile coordinates. Not validated against any map until it is
/// resolved through the registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MapPoint {
    pub map_id: MapId,
    pub x: u16,
    pub y: u16,
}

impl MapPoint {
    pub fn new(map_id: impl Into<String>, x: u16, y: u16) -> Self {
        MapPoint { map_id: Arc::new(map_id.into()), x, y }
    }

    pub fn with_map(map_id: MapId, x: u16, y: u16) -> Self {
        MapPoint { map_id, x, y }
    }

    pub fn map_id(&self) -> &str {
        self.map_id.as_str()
    }

    pub fn packed(&self) -> PackedXY {
        pack_xy(self.x, self.y)
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{},{}", self.map_id, self.x, self.y)
    }
}
