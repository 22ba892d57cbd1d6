// tile_world/server/src/core/constants.rs

// Map file layout
pub const MAP_FILE_EXTENSION: &str = "map";
pub const MAP_FILE_HEADER_SIZE: usize = 52;
pub const MAP_FILE_TILE_SIZE: usize = 12;
pub const MAP_HEADER_WIDTH_OFFSET: usize = 0;
pub const MAP_HEADER_HEIGHT_OFFSET: usize = 2;
pub const MAP_HEADER_TITLE_OFFSET: usize = 4;
pub const MAP_TITLE_LEN: usize = 16;

/// Highest bit of a tile's floor-image field marks the tile impassable.
pub const TILE_IMPASSABLE_FLAG: u16 = 0x8000;

// Default config locations, relative to the server's working directory
pub const DEFAULT_MAPS_DIR: &str = "Envir/Maps";
pub const DEFAULT_MAP_LIST_FILE: &str = "Envir/MapInfo.cfg";
pub const DEFAULT_MINI_MAP_FILE: &str = "Envir/MiniMap.cfg";
pub const DEFAULT_START_POINT_FILE: &str = "Envir/StartPoint.cfg";

// Column counts per config source
pub const MAP_LIST_COLUMNS: usize = 2;
pub const MINI_MAP_COLUMNS: usize = 2;
pub const START_POINT_COLUMNS: usize = 3;
