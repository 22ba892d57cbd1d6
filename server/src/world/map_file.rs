// tile_world/server/src/world/map_file.rs
//
// Decoder for the `<id>.map` terrain format: a 52-byte header followed by
// `width * height` 12-byte tile records stored x-major.

use crate::core::constants::{
    MAP_FILE_HEADER_SIZE, MAP_FILE_TILE_SIZE, MAP_HEADER_HEIGHT_OFFSET, MAP_HEADER_TITLE_OFFSET,
    MAP_HEADER_WIDTH_OFFSET, MAP_TITLE_LEN, TILE_IMPASSABLE_FLAG,
};
use crate::core::error::{WorldError, WorldResult};
use bytes::Buf;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Terrain decoded from one map file, before it is attached to a map id.
/// Only `decode_map` builds one, so `walkable` always holds `width * height`
/// flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFileData {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) title: [u8; MAP_TITLE_LEN],
    /// One flag per tile, x-major.
    pub(crate) walkable: Vec<bool>,
}

impl MapFileData {
    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn title(&self) -> &[u8; MAP_TITLE_LEN] {
        &self.title
    }

    pub fn walkable(&self) -> &[bool] {
        &self.walkable
    }
}

#[inline]
pub fn is_walkable_floor(floor_image: u16) -> bool {
    floor_image & TILE_IMPASSABLE_FLAG == 0
}

pub fn read_map_file(path: &Path) -> WorldResult<MapFileData> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => WorldError::NotFound(format!("map file {}", path.display())),
        _ => WorldError::IoError(e),
    })?;
    let source = path.display().to_string();
    decode_map(BufReader::new(file), &source)
}

/// Decodes a map from any byte stream. `source` only labels error messages.
pub fn decode_map<R: Read>(mut reader: R, source: &str) -> WorldResult<MapFileData> {
    let mut header = [0u8; MAP_FILE_HEADER_SIZE];
    read_record(&mut reader, &mut header).map_err(|e| match e {
        ShortRead::Eof => WorldError::MalformedData(format!(
            "map header shorter than {} bytes: {}",
            MAP_FILE_HEADER_SIZE, source
        )),
        ShortRead::Io(e) => WorldError::IoError(e),
    })?;

    let width = (&header[MAP_HEADER_WIDTH_OFFSET..]).get_u16_le();
    let height = (&header[MAP_HEADER_HEIGHT_OFFSET..]).get_u16_le();
    let mut title = [0u8; MAP_TITLE_LEN];
    (&header[MAP_HEADER_TITLE_OFFSET..]).copy_to_slice(&mut title);

    debug!(
        "Reading map file: {}, width: {}, height: {}, title: {}",
        source,
        width,
        height,
        String::from_utf8_lossy(&title)
    );

    let tile_count = width as usize * height as usize;
    let mut walkable = Vec::with_capacity(tile_count);
    let mut record = [0u8; MAP_FILE_TILE_SIZE];

    for x in 0..width {
        for y in 0..height {
            read_record(&mut reader, &mut record).map_err(|e| match e {
                ShortRead::Eof => WorldError::MalformedData(format!(
                    "tile record at ({}, {}) shorter than {} bytes: {}",
                    x, y, MAP_FILE_TILE_SIZE, source
                )),
                ShortRead::Io(e) => WorldError::IoError(e),
            })?;

            let floor_image = (&record[..]).get_u16_le();
            walkable.push(is_walkable_floor(floor_image));
        }
    }

    let mut trailing = [0u8; 1];
    if matches!(reader.read(&mut trailing), Ok(n) if n > 0) {
        warn!("Map file {} has trailing bytes after {} tiles", source, tile_count);
    }

    Ok(MapFileData { width, height, title, walkable })
}

enum ShortRead {
    Eof,
    Io(std::io::Error),
}

fn read_record<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), ShortRead> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => ShortRead::Eof,
        _ => ShortRead::Io(e),
    })
}
