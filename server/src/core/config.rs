// tile_world/server/src/core/config.rs
use super::constants::{
    DEFAULT_MAPS_DIR, DEFAULT_MAP_LIST_FILE, DEFAULT_MINI_MAP_FILE, DEFAULT_START_POINT_FILE,
};
use super::error::{WorldError, WorldResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where the world subsystem finds its map files and config sources.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub maps_dir: PathBuf,
    pub map_list_file: PathBuf,
    pub mini_map_file: PathBuf,
    pub start_point_file: PathBuf,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            maps_dir: PathBuf::from(DEFAULT_MAPS_DIR),
            map_list_file: PathBuf::from(DEFAULT_MAP_LIST_FILE),
            mini_map_file: PathBuf::from(DEFAULT_MINI_MAP_FILE),
            start_point_file: PathBuf::from(DEFAULT_START_POINT_FILE),
        }
    }
}

impl WorldConfig {
    /// Default layout re-rooted under `root` instead of the working directory.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let defaults = WorldConfig::default();
        WorldConfig {
            maps_dir: root.join(defaults.maps_dir),
            map_list_file: root.join(defaults.map_list_file),
            mini_map_file: root.join(defaults.mini_map_file),
            start_point_file: root.join(defaults.start_point_file),
        }
    }

    pub fn from_yaml_str(text: &str) -> WorldResult<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| WorldError::ConfigError(format!("invalid world config: {}", e)))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                WorldError::NotFound(format!("world config {}", path.display()))
            }
            _ => WorldError::IoError(e),
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn map_file_path(&self, map_id: &str) -> PathBuf {
        self.maps_dir
            .join(format!("{}.{}", map_id, super::constants::MAP_FILE_EXTENSION))
    }
}
