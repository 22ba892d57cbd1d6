// tile_world/server/tests/integration/map_loading.rs

use tile_world_core::core::config::WorldConfig;
use tile_world_core::core::error::WorldError;
use tile_world_core::core::types::{pack_xy, MapPoint};
use tile_world_core::world::registry::WorldRegistry;

use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

struct WorldFixture {
    _dir: TempDir,
    config: WorldConfig,
}

impl WorldFixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = WorldConfig::with_root(dir.path());
        fs::create_dir_all(&config.maps_dir).expect("Failed to create maps dir");
        WorldFixture { _dir: dir, config }
    }

    fn write_map(&self, id: &str, width: u16, height: u16, title: &[u8], floors: &[u16]) {
        fs::write(self.config.map_file_path(id), map_bytes(width, height, title, floors))
            .expect("Failed to write map file");
    }

    fn write_raw_map(&self, id: &str, bytes: &[u8]) {
        fs::write(self.config.map_file_path(id), bytes).expect("Failed to write map file");
    }

    fn write_configs(&self, map_list: &str, mini_maps: &str, start_point: &str) {
        fs::write(&self.config.map_list_file, map_list).unwrap();
        fs::write(&self.config.mini_map_file, mini_maps).unwrap();
        fs::write(&self.config.start_point_file, start_point).unwrap();
    }

    fn registry(&self) -> WorldRegistry {
        WorldRegistry::new(self.config.clone())
    }
}

fn map_bytes(width: u16, height: u16, title: &[u8], floors: &[u16]) -> Vec<u8> {
    let mut bytes = vec![0u8; 52];
    bytes[0..2].copy_from_slice(&width.to_le_bytes());
    bytes[2..4].copy_from_slice(&height.to_le_bytes());
    bytes[4..4 + title.len()].copy_from_slice(title);
    for floor in floors {
        let mut record = [0x11u8; 12];
        record[0..2].copy_from_slice(&floor.to_le_bytes());
        bytes.extend_from_slice(&record);
    }
    bytes
}

#[test]
fn two_by_two_map_walkability() {
    let fx = WorldFixture::new();
    fx.write_map("0", 2, 2, b"Bichon", &[0x0000, 0x8000, 0x0000, 0x0000]);
    fx.write_configs("0 BichonProvince\n", "", "0 1 1\n");

    let registry = fx.registry();
    registry.reload().expect("reload should succeed");

    let map = registry.get_map("0").expect("map 0 should be loaded");
    let walkable: HashSet<u32> = map.walkable_tiles().iter().copied().collect();
    let expected: HashSet<u32> = [pack_xy(0, 0), pack_xy(1, 0), pack_xy(1, 1)].into_iter().collect();
    assert_eq!(walkable, expected);

    assert!(!registry.can_walk(&MapPoint::new("0", 0, 1)));
    assert!(registry.can_walk(&MapPoint::new("0", 1, 0)));
    assert!(!registry.can_walk(&MapPoint::new("0", 2, 1)));
    assert!(!registry.can_walk(&MapPoint::new("0", 1, 2)));
    assert_eq!(map.description(), "BichonProvince");
}

#[test]
fn title_is_decoded_without_trimming() {
    let fx = WorldFixture::new();
    fx.write_map("3", 1, 1, b"Mongchon", &[0]);
    fx.write_configs("3 Village\n", "", "3 0 0\n");

    let registry = fx.registry();
    registry.reload().unwrap();
    let map = registry.get_map("3").unwrap();

    assert_eq!(map.title().len(), 16);
    assert!(map.title().starts_with("Mongchon"));
    assert_eq!(&map.title_bytes()[8..], &[0u8; 8]);
}

#[test]
fn mini_map_associations_are_applied() {
    let fx = WorldFixture::new();
    fx.write_map("0", 1, 1, b"", &[0]);
    fx.write_map("1", 1, 1, b"", &[0]);
    fx.write_configs("0 Town\n1 Field\n", "; map minimap\n0 101\n", "0 0 0\n");

    let registry = fx.registry();
    registry.reload().unwrap();
    assert_eq!(registry.get_map("0").unwrap().mini_map_id(), Some("101"));
    assert_eq!(registry.get_map("1").unwrap().mini_map_id(), None);
}

#[test]
fn only_first_spawn_record_is_used() {
    let fx = WorldFixture::new();
    fx.write_map("0", 4, 4, b"", &[0; 16]);
    fx.write_configs("0 Town\n", "", "0 2 3\nmissing nonsense\n");

    let registry = fx.registry();
    registry.reload().unwrap();
    assert_eq!(registry.spawn_point(), Some(MapPoint::new("0", 2, 3)));
}

#[test]
fn missing_map_file_is_not_found() {
    let fx = WorldFixture::new();
    fx.write_configs("0 Town\n", "", "0 0 0\n");

    let err = fx.registry().reload().unwrap_err();
    assert!(matches!(err, WorldError::NotFound(_)), "{:?}", err);
}

#[test]
fn short_header_is_malformed() {
    let fx = WorldFixture::new();
    fx.write_raw_map("0", &[0u8; 40]);
    fx.write_configs("0 Town\n", "", "0 0 0\n");

    let err = fx.registry().reload().unwrap_err();
    assert!(matches!(err, WorldError::MalformedData(_)), "{:?}", err);
}

#[test]
fn truncated_tiles_are_malformed() {
    let fx = WorldFixture::new();
    let mut bytes = map_bytes(3, 3, b"", &[0; 9]);
    bytes.truncate(52 + 12 * 5);
    fx.write_raw_map("0", &bytes);
    fx.write_configs("0 Town\n", "", "0 0 0\n");

    let err = fx.registry().reload().unwrap_err();
    assert!(matches!(err, WorldError::MalformedData(_)), "{:?}", err);
}

#[test]
fn dangling_references_are_inconsistent() {
    let fx = WorldFixture::new();
    fx.write_map("0", 1, 1, b"", &[0]);

    fx.write_configs("0 Town\n", "9 109\n", "0 0 0\n");
    let err = fx.registry().reload().unwrap_err();
    assert!(matches!(err, WorldError::ConfigInconsistency(_)), "{:?}", err);

    fx.write_configs("0 Town\n", "", "9 0 0\n");
    let err = fx.registry().reload().unwrap_err();
    assert!(matches!(err, WorldError::ConfigInconsistency(_)), "{:?}", err);
}

#[test]
fn missing_spawn_point_is_inconsistent() {
    let fx = WorldFixture::new();
    fx.write_map("0", 1, 1, b"", &[0]);
    fx.write_configs("0 Town\n", "", "; nothing configured yet\n\n");

    let err = fx.registry().reload().unwrap_err();
    assert!(matches!(err, WorldError::ConfigInconsistency(_)), "{:?}", err);
}

#[test]
fn unparsable_spawn_coordinate_is_malformed() {
    let fx = WorldFixture::new();
    fx.write_map("0", 1, 1, b"", &[0]);
    fx.write_configs("0 Town\n", "", "0 east 4\n");

    let err = fx.registry().reload().unwrap_err();
    assert!(matches!(err, WorldError::MalformedData(_)), "{:?}", err);
}

#[test]
fn first_failing_map_in_list_order_is_reported() {
    let fx = WorldFixture::new();
    let mut bytes = map_bytes(4, 4, b"", &[0; 16]);
    bytes.truncate(52 + 12 * 3);
    fx.write_raw_map("0", &bytes);
    fx.write_map("2", 2, 2, b"", &[0; 4]);
    // Map 1 has no file at all.
    fx.write_configs("0 Town\n1 Field\n2 Cave\n", "", "2 0 0\n");

    for _ in 0..8 {
        let registry = fx.registry();
        let err = registry.reload().unwrap_err();
        match err {
            WorldError::MalformedData(msg) => assert!(msg.contains("0.map"), "{}", msg),
            other => panic!("expected map 0 to be reported, got {:?}", other),
        }
        assert!(!registry.is_loaded());
        assert!(registry.get_map("2").is_none());
    }
}
