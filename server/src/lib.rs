// tile_world/server/src/lib.rs

pub mod core;
pub mod concurrent;
pub mod entities;
pub mod world;
pub mod operational;

pub use crate::core::error::{WorldError, WorldResult};
pub use crate::core::types::{EntityId, MapPoint};
pub use crate::entities::world_object::{ObjectRef, WorldObject};
pub use crate::world::registry::WorldRegistry;
pub use crate::world::snapshot::WorldSnapshot;
pub use crate::world::tile_map::TileMap;
