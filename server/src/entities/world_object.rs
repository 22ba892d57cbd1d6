// tile_world/server/src/entities/world_object.rs
use crate::core::types::{EntityId, MapPoint};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// The only part of a game entity the world subsystem looks at.
///
/// Tiles keep an `ObjectRef` keyed by `object_id()`; the entity itself is owned
/// by game logic, so position changes made there are visible through the index.
pub trait WorldObject: Send + Sync {
    fn object_id(&self) -> EntityId;
    fn position(&self) -> MapPoint;
}

pub type ObjectRef = Arc<dyn WorldObject>;

/// Minimal world object: a fixed id plus a position that game logic moves.
pub struct TrackedObject {
    id: EntityId,
    position: RwLock<MapPoint>,
}

impl TrackedObject {
    pub fn new(id: EntityId, position: MapPoint) -> Self {
        TrackedObject { id, position: RwLock::new(position) }
    }

    pub fn shared(id: EntityId, position: MapPoint) -> Arc<Self> {
        Arc::new(Self::new(id, position))
    }

    /// Updates the stored position only. Callers remove the object from its
    /// old tile before this and put it back afterwards.
    pub fn set_position(&self, position: MapPoint) {
        *self.position.write() = position;
    }
}

impl WorldObject for TrackedObject {
    fn object_id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> MapPoint {
        self.position.read().clone()
    }
}

impl fmt::Debug for TrackedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedObject")
            .field("id", &self.id)
            .field("position", &*self.position.read())
            .finish()
    }
}
