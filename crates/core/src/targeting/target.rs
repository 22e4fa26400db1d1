use std::sync::{Arc, Mutex, PoisonError};

use crate::shared::geometry::Point;

/// The single authoritative screen-space point the indicator converges on,
/// tagged with the detection sequence number that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub point: Point,
    pub seq: u64,
}

/// Shared cell holding the current target.
///
/// Updates replace the whole value; readers on any thread see either the
/// previous target or the new one, never a partial write. Written only from
/// the serialized update context. Clones share the same cell.
#[derive(Clone, Debug, Default)]
pub struct TargetCell {
    inner: Arc<Mutex<Option<Target>>>,
}

impl TargetCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, target: Target) {
        // The critical section only copies a value, so a poisoned lock
        // cannot hold inconsistent state; recover and keep going.
        let mut slot = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(target);
    }

    pub fn load(&self) -> Option<Target> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
