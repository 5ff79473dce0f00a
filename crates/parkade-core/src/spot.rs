//! Spot types

use serde::{Deserialize, Serialize};

/// Unique spot identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpotId(String);

impl SpotId {
    /// Create a new spot ID
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single physical parking space.
///
/// `Spot` does no locking of its own. It lives inside exactly one
/// [`SpotManager`](crate::SpotManager), which serializes every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spot {
    id: SpotId,
    free: bool,
}

impl Spot {
    /// Create a spot in the given state
    #[must_use]
    pub const fn new(id: SpotId, free: bool) -> Self {
        Self { id, free }
    }

    /// Create a free spot
    #[must_use]
    pub const fn vacant(id: SpotId) -> Self {
        Self::new(id, true)
    }

    #[must_use]
    pub const fn id(&self) -> &SpotId {
        &self.id
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.free
    }

    /// FREE -> OCCUPIED. The caller guarantees the spot is free.
    pub fn occupy(&mut self) {
        debug_assert!(self.free, "occupy called on occupied spot {}", self.id);
        self.free = false;
    }

    /// OCCUPIED -> FREE. The caller guarantees the spot is occupied.
    pub fn release(&mut self) {
        debug_assert!(!self.free, "release called on free spot {}", self.id);
        self.free = true;
    }
}
