use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned identifier for a venue.
///
/// Wraps a UUID so venue ids cannot be mixed up with other UUID-based
/// identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(Uuid);

impl VenueId {
    /// Creates a new random venue ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a venue ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for VenueId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VenueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for VenueId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<VenueId> for Uuid {
    fn from(id: VenueId) -> Self {
        id.0
    }
}

/// Identifier of a user in the identity service.
///
/// The identity service hands out positive integers; anything else is
/// rejected before a lookup is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a raw user id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns true if the id could have been issued by the identity service.
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
