use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pickup point.
///
/// Wraps a UUID to provide type safety and prevent mixing up
/// pickup-point IDs with other UUID-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PickupPointId(Uuid);

impl PickupPointId {
    /// Creates a new random pickup-point ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a pickup-point ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PickupPointId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PickupPointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PickupPointId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<PickupPointId> for Uuid {
    fn from(id: PickupPointId) -> Self {
        id.0
    }
}

/// Unique identifier for a reception (intake batch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceptionId(Uuid);

impl ReceptionId {
    /// Creates a new random reception ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a reception ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ReceptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReceptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ReceptionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ReceptionId> for Uuid {
    fn from(id: ReceptionId) -> Self {
        id.0
    }
}

/// Unique identifier for a product recorded against a reception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Creates a new random product ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a product ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ProductId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ProductId> for Uuid {
    fn from(id: ProductId) -> Self {
        id.0
    }
}
