use thiserror::Error;

/// Errors that can occur when interacting with storage.
///
/// State-conflict variants carry enough information for the service layer
/// to map them to their business-rule error kinds; everything else stays a
/// database error and is logged before being collapsed at the boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced pickup point does not exist.
    #[error("pickup point does not exist")]
    PickupPointMissing,

    /// A pickup point with the given identifier already exists.
    #[error("pickup point identifier already taken")]
    DuplicatePickupPoint,

    /// The pickup point already has a reception with status `in_progress`.
    #[error("open reception already exists for this pickup point")]
    OpenReceptionExists,

    /// The pickup point has no reception with status `in_progress`.
    #[error("no open reception for this pickup point")]
    NoOpenReception,

    /// The open reception holds no products to remove.
    #[error("no products in the open reception")]
    NoProductsInReception,

    /// A persisted value failed to decode into its domain type.
    #[error("stored value could not be decoded: {0}")]
    Decode(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
