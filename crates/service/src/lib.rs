//! Business operations for the PVZ service.
//!
//! Each service method authorizes the caller's role, validates input,
//! delegates to storage and maps storage errors back to the domain
//! taxonomy. Known state conflicts keep their specific kind; anything
//! unclassified is logged here with full detail and surfaced as the
//! opaque unexpected kind.

pub mod pickup_point;
pub mod product;
pub mod reception;

pub use pickup_point::PickupPointService;
pub use product::ProductService;
pub use reception::ReceptionService;

use domain::DomainError;
use store::StoreError;

pub(crate) fn map_store_error(err: StoreError) -> DomainError {
    match err {
        StoreError::PickupPointMissing => DomainError::PickupPointNotFound,
        StoreError::DuplicatePickupPoint => DomainError::DuplicatePickupPoint,
        StoreError::OpenReceptionExists => DomainError::OpenReceptionAlreadyExists,
        StoreError::NoOpenReception => DomainError::NoOpenReception,
        StoreError::NoProductsInReception => DomainError::NoProductsInReception,
        err @ (StoreError::Decode(_) | StoreError::Database(_)) => {
            tracing::error!(error = %err, "storage failure");
            DomainError::Unexpected
        }
    }
}
