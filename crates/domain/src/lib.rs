//! Domain layer for the PVZ service.
//!
//! This crate provides the pure core of the system:
//! - closed enumerations for cities, product types, reception statuses and roles
//! - entities and the nested aggregate view returned by the read side
//! - the pagination/date filter value object with its validation rules
//! - the role → operation authorization gate
//!
//! Nothing in here performs I/O; storage and transport live in sibling crates.

pub mod access;
pub mod error;
pub mod filter;
pub mod model;
pub mod types;

pub use access::{Action, authorize};
pub use error::DomainError;
pub use filter::ListFilter;
pub use model::{
    NewProduct, PickupPoint, PickupPointWithReceptions, Product, Reception, ReceptionWithProducts,
};
pub use types::{City, ProductType, ReceptionStatus, Role};
