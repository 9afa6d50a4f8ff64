//! Storage layer for the PVZ service.
//!
//! The traits in [`store`] define what persistence must provide; the
//! PostgreSQL implementation is the production backend and the in-memory
//! implementation mirrors its semantics for tests. The [`assemble`] module
//! rebuilds the nested pickup-point tree from the flat listing rows.

pub mod assemble;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use assemble::{ListedRow, TreeBuilder};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use store::{PickupPointStore, ProductStore, ReceptionStore};
