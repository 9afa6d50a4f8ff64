pub mod types;

pub use types::{PickupPointId, ProductId, ReceptionId};
