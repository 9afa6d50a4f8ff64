//! Domain error taxonomy.

use thiserror::Error;

use crate::access::Action;
use crate::types::Role;

/// Errors produced by the domain core.
///
/// Callers can rely on the variant to tell apart input validation failures,
/// authorization rejections and state conflicts. Anything that is none of
/// those is collapsed into [`DomainError::Unexpected`]; internal detail is
/// logged where the failure happened and never crosses this boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    // -- Validation --
    #[error("invalid city: {0}")]
    InvalidCity(String),

    #[error("invalid product type: {0}")]
    InvalidProductType(String),

    #[error("invalid reception status: {0}")]
    InvalidReceptionStatus(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid page provided")]
    InvalidPage,

    #[error("invalid page size provided")]
    InvalidPageSize,

    #[error("invalid date range provided")]
    InvalidDateRange,

    #[error("invalid start date provided")]
    InvalidStartDate,

    // -- Authorization --
    #[error("not enough rights: role {role} may not {action}")]
    NotEnoughRights { role: Role, action: Action },

    // -- State conflicts --
    #[error("pickup point not found")]
    PickupPointNotFound,

    #[error("pickup point already exists")]
    DuplicatePickupPoint,

    #[error("open reception already exists for this pickup point")]
    OpenReceptionAlreadyExists,

    #[error("no open reception in this pickup point")]
    NoOpenReception,

    #[error("no products in this reception")]
    NoProductsInReception,

    // -- Everything else --
    #[error("unexpected internal error")]
    Unexpected,
}

impl DomainError {
    /// Returns true if the error reflects persisted state conflicting with
    /// the requested transition, as opposed to malformed input.
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::PickupPointNotFound
                | DomainError::DuplicatePickupPoint
                | DomainError::OpenReceptionAlreadyExists
                | DomainError::NoOpenReception
                | DomainError::NoProductsInReception
        )
    }
}
