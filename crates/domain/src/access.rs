//! Role → operation authorization gate.
//!
//! A pure policy check with no I/O and no state. The transport hands over
//! whatever role string the credential carried; an unknown value is
//! `InvalidRole`, a known role attempting an operation outside its column
//! in the permission table is `NotEnoughRights`. Callers can tell the two
//! apart.

use crate::error::DomainError;
use crate::types::Role;

/// Mutations and reads the gate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreatePickupPoint,
    OpenReception,
    CloseReception,
    AddProduct,
    RemoveProduct,
    ListPickupPoints,
}

impl Action {
    /// Returns a short verb phrase for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreatePickupPoint => "create pickup point",
            Action::OpenReception => "open reception",
            Action::CloseReception => "close reception",
            Action::AddProduct => "add product",
            Action::RemoveProduct => "remove product",
            Action::ListPickupPoints => "list pickup points",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    /// Returns true if this role may perform the given action.
    pub fn permits(&self, action: Action) -> bool {
        match action {
            Action::CreatePickupPoint => matches!(self, Role::Moderator),
            Action::OpenReception
            | Action::CloseReception
            | Action::AddProduct
            | Action::RemoveProduct => matches!(self, Role::Employee),
            Action::ListPickupPoints => true,
        }
    }
}

/// Resolves a raw role claim and checks it against the permission table.
///
/// Returns the parsed role on success so callers do not re-parse the claim.
pub fn authorize(role_claim: &str, action: Action) -> Result<Role, DomainError> {
    let role: Role = role_claim.parse()?;

    if !role.permits(action) {
        return Err(DomainError::NotEnoughRights { role, action });
    }

    Ok(role)
}
