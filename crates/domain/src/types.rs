//! Closed enumerations shared across the service.
//!
//! The schema stores these as plain text, so every inbound value must pass
//! through `from_str` before a mutation reaches storage. Wire values match
//! the original public API and are preserved by serde.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// City a pickup point operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "Москва")]
    Moscow,
    #[serde(rename = "Санкт-Петербург")]
    SaintPetersburg,
    #[serde(rename = "Казань")]
    Kazan,
}

impl City {
    /// Returns the wire representation of the city.
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Moscow => "Москва",
            City::SaintPetersburg => "Санкт-Петербург",
            City::Kazan => "Казань",
        }
    }
}

impl FromStr for City {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Москва" => Ok(City::Moscow),
            "Санкт-Петербург" => Ok(City::SaintPetersburg),
            "Казань" => Ok(City::Kazan),
            other => Err(DomainError::InvalidCity(other.to_string())),
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of product recorded against a reception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "электроника")]
    Electronics,
    #[serde(rename = "одежда")]
    Clothes,
    #[serde(rename = "обувь")]
    Shoes,
}

impl ProductType {
    /// Returns the wire representation of the product type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Electronics => "электроника",
            ProductType::Clothes => "одежда",
            ProductType::Shoes => "обувь",
        }
    }
}

impl FromStr for ProductType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "электроника" => Ok(ProductType::Electronics),
            "одежда" => Ok(ProductType::Clothes),
            "обувь" => Ok(ProductType::Shoes),
            other => Err(DomainError::InvalidProductType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a reception.
///
/// State transitions:
/// ```text
/// (absent) ──► InProgress ──► Closed
/// ```
/// `Closed` is terminal; a reception is never reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceptionStatus {
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "close")]
    Closed,
}

impl ReceptionStatus {
    /// Returns the wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatus::InProgress => "in_progress",
            ReceptionStatus::Closed => "close",
        }
    }

    /// Returns true if products may still be attached or removed.
    pub fn is_open(&self) -> bool {
        matches!(self, ReceptionStatus::InProgress)
    }
}

impl FromStr for ReceptionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ReceptionStatus::InProgress),
            "close" => Ok(ReceptionStatus::Closed),
            other => Err(DomainError::InvalidReceptionStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller role as supplied by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "employee")]
    Employee,
    #[serde(rename = "moderator")]
    Moderator,
}

impl Role {
    /// Returns the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Moderator => "moderator",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Role::Employee),
            "moderator" => Ok(Role::Moderator),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_parses_known_values() {
        assert_eq!("Москва".parse::<City>().unwrap(), City::Moscow);
        assert_eq!(
            "Санкт-Петербург".parse::<City>().unwrap(),
            City::SaintPetersburg
        );
        assert_eq!("Казань".parse::<City>().unwrap(), City::Kazan);
    }

    #[test]
    fn city_rejects_unknown_value() {
        let err = "Новосибирск".parse::<City>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidCity(_)));
    }

    #[test]
    fn city_serde_uses_wire_value() {
        let json = serde_json::to_string(&City::Moscow).unwrap();
        assert_eq!(json, "\"Москва\"");
        let back: City = serde_json::from_str(&json).unwrap();
        assert_eq!(back, City::Moscow);
    }

    #[test]
    fn product_type_parses_known_values() {
        assert_eq!(
            "электроника".parse::<ProductType>().unwrap(),
            ProductType::Electronics
        );
        assert_eq!("одежда".parse::<ProductType>().unwrap(), ProductType::Clothes);
        assert_eq!("обувь".parse::<ProductType>().unwrap(), ProductType::Shoes);
    }

    #[test]
    fn product_type_rejects_unknown_value() {
        let err = "мебель".parse::<ProductType>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidProductType(_)));
    }

    #[test]
    fn reception_status_roundtrip() {
        for status in [ReceptionStatus::InProgress, ReceptionStatus::Closed] {
            assert_eq!(status.as_str().parse::<ReceptionStatus>().unwrap(), status);
        }
    }

    #[test]
    fn only_in_progress_is_open() {
        assert!(ReceptionStatus::InProgress.is_open());
        assert!(!ReceptionStatus::Closed.is_open());
    }

    #[test]
    fn role_parses_known_values() {
        assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
        assert_eq!("moderator".parse::<Role>().unwrap(), Role::Moderator);
    }

    #[test]
    fn role_rejects_unknown_value() {
        let err = "admin".parse::<Role>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidRole(_)));
    }
}
