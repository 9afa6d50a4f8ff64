//! Entities and the nested aggregate view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{PickupPointId, ProductId, ReceptionId};

use crate::types::{City, ProductType, ReceptionStatus};

/// A physical location that receives and holds shipments.
///
/// Created once by a moderator action and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupPoint {
    pub id: PickupPointId,
    pub registration_date: DateTime<Utc>,
    pub city: City,
}

/// A bounded intake batch at a pickup point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reception {
    pub id: ReceptionId,
    pub date_time: DateTime<Utc>,
    pub pickup_point_id: PickupPointId,
    pub status: ReceptionStatus,
}

/// A single item recorded against a reception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub date_time: DateTime<Utc>,
    pub product_type: ProductType,
    pub reception_id: ReceptionId,
}

/// Payload for attaching a product to whichever reception is currently open
/// at the given pickup point. The owning reception is resolved by storage
/// inside the same transaction as the insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub id: ProductId,
    pub date_time: DateTime<Utc>,
    pub product_type: ProductType,
    pub pickup_point_id: PickupPointId,
}

/// A reception together with all of its products, as returned by the
/// aggregate listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceptionWithProducts {
    pub reception: Reception,
    pub products: Vec<Product>,
}

/// One page entry of the aggregate listing: a pickup point with its
/// receptions and their products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupPointWithReceptions {
    pub pickup_point: PickupPoint,
    pub receptions: Vec<ReceptionWithProducts>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pickup_point_serialization_roundtrip() {
        let point = PickupPoint {
            id: PickupPointId::new(),
            registration_date: Utc::now(),
            city: City::Kazan,
        };
        let json = serde_json::to_string(&point).unwrap();
        let back: PickupPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(point, back);
    }

    #[test]
    fn nested_view_serializes_products_inside_receptions() {
        let point_id = PickupPointId::new();
        let reception_id = ReceptionId::new();
        let view = PickupPointWithReceptions {
            pickup_point: PickupPoint {
                id: point_id,
                registration_date: Utc::now(),
                city: City::Moscow,
            },
            receptions: vec![ReceptionWithProducts {
                reception: Reception {
                    id: reception_id,
                    date_time: Utc::now(),
                    pickup_point_id: point_id,
                    status: ReceptionStatus::InProgress,
                },
                products: vec![Product {
                    id: ProductId::new(),
                    date_time: Utc::now(),
                    product_type: ProductType::Shoes,
                    reception_id,
                }],
            }],
        };

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["receptions"][0]["products"][0]["product_type"], "обувь");
        assert_eq!(value["receptions"][0]["reception"]["status"], "in_progress");
    }
}
