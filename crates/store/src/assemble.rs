//! Reconstruction of the flat listing rows into the nested aggregate view.
//!
//! The listing query yields one row per (pickup point × reception × product)
//! combination, with null reception/product columns where a parent has no
//! children. [`TreeBuilder`] consumes that stream row by row, deduplicating
//! by pickup-point and reception identifier while preserving first-seen
//! order, so the output keeps the ordering the query produced.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use common::{PickupPointId, ProductId, ReceptionId};
use domain::{
    PickupPoint, PickupPointWithReceptions, Product, Reception, ReceptionWithProducts,
};

use crate::error::{Result, StoreError};

/// One flat row of the aggregate listing query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListedRow {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub city: String,
    pub reception_id: Option<Uuid>,
    pub reception_date: Option<DateTime<Utc>>,
    pub reception_status: Option<String>,
    pub product_id: Option<Uuid>,
    pub product_date: Option<DateTime<Utc>>,
    pub product_type: Option<String>,
}

fn decode<T>(value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| StoreError::Decode(e.to_string()))
}

/// Incremental flat-row → tree assembler.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    points: Vec<PickupPointWithReceptions>,
    point_index: HashMap<Uuid, usize>,
    // reception id → (point index, reception index within that point)
    reception_index: HashMap<Uuid, (usize, usize)>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one row, attaching whatever parts of it are new.
    pub fn push(&mut self, row: ListedRow) -> Result<()> {
        let point_idx = match self.point_index.get(&row.id) {
            Some(&idx) => idx,
            None => {
                let idx = self.points.len();
                self.points.push(PickupPointWithReceptions {
                    pickup_point: PickupPoint {
                        id: PickupPointId::from_uuid(row.id),
                        registration_date: row.registration_date,
                        city: decode(&row.city)?,
                    },
                    receptions: Vec::new(),
                });
                self.point_index.insert(row.id, idx);
                idx
            }
        };

        let Some(reception_id) = row.reception_id else {
            return Ok(());
        };

        let (point_idx, reception_idx) = match self.reception_index.get(&reception_id) {
            Some(&slot) => slot,
            None => {
                // The outer join guarantees date and status are present
                // whenever the reception id is.
                let (Some(date_time), Some(status)) =
                    (row.reception_date, row.reception_status.as_deref())
                else {
                    return Err(StoreError::Decode(format!(
                        "reception {reception_id} row is missing date or status"
                    )));
                };

                let receptions = &mut self.points[point_idx].receptions;
                let reception_idx = receptions.len();
                receptions.push(ReceptionWithProducts {
                    reception: Reception {
                        id: ReceptionId::from_uuid(reception_id),
                        date_time,
                        pickup_point_id: PickupPointId::from_uuid(row.id),
                        status: decode(status)?,
                    },
                    products: Vec::new(),
                });
                self.reception_index
                    .insert(reception_id, (point_idx, reception_idx));
                (point_idx, reception_idx)
            }
        };

        if let Some(product_id) = row.product_id {
            let (Some(date_time), Some(product_type)) =
                (row.product_date, row.product_type.as_deref())
            else {
                return Err(StoreError::Decode(format!(
                    "product {product_id} row is missing date or type"
                )));
            };

            self.points[point_idx].receptions[reception_idx]
                .products
                .push(Product {
                    id: ProductId::from_uuid(product_id),
                    date_time,
                    product_type: decode(product_type)?,
                    reception_id: ReceptionId::from_uuid(reception_id),
                });
        }

        Ok(())
    }

    /// Returns the assembled pages in first-seen order.
    pub fn finish(self) -> Vec<PickupPointWithReceptions> {
        self.points
    }
}
