use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use async_trait::async_trait;

use common::{PickupPointId, ReceptionId};
use domain::{
    ListFilter, NewProduct, PickupPoint, PickupPointWithReceptions, Product, Reception,
};

use crate::{
    assemble::{ListedRow, TreeBuilder},
    error::{Result, StoreError},
    store::{PickupPointStore, ProductStore, ReceptionStore},
};

/// PostgreSQL-backed storage.
///
/// Every mutation runs inside its own transaction; dropping the transaction
/// on an error path rolls it back before the error is returned.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Raw receptions row.
#[derive(sqlx::FromRow)]
struct ReceptionRow {
    id: Uuid,
    date_time: DateTime<Utc>,
    pvz_id: Uuid,
    status: String,
}

impl ReceptionRow {
    fn into_model(self) -> Result<Reception> {
        Ok(Reception {
            id: ReceptionId::from_uuid(self.id),
            date_time: self.date_time,
            pickup_point_id: PickupPointId::from_uuid(self.pvz_id),
            status: self
                .status
                .parse()
                .map_err(|e: domain::DomainError| StoreError::Decode(e.to_string()))?,
        })
    }
}

impl PgStore {
    /// Creates a new PostgreSQL store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Resolves the open reception of a pickup point and locks its row, so
    /// a concurrent close or sibling mutation waits until this transaction
    /// finishes.
    async fn lock_open_reception(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pickup_point_id: PickupPointId,
    ) -> Result<Uuid> {
        let id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM receptions
            WHERE pvz_id = $1 AND status = 'in_progress'
            ORDER BY date_time DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(pickup_point_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await?;

        id.ok_or(StoreError::NoOpenReception)
    }
}

#[async_trait]
impl PickupPointStore for PgStore {
    async fn create_pickup_point(&self, point: &PickupPoint) -> Result<()> {
        sqlx::query(
            "INSERT INTO pickup_points (id, registration_date, city) VALUES ($1, $2, $3)",
        )
        .bind(point.id.as_uuid())
        .bind(point.registration_date)
        .bind(point.city.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return StoreError::DuplicatePickupPoint;
                }
            }
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn list_pickup_points(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<PickupPointWithReceptions>> {
        // Pagination applies to pickup points, so the page is selected in a
        // CTE before the joins fan rows out. Without date bounds the joins
        // are outer ones and pickup points with no receptions survive; with
        // bounds the receptions join turns inner and the WHERE drops
        // receptions outside the range. Products are never filtered.
        let base = r#"
            WITH page AS (
                SELECT id
                FROM pickup_points
                ORDER BY registration_date DESC
                LIMIT $1
                OFFSET $2
            )
            SELECT
                p.id,
                p.registration_date,
                p.city,
                r.id AS reception_id,
                r.date_time AS reception_date,
                r.status AS reception_status,
                pr.id AS product_id,
                pr.date_time AS product_date,
                pr.type AS product_type
            FROM page pg
            INNER JOIN pickup_points p ON pg.id = p.id
        "#;

        let tail = r#"
            ORDER BY p.registration_date DESC, p.id,
                     r.date_time DESC, r.id,
                     pr.date_time, pr.id
        "#;

        let sql = if filter.has_date_bounds() {
            format!(
                "{base}
                INNER JOIN receptions r ON p.id = r.pvz_id
                LEFT JOIN products pr ON r.id = pr.reception_id
                WHERE ($3::timestamptz IS NULL OR r.date_time >= $3)
                  AND ($4::timestamptz IS NULL OR r.date_time <= $4)
                {tail}"
            )
        } else {
            format!(
                "{base}
                LEFT JOIN receptions r ON p.id = r.pvz_id
                LEFT JOIN products pr ON r.id = pr.reception_id
                {tail}"
            )
        };

        let mut query = sqlx::query_as::<_, ListedRow>(&sql)
            .bind(filter.page_size)
            .bind(filter.offset());

        if filter.has_date_bounds() {
            query = query.bind(filter.start_date).bind(filter.end_date);
        }

        let mut rows = query.fetch(&self.pool);
        let mut builder = TreeBuilder::new();

        while let Some(row) = rows.try_next().await? {
            builder.push(row)?;
        }

        Ok(builder.finish())
    }

    async fn all_pickup_points(&self) -> Result<Vec<PickupPoint>> {
        #[derive(sqlx::FromRow)]
        struct PointRow {
            id: Uuid,
            registration_date: DateTime<Utc>,
            city: String,
        }

        let rows: Vec<PointRow> = sqlx::query_as(
            "SELECT id, registration_date, city FROM pickup_points ORDER BY registration_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(PickupPoint {
                    id: PickupPointId::from_uuid(row.id),
                    registration_date: row.registration_date,
                    city: row
                        .city
                        .parse()
                        .map_err(|e: domain::DomainError| StoreError::Decode(e.to_string()))?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ReceptionStore for PgStore {
    async fn open_reception(&self, reception: &Reception) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Locking the pickup-point row serializes concurrent opens on the
        // same point: the second transaction blocks here and then observes
        // the first one's committed reception. The existence check and the
        // open-reception check stay separate queries so the caller gets the
        // more specific error.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM pickup_points WHERE id = $1 FOR UPDATE")
                .bind(reception.pickup_point_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(StoreError::PickupPointMissing);
        }

        let open_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM receptions WHERE pvz_id = $1 AND status = 'in_progress')",
        )
        .bind(reception.pickup_point_id.as_uuid())
        .fetch_one(&mut *tx)
        .await?;

        if open_exists {
            return Err(StoreError::OpenReceptionExists);
        }

        sqlx::query(
            "INSERT INTO receptions (id, date_time, pvz_id, status) VALUES ($1, $2, $3, $4)",
        )
        .bind(reception.id.as_uuid())
        .bind(reception.date_time)
        .bind(reception.pickup_point_id.as_uuid())
        .bind(reception.status.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn close_last_reception(&self, pickup_point_id: PickupPointId) -> Result<Reception> {
        // A single conditional update: the WHERE re-evaluates the open
        // condition at write time, so no explicit lock is needed here.
        let row: Option<ReceptionRow> = sqlx::query_as(
            r#"
            UPDATE receptions
            SET status = 'close'
            WHERE pvz_id = $1 AND status = 'in_progress'
            RETURNING id, date_time, pvz_id, status
            "#,
        )
        .bind(pickup_point_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_model(),
            None => Err(StoreError::NoOpenReception),
        }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn add_product(&self, product: &NewProduct) -> Result<Product> {
        let mut tx = self.pool.begin().await?;

        let reception_id = self
            .lock_open_reception(&mut tx, product.pickup_point_id)
            .await?;

        sqlx::query("INSERT INTO products (id, date_time, type, reception_id) VALUES ($1, $2, $3, $4)")
            .bind(product.id.as_uuid())
            .bind(product.date_time)
            .bind(product.product_type.as_str())
            .bind(reception_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Product {
            id: product.id,
            date_time: product.date_time,
            product_type: product.product_type,
            reception_id: ReceptionId::from_uuid(reception_id),
        })
    }

    async fn remove_last_product(&self, pickup_point_id: PickupPointId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let reception_id = self.lock_open_reception(&mut tx, pickup_point_id).await?;

        // Latest product first; identifier breaks creation-timestamp ties.
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = (
                SELECT id FROM products
                WHERE reception_id = $1
                ORDER BY date_time DESC, id DESC
                LIMIT 1
            )
            "#,
        )
        .bind(reception_id)
        .execute(&mut *tx)
        .await?;

        let affected = result.rows_affected();
        tracing::debug!(affected, "deleted last product from open reception");

        if affected == 0 {
            return Err(StoreError::NoProductsInReception);
        }

        tx.commit().await?;
        Ok(())
    }
}
