//! # Load Repository
//!
//! Persistence boundary for the [`Load`] entity. The orchestration layer
//! only sees the [`LoadRepository`] trait; [`PgLoadRepository`] is the
//! Postgres implementation backing it. Attribute bags are stored and
//! retrieved as opaque JSONB without reinterpretation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{FreightError, Result};
use crate::models::{Load, NewLoad};

/// Persistence contract consumed by the orchestrator.
#[async_trait]
pub trait LoadRepository: Send + Sync {
    /// Persist a new load, returning the stored row with generated id and
    /// timestamps.
    async fn save(&self, new_load: NewLoad) -> Result<Load>;

    /// Fetch a load by id. A miss is a distinguishable
    /// [`FreightError::NotFound`].
    async fn find_by_id(&self, id: Uuid) -> Result<Load>;

    /// Total number of persisted loads.
    async fn count(&self) -> Result<i64>;

    /// Fetch one page of loads ordered by creation time.
    async fn find_page(&self, offset: i64, limit: i64) -> Result<Vec<Load>>;

    /// Record the external TMS id for a load that was persisted unsynced.
    /// The id is set at most once; a load that already carries one is left
    /// untouched.
    async fn update_external_id(&self, id: Uuid, external_id: &str) -> Result<()>;
}

const LOAD_COLUMNS: &str = "id, external_tms_load_id, freight_load_id, status, customer, bill_to, \
     pickup, consignee, carrier, rate_data, specifications, in_pallet_count, out_pallet_count, \
     num_commodities, total_weight, billable_weight, po_nums, operator, route_miles, \
     created_at, updated_at";

/// Postgres-backed [`LoadRepository`].
pub struct PgLoadRepository {
    pool: PgPool,
}

impl PgLoadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS freight_loads (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                external_tms_load_id VARCHAR(100) NOT NULL DEFAULT '',
                freight_load_id VARCHAR(100) NOT NULL,
                status JSONB NOT NULL DEFAULT '{}'::jsonb,
                customer JSONB NOT NULL DEFAULT 'null'::jsonb,
                bill_to JSONB NOT NULL DEFAULT 'null'::jsonb,
                pickup JSONB NOT NULL DEFAULT 'null'::jsonb,
                consignee JSONB NOT NULL DEFAULT 'null'::jsonb,
                carrier JSONB NOT NULL DEFAULT 'null'::jsonb,
                rate_data JSONB NOT NULL DEFAULT 'null'::jsonb,
                specifications JSONB NOT NULL DEFAULT 'null'::jsonb,
                in_pallet_count INTEGER NOT NULL DEFAULT 0,
                out_pallet_count INTEGER NOT NULL DEFAULT 0,
                num_commodities INTEGER NOT NULL DEFAULT 0,
                total_weight DOUBLE PRECISION NOT NULL DEFAULT 0,
                billable_weight DOUBLE PRECISION NOT NULL DEFAULT 0,
                po_nums VARCHAR(255) NOT NULL DEFAULT '',
                operator VARCHAR(100) NOT NULL DEFAULT '',
                route_miles DOUBLE PRECISION NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| FreightError::persistence("ensure_schema", e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl LoadRepository for PgLoadRepository {
    async fn save(&self, new_load: NewLoad) -> Result<Load> {
        let sql = format!(
            "INSERT INTO freight_loads (
                external_tms_load_id, freight_load_id, status, customer, bill_to,
                pickup, consignee, carrier, rate_data, specifications,
                in_pallet_count, out_pallet_count, num_commodities,
                total_weight, billable_weight, po_nums, operator, route_miles
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {LOAD_COLUMNS}"
        );

        let load = sqlx::query_as::<_, Load>(&sql)
            .bind(&new_load.external_tms_load_id)
            .bind(&new_load.freight_load_id)
            .bind(&new_load.status)
            .bind(&new_load.customer)
            .bind(&new_load.bill_to)
            .bind(&new_load.pickup)
            .bind(&new_load.consignee)
            .bind(&new_load.carrier)
            .bind(&new_load.rate_data)
            .bind(&new_load.specifications)
            .bind(new_load.in_pallet_count)
            .bind(new_load.out_pallet_count)
            .bind(new_load.num_commodities)
            .bind(new_load.total_weight)
            .bind(new_load.billable_weight)
            .bind(&new_load.po_nums)
            .bind(&new_load.operator)
            .bind(new_load.route_miles)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| FreightError::persistence("save", e.to_string()))?;

        Ok(load)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Load> {
        let sql = format!("SELECT {LOAD_COLUMNS} FROM freight_loads WHERE id = $1");

        let load = sqlx::query_as::<_, Load>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| FreightError::persistence("find_by_id", e.to_string()))?;

        load.ok_or_else(|| FreightError::not_found("Load", id.to_string()))
    }

    async fn count(&self) -> Result<i64> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM freight_loads")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| FreightError::persistence("count", e.to_string()))?;

        Ok(total.0)
    }

    async fn find_page(&self, offset: i64, limit: i64) -> Result<Vec<Load>> {
        let sql = format!(
            "SELECT {LOAD_COLUMNS} FROM freight_loads
             ORDER BY created_at, id
             OFFSET $1 LIMIT $2"
        );

        let loads = sqlx::query_as::<_, Load>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| FreightError::persistence("find_page", e.to_string()))?;

        Ok(loads)
    }

    async fn update_external_id(&self, id: Uuid, external_id: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE freight_loads
             SET external_tms_load_id = $2, updated_at = NOW()
             WHERE id = $1 AND external_tms_load_id = ''",
        )
        .bind(id)
        .bind(external_id)
        .execute(&self.pool)
        .await
        .map_err(|e| FreightError::persistence("update_external_id", e.to_string()))?;

        if result.rows_affected() == 0 {
            // Either the load does not exist or its external id was already
            // recorded; distinguish for the caller.
            self.find_by_id(id).await?;
        }

        Ok(())
    }
}
