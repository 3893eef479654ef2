//! Repository for the `asset_extras` table.

use harbor_core::types::DbId;
use sqlx::PgPool;

use crate::models::extra::{AssetExtra, CreateExtra, UpdateExtra};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, asset_id, name, description, price, pricing_mode, is_active, created_at, updated_at";

/// Provides CRUD operations for an asset's extras catalog.
pub struct ExtraRepo;

impl ExtraRepo {
    pub async fn create(pool: &PgPool, asset_id: DbId, input: &CreateExtra) -> Result<AssetExtra, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_extras (asset_id, name, description, price, pricing_mode) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetExtra>(&query)
            .bind(asset_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.pricing_mode.as_str())
            .fetch_one(pool)
            .await
    }

    /// The asset's active extras catalog, in creation order.
    pub async fn list_active_by_asset(pool: &PgPool, asset_id: DbId) -> Result<Vec<AssetExtra>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM asset_extras \
             WHERE asset_id = $1 AND is_active \
             ORDER BY id"
        );
        sqlx::query_as::<_, AssetExtra>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        asset_id: DbId,
        extra_id: DbId,
        input: &UpdateExtra,
    ) -> Result<Option<AssetExtra>, sqlx::Error> {
        let query = format!(
            "UPDATE asset_extras SET \
                 name = COALESCE($3, name), \
                 description = COALESCE($4, description), \
                 price = COALESCE($5, price), \
                 pricing_mode = COALESCE($6, pricing_mode), \
                 is_active = COALESCE($7, is_active) \
             WHERE id = $1 AND asset_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetExtra>(&query)
            .bind(extra_id)
            .bind(asset_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.pricing_mode.map(|m| m.as_str()))
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Retire an extra from the catalog. Rows stay so past bookings keep
    /// their reference.
    pub async fn deactivate(pool: &PgPool, asset_id: DbId, extra_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE asset_extras SET is_active = FALSE \
             WHERE id = $1 AND asset_id = $2 AND is_active",
        )
        .bind(extra_id)
        .bind(asset_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
