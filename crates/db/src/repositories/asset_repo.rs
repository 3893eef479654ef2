//! Repository for the `assets` table.

use harbor_core::booking::ACTIVE_STATUS_IDS;
use harbor_core::review::ReviewTarget;
use harbor_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{Asset, AssetSearchParams, CreateAsset, UpdateAsset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, owner_id, name, description, kind, location, capacity, daily_price, \
    weekly_price, skipper_required, skipper_available, skipper_daily_rate, \
    required_license_level, is_active, created_at, updated_at";

/// Provides CRUD and search operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset owned by `owner_id`, returning the created row.
    pub async fn create(pool: &PgPool, owner_id: DbId, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets \
                 (owner_id, name, description, kind, location, capacity, daily_price, \
                  weekly_price, skipper_required, skipper_available, skipper_daily_rate, \
                  required_license_level) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.kind)
            .bind(&input.location)
            .bind(input.capacity)
            .bind(input.daily_price)
            .bind(input.weekly_price)
            .bind(input.skipper_required)
            .bind(input.skipper_available)
            .bind(input.skipper_daily_rate)
            .bind(input.required_license_level)
            .fetch_one(pool)
            .await
    }

    /// Find an active asset by ID. Deactivated assets are invisible.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1 AND is_active");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Average verified asset rating (one decimal) and review count.
    pub async fn rating_summary(pool: &PgPool, id: DbId) -> Result<(f64, i64), sqlx::Error> {
        sqlx::query_as::<_, (f64, i64)>(
            "SELECT COALESCE(ROUND(AVG(rating)::numeric, 1)::float8, 0), COUNT(*) \
             FROM reviews \
             WHERE target_type = $1 AND target_id = $2 AND is_verified",
        )
        .bind(ReviewTarget::Asset.as_str())
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Search active assets. Every filter is optional; the availability
    /// filter applies only when both `start` and `end` are given.
    pub async fn search(
        pool: &PgPool,
        params: &AssetSearchParams,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let location_pattern = params.location.as_ref().map(|l| format!("%{l}%"));
        let query = format!(
            "SELECT {COLUMNS} FROM assets a \
             WHERE a.is_active \
               AND ($1::TEXT IS NULL OR a.kind = $1) \
               AND ($2::BIGINT IS NULL OR a.daily_price >= $2) \
               AND ($3::BIGINT IS NULL OR a.daily_price <= $3) \
               AND ($4::INTEGER IS NULL OR a.capacity >= $4) \
               AND ($5::TEXT IS NULL OR a.location ILIKE $5) \
               AND ($6::BOOLEAN IS NULL OR a.skipper_available = $6) \
               AND ($7::TIMESTAMPTZ IS NULL OR $8::TIMESTAMPTZ IS NULL OR NOT EXISTS ( \
                   SELECT 1 FROM bookings b \
                   WHERE b.asset_id = a.id \
                     AND b.status_id = ANY($9) \
                     AND b.start_at <= $8 AND b.end_at >= $7 \
               )) \
             ORDER BY a.created_at DESC, a.id DESC \
             LIMIT $10 OFFSET $11"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&params.kind)
            .bind(params.min_price)
            .bind(params.max_price)
            .bind(params.min_capacity)
            .bind(location_pattern)
            .bind(params.skipper_available)
            .bind(params.start)
            .bind(params.end)
            .bind(&ACTIVE_STATUS_IDS[..])
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update an asset. Absent fields keep their current value.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateAsset) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 kind = COALESCE($4, kind), \
                 location = COALESCE($5, location), \
                 capacity = COALESCE($6, capacity), \
                 daily_price = COALESCE($7, daily_price), \
                 weekly_price = COALESCE($8, weekly_price), \
                 skipper_required = COALESCE($9, skipper_required), \
                 skipper_available = COALESCE($10, skipper_available), \
                 skipper_daily_rate = COALESCE($11, skipper_daily_rate), \
                 required_license_level = COALESCE($12, required_license_level) \
             WHERE id = $1 AND is_active \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.kind)
            .bind(&input.location)
            .bind(input.capacity)
            .bind(input.daily_price)
            .bind(input.weekly_price)
            .bind(input.skipper_required)
            .bind(input.skipper_available)
            .bind(input.skipper_daily_rate)
            .bind(input.required_license_level)
            .fetch_optional(pool)
            .await
    }

    /// Whether the asset has any requested or confirmed booking.
    pub async fn has_active_bookings(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM bookings WHERE asset_id = $1 AND status_id = ANY($2))",
        )
        .bind(id)
        .bind(&ACTIVE_STATUS_IDS[..])
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Soft-delete an asset by clearing `is_active`.
    ///
    /// Returns `true` if an active asset was deactivated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE assets SET is_active = FALSE WHERE id = $1 AND is_active")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every asset of `owner_id`, deactivated ones included, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
