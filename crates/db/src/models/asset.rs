//! Asset model and DTOs.

use harbor_core::booking::{AssetRates, LicenseLevel};
use harbor_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub location: String,
    pub capacity: i32,
    pub daily_price: Money,
    pub weekly_price: Option<Money>,
    pub skipper_required: bool,
    pub skipper_available: bool,
    pub skipper_daily_rate: Option<Money>,
    pub required_license_level: i16,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Asset {
    /// Price-relevant fields for the quote calculator.
    pub fn rates(&self) -> AssetRates {
        AssetRates {
            daily_price: self.daily_price,
            weekly_price: self.weekly_price,
            skipper_available: self.skipper_available,
            skipper_daily_rate: self.skipper_daily_rate,
        }
    }

    /// Minimum license a renter needs to take the asset out without a skipper.
    /// Unknown ordinals are treated as the strictest level.
    pub fn required_license(&self) -> LicenseLevel {
        LicenseLevel::from_ordinal(self.required_license_level)
            .unwrap_or(LicenseLevel::Professional)
    }
}

/// Asset detail with its average verified rating.
#[derive(Debug, Clone, Serialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: Asset,
    pub avg_rating: f64,
    pub review_count: i64,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST /assets`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub kind: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(range(min = 1))]
    pub capacity: i32,
    #[validate(range(min = 1, max = 100000000, message = "Daily price must be between 1 and 100000000 cents"))]
    pub daily_price: Money,
    #[validate(range(min = 1, max = 100000000, message = "Weekly price must be between 1 and 100000000 cents"))]
    pub weekly_price: Option<Money>,
    #[serde(default)]
    pub skipper_required: bool,
    #[serde(default)]
    pub skipper_available: bool,
    #[validate(range(min = 1, max = 100000000))]
    pub skipper_daily_rate: Option<Money>,
    #[serde(default)]
    #[validate(range(min = 0, max = 4, message = "License level must be 0-4"))]
    pub required_license_level: i16,
}

/// Request body for `PUT /assets/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub kind: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    #[validate(range(min = 1, max = 100000000))]
    pub daily_price: Option<Money>,
    #[validate(range(min = 1, max = 100000000))]
    pub weekly_price: Option<Money>,
    pub skipper_required: Option<bool>,
    pub skipper_available: Option<bool>,
    #[validate(range(min = 1, max = 100000000))]
    pub skipper_daily_rate: Option<Money>,
    #[validate(range(min = 0, max = 4, message = "License level must be 0-4"))]
    pub required_license_level: Option<i16>,
}

/// Query parameters for `GET /assets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetSearchParams {
    pub kind: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub min_capacity: Option<i32>,
    /// Case-insensitive substring of `location`.
    pub location: Option<String>,
    pub skipper_available: Option<bool>,
    /// When both are set, assets with an overlapping active booking are excluded.
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
