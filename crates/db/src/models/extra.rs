//! Asset extras: optional add-ons priced per day, per booking or per hour.

use harbor_core::booking::{CatalogExtra, PricingMode};
use harbor_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `asset_extras` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetExtra {
    pub id: DbId,
    pub asset_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub pricing_mode: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AssetExtra {
    /// Catalog entry for the quote calculator. Rows with an unknown pricing
    /// mode cannot exist (`ck_asset_extras_pricing_mode`) and are skipped.
    pub fn to_catalog(&self) -> Option<CatalogExtra> {
        let pricing_mode = self.pricing_mode.parse::<PricingMode>().ok()?;
        Some(CatalogExtra {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            pricing_mode,
        })
    }
}

/// Request body for `POST /assets/{id}/extras`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExtra {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 100000000, message = "Price must be between 1 and 100000000 cents"))]
    pub price: Money,
    pub pricing_mode: PricingMode,
}

/// Request body for `PUT /assets/{id}/extras/{extra_id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateExtra {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 100000000))]
    pub price: Option<Money>,
    pub pricing_mode: Option<PricingMode>,
    pub is_active: Option<bool>,
}
