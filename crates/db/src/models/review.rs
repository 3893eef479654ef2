//! Review model and DTOs.

use harbor_core::review::ReviewTarget;
use harbor_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub booking_id: DbId,
    pub author_id: DbId,
    pub target_type: String,
    pub target_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    pub is_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /reviews`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReview {
    pub booking_id: DbId,
    pub target_type: ReviewTarget,
    pub target_id: DbId,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Request body for `PUT /reviews/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Query parameters for `GET /reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewListParams {
    pub target_type: ReviewTarget,
    pub target_id: DbId,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
