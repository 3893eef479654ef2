//! Payment model and DTOs. Payments go through a mock processor.

use harbor_core::payment::PaymentStatus;
use harbor_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub booking_id: DbId,
    pub payer_id: DbId,
    pub amount: Money,
    pub currency: String,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: String,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payment {
    /// Parsed status. Values outside the check constraint read as `Failed`.
    pub fn status(&self) -> PaymentStatus {
        self.status.parse().unwrap_or(PaymentStatus::Failed)
    }
}

/// Request body for `POST /payments`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePayment {
    pub booking_id: DbId,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: Money,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
}

/// A settled payment ready for insertion.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub booking_id: DbId,
    pub payer_id: DbId,
    pub amount: Money,
    pub payment_method: String,
    pub transaction_id: String,
}

/// Query parameters for `GET /payments` (the caller's own payments).
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentListParams {
    pub status: Option<PaymentStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
