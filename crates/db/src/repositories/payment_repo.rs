//! Repository for the `payments` table.

use harbor_core::booking::BookingStatus;
use harbor_core::payment::{PaymentStatus, DEFAULT_CURRENCY};
use harbor_core::types::DbId;
use sqlx::PgPool;

use crate::models::booking::Booking;
use crate::models::payment::{NewPayment, Payment};
use crate::repositories::BookingRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, booking_id, payer_id, amount, currency, payment_method, status, \
    transaction_id, paid_at, created_at, updated_at";

/// Provides payment persistence.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a settled payment and confirm its booking atomically.
    ///
    /// Returns `None` (and writes nothing) when the booking is no longer
    /// `requested`. A second payment for the same booking fails with a
    /// unique violation on `uq_payments_booking_id`.
    pub async fn create_and_confirm(
        pool: &PgPool,
        input: &NewPayment,
    ) -> Result<Option<(Payment, Booking)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO payments \
                 (booking_id, payer_id, amount, currency, payment_method, status, transaction_id, paid_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) \
             RETURNING {COLUMNS}"
        );
        let payment = sqlx::query_as::<_, Payment>(&query)
            .bind(input.booking_id)
            .bind(input.payer_id)
            .bind(input.amount)
            .bind(DEFAULT_CURRENCY)
            .bind(&input.payment_method)
            .bind(PaymentStatus::Completed.as_str())
            .bind(&input.transaction_id)
            .fetch_one(&mut *tx)
            .await?;

        let booking = BookingRepo::transition(
            &mut *tx,
            input.booking_id,
            BookingStatus::Requested,
            BookingStatus::Confirmed,
            None,
        )
        .await?;

        match booking {
            Some(booking) => {
                tx.commit().await?;
                Ok(Some((payment, booking)))
            }
            None => Ok(None),
        }
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_booking(pool: &PgPool, booking_id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE booking_id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(booking_id)
            .fetch_optional(pool)
            .await
    }

    /// Payments made by `payer_id`, newest first, optionally by status.
    pub async fn list_by_payer(
        pool: &PgPool,
        payer_id: DbId,
        status: Option<PaymentStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments \
             WHERE payer_id = $1 AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(payer_id)
            .bind(status.map(PaymentStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a completed payment as refunded.
    ///
    /// Returns `None` when the payment is no longer `completed`, so two
    /// concurrent refunds settle only once.
    pub async fn refund(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments SET status = $2 \
             WHERE id = $1 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(PaymentStatus::Refunded.as_str())
            .bind(PaymentStatus::Completed.as_str())
            .fetch_optional(pool)
            .await
    }
}
