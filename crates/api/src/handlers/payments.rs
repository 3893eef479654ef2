//! Handlers for the `/payments` resource.
//!
//! Payments are settled by a mock processor that always succeeds; a paid
//! booking is confirmed in the same transaction as the payment row. Refunds
//! are issued by the asset owner once the booking is cancelled.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use harbor_core::access::{authorize, Action, Resource};
use harbor_core::booking::BookingTransition;
use harbor_core::error::CoreError;
use harbor_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use harbor_core::payment::ensure_refundable;
use harbor_core::types::DbId;
use harbor_db::models::booking::Booking;
use harbor_db::models::payment::{CreatePayment, NewPayment, Payment, PaymentListParams};
use harbor_db::repositories::PaymentRepo;
use harbor_db::DbPool;
use uuid::Uuid;

use super::bookings::{booking_resource, load_booking};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Transaction id issued by the mock processor.
fn mock_transaction_id() -> String {
    format!("mock_txn_{}", Uuid::new_v4().simple())
}

fn payment_resource(payment: &Payment, booking: &Booking) -> Resource {
    Resource::Payment {
        payer_id: payment.payer_id,
        owner_id: booking.owner_id,
    }
}

async fn load_payment(pool: &DbPool, id: DbId) -> AppResult<(Payment, Booking)> {
    let payment = PaymentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Payment", id }))?;
    let booking = load_booking(pool, payment.booking_id).await?;
    Ok((payment, booking))
}

/// POST /api/v1/payments
pub async fn create_payment(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreatePayment>,
) -> AppResult<impl IntoResponse> {
    let booking = load_booking(&state.pool, input.booking_id).await?;
    authorize(&auth.subject(), Action::PayBooking, &booking_resource(&booking))?;

    // Paying confirms the booking, so it must still be confirmable.
    BookingTransition::Confirm.apply(booking.status())?;

    if PaymentRepo::find_by_booking(&state.pool, booking.id).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "This booking has already been paid".into(),
        )));
    }
    if input.amount != booking.total_price {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Payment amount must equal the booking total of {}",
            booking.total_price
        ))));
    }

    let new_payment = NewPayment {
        booking_id: booking.id,
        payer_id: auth.user_id,
        amount: input.amount,
        payment_method: input.payment_method,
        transaction_id: mock_transaction_id(),
    };

    let (payment, confirmed) = PaymentRepo::create_and_confirm(&state.pool, &new_payment)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Booking status changed concurrently, reload and retry".into(),
            ))
        })?;

    tracing::info!(
        payment_id = payment.id,
        booking_id = confirmed.id,
        transaction_id = %payment.transaction_id,
        "Payment settled, booking confirmed",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: payment })))
}

/// GET /api/v1/payments?status=
///
/// Payments made by the caller, newest first.
pub async fn list_my_payments(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaymentListParams>,
) -> AppResult<impl IntoResponse> {
    let payments = PaymentRepo::list_by_payer(
        &state.pool,
        auth.user_id,
        params.status,
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;

    Ok(Json(DataResponse { data: payments }))
}

/// GET /api/v1/payments/{id}
pub async fn get_payment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (payment, booking) = load_payment(&state.pool, id).await?;
    authorize(&auth.subject(), Action::ViewPayment, &payment_resource(&payment, &booking))?;

    Ok(Json(DataResponse { data: payment }))
}

/// GET /api/v1/bookings/{id}/payment
pub async fn get_booking_payment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = load_booking(&state.pool, booking_id).await?;
    authorize(&auth.subject(), Action::ViewBooking, &booking_resource(&booking))?;

    let payment = PaymentRepo::find_by_booking(&state.pool, booking_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Payment for booking",
                id: booking_id,
            })
        })?;
    authorize(&auth.subject(), Action::ViewPayment, &payment_resource(&payment, &booking))?;

    Ok(Json(DataResponse { data: payment }))
}

/// POST /api/v1/payments/{id}/refund
///
/// Owner or admin only. The booking must be cancelled and the payment
/// completed; the processor is mocked, so the refund settles immediately.
pub async fn refund_payment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (payment, booking) = load_payment(&state.pool, id).await?;
    authorize(&auth.subject(), Action::RefundPayment, &payment_resource(&payment, &booking))?;
    ensure_refundable(payment.status(), booking.status())?;

    let refunded = PaymentRepo::refund(&state.pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Payment status changed concurrently, reload and retry".into(),
        ))
    })?;

    tracing::info!(
        payment_id = refunded.id,
        booking_id = refunded.booking_id,
        refunded_by = auth.user_id,
        amount = refunded.amount,
        "Payment refunded",
    );

    Ok(Json(DataResponse { data: refunded }))
}
