//! Repository for the `bookings` and `booking_extras` tables.
//!
//! Inserts re-check both calendars inside the transaction; the exclusion
//! constraints `ex_bookings_asset_no_overlap` and
//! `ex_bookings_skipper_no_overlap` reject whatever a concurrent writer
//! slips in between the check and the insert (SQLSTATE `23P01`).

use harbor_core::booking::{BookingStatus, DateRange, ReservedSpan, ACTIVE_STATUS_IDS};
use harbor_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::booking::{
    Booking, BookingExtra, BookingPerspective, BookingSpan, CalendarKey, CreateBookingOutcome,
    NewBooking,
};

/// Booking columns, qualified for queries joining `bookings b` with `assets a`.
const COLUMNS: &str = "\
    b.id, b.asset_id, a.owner_id, b.renter_id, b.skipper_id, b.start_at, b.end_at, \
    b.status_id, b.with_skipper, b.days, b.asset_price, b.skipper_price, \
    b.extras_price, b.total_price, b.renter_license_level, b.renter_notes, \
    b.owner_notes, b.created_at, b.updated_at";

const EXTRA_COLUMNS: &str = "id, booking_id, extra_id, quantity, price_at_booking, total, created_at";

/// Provides booking persistence and calendar queries.
pub struct BookingRepo;

impl BookingRepo {
    /// Find a booking by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Booking>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings b JOIN assets a ON a.id = b.asset_id WHERE b.id = $1"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Active reservations on `calendar` overlapping `range` (inclusive bounds).
    pub async fn find_active_overlapping<'e, E>(
        executor: E,
        calendar: CalendarKey,
        range: &DateRange,
    ) -> Result<Vec<ReservedSpan>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (column, key) = match calendar {
            CalendarKey::Asset(id) => ("asset_id", id),
            CalendarKey::Skipper(id) => ("skipper_id", id),
        };
        let query = format!(
            "SELECT id, start_at, end_at, status_id FROM bookings \
             WHERE {column} = $1 \
               AND status_id = ANY($2) \
               AND start_at <= $4 AND end_at >= $3 \
             ORDER BY start_at"
        );
        let spans = sqlx::query_as::<_, BookingSpan>(&query)
            .bind(key)
            .bind(&ACTIVE_STATUS_IDS[..])
            .bind(range.start())
            .bind(range.end())
            .fetch_all(executor)
            .await?;
        Ok(spans.into_iter().map(ReservedSpan::from).collect())
    }

    /// Insert a priced booking and its extras in one transaction, after
    /// re-checking the asset's and (when set) the skipper's calendars.
    ///
    /// A calendar conflict seen here is returned as an outcome; one caused
    /// by a concurrent commit surfaces as a `23P01` database error.
    pub async fn create_checked(pool: &PgPool, input: &NewBooking) -> Result<CreateBookingOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let asset_conflicts =
            Self::find_active_overlapping(&mut *tx, CalendarKey::Asset(input.asset_id), &input.range).await?;
        if !asset_conflicts.is_empty() {
            return Ok(CreateBookingOutcome::AssetUnavailable(asset_conflicts));
        }

        if let Some(skipper_id) = input.skipper_id {
            let skipper_conflicts =
                Self::find_active_overlapping(&mut *tx, CalendarKey::Skipper(skipper_id), &input.range).await?;
            if !skipper_conflicts.is_empty() {
                return Ok(CreateBookingOutcome::SkipperUnavailable(skipper_conflicts));
            }
        }

        let (booking_id,): (DbId,) = sqlx::query_as(
            "INSERT INTO bookings \
                 (asset_id, renter_id, skipper_id, start_at, end_at, status_id, with_skipper, \
                  days, asset_price, skipper_price, extras_price, total_price, \
                  renter_license_level, renter_notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING id",
        )
        .bind(input.asset_id)
        .bind(input.renter_id)
        .bind(input.skipper_id)
        .bind(input.range.start())
        .bind(input.range.end())
        .bind(BookingStatus::Requested.id())
        .bind(input.with_skipper)
        .bind(input.days)
        .bind(input.asset_price)
        .bind(input.skipper_price)
        .bind(input.extras_price)
        .bind(input.total_price)
        .bind(input.renter_license_level)
        .bind(&input.renter_notes)
        .fetch_one(&mut *tx)
        .await?;

        for extra in &input.extras {
            sqlx::query(
                "INSERT INTO booking_extras (booking_id, extra_id, quantity, price_at_booking, total) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(booking_id)
            .bind(extra.extra_id)
            .bind(extra.quantity)
            .bind(extra.price_at_booking)
            .bind(extra.total)
            .execute(&mut *tx)
            .await?;
        }

        let booking = Self::find_by_id(&mut *tx, booking_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;

        tracing::debug!(
            booking_id,
            asset_id = input.asset_id,
            renter_id = input.renter_id,
            "Booking inserted",
        );

        Ok(CreateBookingOutcome::Created(booking))
    }

    /// Move a booking from `from` to `to`.
    ///
    /// The update is guarded on the current status, so a concurrent
    /// transition makes this return `None` instead of overwriting it.
    pub async fn transition<'e, E>(
        executor: E,
        id: DbId,
        from: BookingStatus,
        to: BookingStatus,
        owner_notes: Option<&str>,
    ) -> Result<Option<Booking>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE bookings b SET \
                 status_id = $3, \
                 owner_notes = COALESCE($4, b.owner_notes) \
             FROM assets a \
             WHERE b.id = $1 AND b.status_id = $2 AND a.id = b.asset_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(from.id())
            .bind(to.id())
            .bind(owner_notes)
            .fetch_optional(executor)
            .await
    }

    /// List bookings where `user_id` plays the `perspective` role, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        perspective: BookingPerspective,
        status_id: Option<i16>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let party_column = match perspective {
            BookingPerspective::Renter => "b.renter_id",
            BookingPerspective::Owner => "a.owner_id",
            BookingPerspective::Skipper => "b.skipper_id",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM bookings b JOIN assets a ON a.id = b.asset_id \
             WHERE {party_column} = $1 \
               AND ($2::SMALLINT IS NULL OR b.status_id = $2) \
             ORDER BY b.start_at DESC, b.id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .bind(status_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Extras attached to a booking, with their snapshotted prices.
    pub async fn list_extras(pool: &PgPool, booking_id: DbId) -> Result<Vec<BookingExtra>, sqlx::Error> {
        let query = format!(
            "SELECT {EXTRA_COLUMNS} FROM booking_extras WHERE booking_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, BookingExtra>(&query)
            .bind(booking_id)
            .fetch_all(pool)
            .await
    }

    /// Number of completed bookings crewed by `skipper_id`.
    pub async fn count_completed_for_skipper(pool: &PgPool, skipper_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE skipper_id = $1 AND status_id = $2",
        )
        .bind(skipper_id)
        .bind(BookingStatus::Completed.id())
        .fetch_one(pool)
        .await
    }
}
