//! Repository for the `users` table.

use chrono::NaiveDate;
use harbor_core::booking::ACTIVE_STATUS_IDS;
use harbor_core::review::ReviewTarget;
use harbor_core::roles::ROLE_SKIPPER;
use harbor_core::types::{DbId, Money, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUser, SkipperSummary, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, email, name, password_hash, role, license_level, license_number, \
    license_expires_on, skipper_bio, skipper_experience_years, \
    skipper_daily_rate, skipper_rating, is_active, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with a unique violation on `uq_users_email` if the email is taken.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, name, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find an active user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND is_active");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active user by email (login lookup).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1 AND is_active");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Replace the user's license record.
    pub async fn update_license(
        pool: &PgPool,
        id: DbId,
        level: i16,
        license_number: Option<&str>,
        expires_on: Option<NaiveDate>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                 license_level = $2, \
                 license_number = $3, \
                 license_expires_on = $4 \
             WHERE id = $1 AND is_active \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(level)
            .bind(license_number)
            .bind(expires_on)
            .fetch_optional(pool)
            .await
    }

    /// Update a skipper's public profile. Only rows with the skipper role match.
    pub async fn update_skipper_profile(
        pool: &PgPool,
        id: DbId,
        daily_rate: Money,
        bio: Option<&str>,
        experience_years: Option<i32>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                 skipper_daily_rate = $2, \
                 skipper_bio = COALESCE($3, skipper_bio), \
                 skipper_experience_years = COALESCE($4, skipper_experience_years) \
             WHERE id = $1 AND role = $5 AND is_active \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(daily_rate)
            .bind(bio)
            .bind(experience_years)
            .bind(ROLE_SKIPPER)
            .fetch_optional(pool)
            .await
    }

    /// List skippers with a daily rate and no active booking overlapping
    /// `[start, end]` (inclusive), best rated first.
    pub async fn list_available_skippers(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SkipperSummary>, sqlx::Error> {
        sqlx::query_as::<_, SkipperSummary>(
            "SELECT u.id, u.name, u.skipper_bio, u.skipper_experience_years, \
                    u.skipper_daily_rate, u.skipper_rating \
             FROM users u \
             WHERE u.role = $1 AND u.is_active AND u.skipper_daily_rate IS NOT NULL \
               AND NOT EXISTS ( \
                   SELECT 1 FROM bookings b \
                   WHERE b.skipper_id = u.id \
                     AND b.status_id = ANY($2) \
                     AND b.start_at <= $4 AND b.end_at >= $3 \
               ) \
             ORDER BY u.skipper_rating DESC, u.id \
             LIMIT $5 OFFSET $6",
        )
        .bind(ROLE_SKIPPER)
        .bind(&ACTIVE_STATUS_IDS[..])
        .bind(start)
        .bind(end)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Recompute `skipper_rating` from the skipper's verified reviews.
    pub async fn refresh_skipper_rating<'e, E>(executor: E, skipper_id: DbId) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "UPDATE users SET skipper_rating = COALESCE(( \
                 SELECT ROUND(AVG(rating)::numeric, 1)::float8 FROM reviews \
                 WHERE target_type = $2 AND target_id = $1 AND is_verified \
             ), 0) \
             WHERE id = $1",
        )
        .bind(skipper_id)
        .bind(ReviewTarget::Skipper.as_str())
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Replace the password hash. Returns `true` if the user exists.
    pub async fn update_password(pool: &PgPool, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1 AND is_active")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Public profile of an active skipper.
    pub async fn find_skipper(pool: &PgPool, id: DbId) -> Result<Option<SkipperSummary>, sqlx::Error> {
        sqlx::query_as::<_, SkipperSummary>(
            "SELECT id, name, skipper_bio, skipper_experience_years, \
                    skipper_daily_rate, skipper_rating \
             FROM users \
             WHERE id = $1 AND role = $2 AND is_active",
        )
        .bind(id)
        .bind(ROLE_SKIPPER)
        .fetch_optional(pool)
        .await
    }
}
