//! Repository for the `reviews` table.
//!
//! Writes touching a skipper review also refresh `users.skipper_rating`
//! inside the same transaction.

use harbor_core::review::ReviewTarget;
use harbor_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::review::{CreateReview, Review, UpdateReview};
use crate::repositories::UserRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, booking_id, author_id, target_type, target_id, rating, comment, \
    is_verified, created_at, updated_at";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review by `author_id`.
    ///
    /// A second review of the same target for the same booking fails with a
    /// unique violation on `uq_reviews_booking_author_target`.
    pub async fn create(pool: &PgPool, author_id: DbId, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO reviews (booking_id, author_id, target_type, target_id, rating, comment) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(input.booking_id)
            .bind(author_id)
            .bind(input.target_type.as_str())
            .bind(input.target_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(&mut *tx)
            .await?;
        refresh_target_rating(&mut tx, &review).await?;
        tx.commit().await?;
        Ok(review)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Reviews of one target, newest first.
    pub async fn list_by_target(
        pool: &PgPool,
        target: ReviewTarget,
        target_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews \
             WHERE target_type = $1 AND target_id = $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(target.as_str())
            .bind(target_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update rating and/or comment. Absent fields keep their value.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateReview) -> Result<Option<Review>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE reviews SET \
                 rating = COALESCE($2, rating), \
                 comment = COALESCE($3, comment) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_optional(&mut *tx)
            .await?;
        if let Some(review) = &review {
            refresh_target_rating(&mut tx, review).await?;
        }
        tx.commit().await?;
        Ok(review)
    }

    /// Delete a review. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!("DELETE FROM reviews WHERE id = $1 RETURNING {COLUMNS}");
        let removed = sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if let Some(review) = &removed {
            refresh_target_rating(&mut tx, review).await?;
        }
        tx.commit().await?;
        Ok(removed.is_some())
    }

    /// Reviews written by `author_id`, newest first.
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews \
             WHERE author_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}

async fn refresh_target_rating(
    tx: &mut Transaction<'_, Postgres>,
    review: &Review,
) -> Result<(), sqlx::Error> {
    if review.target_type == ReviewTarget::Skipper.as_str() {
        UserRepo::refresh_skipper_rating(&mut **tx, review.target_id).await?;
    }
    Ok(())
}
