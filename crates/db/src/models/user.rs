//! User model and DTOs.

use chrono::NaiveDate;
use harbor_core::booking::{Credential, LicenseLevel};
use harbor_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::review::Review;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `users` table. Never serialized directly because it
/// carries the password hash; see [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub license_level: i16,
    pub license_number: Option<String>,
    pub license_expires_on: Option<NaiveDate>,
    pub skipper_bio: Option<String>,
    pub skipper_experience_years: Option<i32>,
    pub skipper_daily_rate: Option<Money>,
    pub skipper_rating: f64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The user's license record, or `None` when no license is on file.
    pub fn credential(&self) -> Option<Credential> {
        match LicenseLevel::from_ordinal(self.license_level) {
            Some(LicenseLevel::None) | None => None,
            Some(level) => Some(Credential {
                level,
                expires_on: self.license_expires_on,
            }),
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub license_level: i16,
    pub license_number: Option<String>,
    pub license_expires_on: Option<NaiveDate>,
    pub skipper_bio: Option<String>,
    pub skipper_experience_years: Option<i32>,
    pub skipper_daily_rate: Option<Money>,
    pub skipper_rating: f64,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            license_level: u.license_level,
            license_number: u.license_number,
            license_expires_on: u.license_expires_on,
            skipper_bio: u.skipper_bio,
            skipper_experience_years: u.skipper_experience_years,
            skipper_daily_rate: u.skipper_daily_rate,
            skipper_rating: u.skipper_rating,
            created_at: u.created_at,
        }
    }
}

/// A skipper as listed to renters.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SkipperSummary {
    pub id: DbId,
    pub name: String,
    pub skipper_bio: Option<String>,
    pub skipper_experience_years: Option<i32>,
    pub skipper_daily_rate: Option<Money>,
    pub skipper_rating: f64,
}

/// A skipper's public page: profile, track record and recent reviews.
#[derive(Debug, Clone, Serialize)]
pub struct SkipperProfile {
    #[serde(flatten)]
    pub skipper: SkipperSummary,
    pub completed_trips: i64,
    pub reviews: Vec<Review>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Insert payload for a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
}

/// Request body for `POST /auth/signup`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `PUT /users/me/license`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLicense {
    pub level: LicenseLevel,
    #[validate(length(min = 1, max = 100))]
    pub license_number: Option<String>,
    pub expires_on: Option<NaiveDate>,
}

/// Request body for `PUT /skippers/me`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSkipperProfile {
    #[validate(range(min = 1, max = 100000000, message = "Daily rate must be between 1 and 100000000 cents"))]
    pub daily_rate: Money,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(range(min = 0, max = 80))]
    pub experience_years: Option<i32>,
}

/// Request body for `PUT /users/me/password`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePassword {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}
