//! Request extractors for authentication.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//!
//! Authorization is not an extractor: handlers pass [`auth::AuthUser::subject`]
//! to `harbor_core::access::authorize` together with the loaded resource.

pub mod auth;
