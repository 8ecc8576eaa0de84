//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- Requires a valid JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Optional; bad tokens count as anonymous.

pub mod auth;
