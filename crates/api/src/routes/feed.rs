//! Route definitions for the activity feeds.

use axum::routing::get;
use axum::Router;

use crate::handlers::feed;
use crate::state::AppState;

/// Feed routes, mounted at the `/api/v1` root.
///
/// ```text
/// GET /feed          -> global_feed    (public)
/// GET /personal-feed -> personal_feed  (requires auth)
/// GET /profile-feed  -> profile_feed   (optional auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feed", get(feed::global_feed))
        .route("/personal-feed", get(feed::personal_feed))
        .route("/profile-feed", get(feed::profile_feed))
}
