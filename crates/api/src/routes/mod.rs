pub mod feed;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /feed                 global feed
/// /personal-feed        feed of the authenticated user
/// /profile-feed?u={id}  feed of one user's activity
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(feed::router())
}
