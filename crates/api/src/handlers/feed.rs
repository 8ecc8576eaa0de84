//! Handlers for the activity feeds.
//!
//! Parsing and authentication happen here; filtering, pagination and
//! hydration live in `ridgeline_core::feed`.

use axum::extract::{Query, State};
use axum::Json;
use ridgeline_core::feed::FeedPage;

use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::{FeedParams, ProfileFeedParams};
use crate::state::AppState;

/// GET /api/v1/feed
///
/// The public feed of every change.
pub async fn global_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<FeedPage>> {
    let page = params.page_request()?;
    let feed = state.feed.global_feed(&page).await?;
    Ok(Json(feed))
}

/// GET /api/v1/personal-feed
///
/// The authenticated user's feed, filtered by their feed preferences.
pub async fn personal_feed(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<FeedPage>> {
    let page = params.page_request()?;
    let feed = state.feed.personal_feed(user.user_id, &page).await?;
    Ok(Json(feed))
}

/// GET /api/v1/profile-feed?u={user_id}
///
/// The changes user `u` took part in. Private profiles are only served to
/// authenticated callers.
pub async fn profile_feed(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProfileFeedParams>,
) -> AppResult<Json<FeedPage>> {
    let target_user_id = params.target_user_id()?;
    let page = params.page.page_request()?;

    let feed = state
        .feed
        .profile_feed(target_user_id, viewer.is_authenticated(), &page)
        .await?;
    Ok(Json(feed))
}
