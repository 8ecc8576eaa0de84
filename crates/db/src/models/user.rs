//! User row models used by the feed.

use ridgeline_core::types::DbId;
use sqlx::FromRow;

/// Visibility columns of a `users` row.
#[derive(Debug, Clone, FromRow)]
pub struct UserVisibilityRow {
    pub id: DbId,
    pub is_profile_public: bool,
}

/// Feed-setting columns of a `users` row.
#[derive(Debug, Clone, FromRow)]
pub struct UserFeedSettingsRow {
    pub id: DbId,
    pub feed_followed_only: bool,
    pub feed_filter_activities: Vec<String>,
}
