//! Repository for `users` and the feed preference tables
//! (`feed_filter_areas`, `feed_followed_users`).

use ridgeline_core::feed::{ProfileVisibility, UserPreference};
use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{UserFeedSettingsRow, UserVisibilityRow};

/// Read access to users as feed owners and feed targets.
pub struct UserRepo;

impl UserRepo {
    /// Visibility of a user whose email has been validated.
    ///
    /// Users that never validated their email do not exist as feed targets.
    pub async fn find_visibility(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<ProfileVisibility>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserVisibilityRow>(
            "SELECT id, is_profile_public FROM users WHERE id = $1 AND email_validated",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| ProfileVisibility {
            user_id: r.id,
            is_profile_public: r.is_profile_public,
        }))
    }

    /// Feed settings of a user together with their filter areas and the
    /// users they follow.
    pub async fn find_feed_preference(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserPreference>, sqlx::Error> {
        let Some(settings) = sqlx::query_as::<_, UserFeedSettingsRow>(
            "SELECT id, feed_followed_only, feed_filter_activities FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        else {
            return Ok(None);
        };

        let filter_area_ids = Self::list_filter_area_ids(pool, user_id).await?;
        let followed_user_ids = Self::list_followed_user_ids(pool, user_id).await?;

        Ok(Some(UserPreference {
            user_id: settings.id,
            feed_followed_only: settings.feed_followed_only,
            feed_filter_activities: settings.feed_filter_activities,
            filter_area_ids,
            followed_user_ids,
        }))
    }

    /// Area ids of the user's feed area filter.
    pub async fn list_filter_area_ids(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT area_id FROM feed_filter_areas WHERE user_id = $1 ORDER BY area_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Ids of the users the given user follows.
    pub async fn list_followed_user_ids(
        pool: &PgPool,
        follower_user_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT followed_user_id FROM feed_followed_users \
             WHERE follower_user_id = $1 ORDER BY followed_user_id",
        )
        .bind(follower_user_id)
        .fetch_all(pool)
        .await
    }
}
