//! Query parameter types for the feed endpoints.
//!
//! Numeric parameters arrive as strings and are parsed here so a malformed
//! value produces the regular JSON error body instead of the extractor's
//! plain-text rejection.

use ridgeline_core::feed::PageRequest;
use ridgeline_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Paging parameters shared by every feed (`?pl=&limit=&token=`).
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    /// Preferred language of the hydrated documents.
    pub pl: Option<String>,
    pub limit: Option<String>,
    /// Continuation token returned with the previous page.
    pub token: Option<String>,
}

impl FeedParams {
    /// Validate into a [`PageRequest`].
    pub fn page_request(&self) -> AppResult<PageRequest> {
        let limit = self
            .limit
            .as_deref()
            .map(|raw| parse_int(raw, "limit"))
            .transpose()?;

        let page = PageRequest::parse(self.pl.as_deref(), limit, self.token.as_deref())?;
        Ok(page)
    }
}

/// Parameters of `/profile-feed` (`?u=` plus paging).
#[derive(Debug, Default, Deserialize)]
pub struct ProfileFeedParams {
    /// Id of the user whose feed is requested.
    pub u: Option<String>,
    #[serde(flatten)]
    pub page: FeedParams,
}

impl ProfileFeedParams {
    /// The required target user id.
    pub fn target_user_id(&self) -> AppResult<DbId> {
        let raw = self
            .u
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("missing required parameter 'u'".into()))?;
        parse_int(raw, "u")
    }
}

fn parse_int(raw: &str, name: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("invalid integer for '{name}': '{raw}'")))
}
