//! Collaborators the feed reads through.
//!
//! The db crate implements these on PostgreSQL; tests use in-memory fakes.

use async_trait::async_trait;

use crate::document::{DocumentType, DocumentView};
use crate::feed::filter::ChangeFilter;
use crate::feed::model::{DocumentChange, ProfileVisibility, UserPreference};
use crate::feed::pagination::FeedCursor;
use crate::types::DbId;

/// A bounded read of the change log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeQuery {
    pub filter: Option<ChangeFilter>,
    pub cursor: Option<FeedCursor>,
    pub limit: i64,
}

impl ChangeQuery {
    /// Whether a change satisfies both the filter and the cursor.
    pub fn admits(&self, change: &DocumentChange) -> bool {
        self.cursor.map_or(true, |c| c.admits(change))
            && self.filter.as_ref().map_or(true, |f| f.matches(change))
    }
}

/// Read-only ordered access to the change log.
#[async_trait]
pub trait ChangeLogStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Changes admitted by `query`, in canonical order
    /// (`time DESC, change_id ASC`), at most `query.limit` of them.
    async fn query_changes(&self, query: &ChangeQuery) -> Result<Vec<DocumentChange>, Self::Error>;
}

/// Batch retrieval of hydrated documents of one type.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the views of `ids`, all of type `document_type`.
    ///
    /// Ids that are missing, merged into another document or not visible are
    /// left out of the result; they are never an error.
    async fn batch_get(
        &self,
        document_type: DocumentType,
        ids: &[DbId],
        lang: Option<&str>,
    ) -> Result<Vec<DocumentView>, Self::Error>;
}

/// User existence, visibility and feed preferences.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// `None` when the user does not exist as a feed target.
    async fn profile_visibility(
        &self,
        user_id: DbId,
    ) -> Result<Option<ProfileVisibility>, Self::Error>;

    /// `None` when the user does not exist.
    async fn feed_preference(&self, user_id: DbId) -> Result<Option<UserPreference>, Self::Error>;
}
