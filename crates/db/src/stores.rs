//! PostgreSQL implementations of the feed ports.

use async_trait::async_trait;
use ridgeline_core::document::{DocumentType, DocumentView};
use ridgeline_core::feed::ports::{ChangeLogStore, ChangeQuery, DocumentSource, UserDirectory};
use ridgeline_core::feed::{
    DocumentChange, FeedAssembler, FeedSettings, ProfileVisibility, UserPreference,
};
use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::repositories::{ChangeLogRepo, DocumentRepo, UserRepo};

/// Feed assembler reading from PostgreSQL.
pub type PgFeedAssembler = FeedAssembler<PgChangeLog, PgDocumentSource, PgUserDirectory>;

/// Build a [`PgFeedAssembler`] whose ports share `pool`.
pub fn feed_assembler(pool: PgPool, settings: FeedSettings) -> PgFeedAssembler {
    FeedAssembler::new(
        PgChangeLog::new(pool.clone()),
        PgDocumentSource::new(pool.clone()),
        PgUserDirectory::new(pool),
        settings,
    )
}

// ---------------------------------------------------------------------------
// Change log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PgChangeLog {
    pool: PgPool,
}

impl PgChangeLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChangeLogStore for PgChangeLog {
    type Error = sqlx::Error;

    async fn query_changes(&self, query: &ChangeQuery) -> Result<Vec<DocumentChange>, sqlx::Error> {
        ChangeLogRepo::list(&self.pool, query).await
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PgDocumentSource {
    pool: PgPool,
}

impl PgDocumentSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentSource for PgDocumentSource {
    type Error = sqlx::Error;

    async fn batch_get(
        &self,
        document_type: DocumentType,
        ids: &[DbId],
        lang: Option<&str>,
    ) -> Result<Vec<DocumentView>, sqlx::Error> {
        DocumentRepo::list_views(&self.pool, document_type, ids, lang).await
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    type Error = sqlx::Error;

    async fn profile_visibility(
        &self,
        user_id: DbId,
    ) -> Result<Option<ProfileVisibility>, sqlx::Error> {
        UserRepo::find_visibility(&self.pool, user_id).await
    }

    async fn feed_preference(&self, user_id: DbId) -> Result<Option<UserPreference>, sqlx::Error> {
        UserRepo::find_feed_preference(&self.pool, user_id).await
    }
}
