//! In-memory fakes of the feed ports and fixture helpers for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::TimeZone;

use crate::document::{DocumentType, DocumentView};
use crate::feed::model::{
    canonical_order, ChangeType, DocumentChange, ProfileVisibility, UserPreference,
};
use crate::feed::ports::{ChangeLogStore, ChangeQuery, DocumentSource, UserDirectory};
use crate::types::{DbId, Timestamp};

#[derive(Debug, thiserror::Error)]
#[error("fake source failure")]
pub struct FakeError;

/// `2020-01-01T00:00:00Z` plus `secs` seconds.
pub fn ts(secs: i64) -> Timestamp {
    chrono::Utc.timestamp_opt(1_577_836_800 + secs, 0).unwrap()
}

/// A change by user 1 on outing 100 + id.
pub fn change(change_id: DbId, time: Timestamp) -> DocumentChange {
    DocumentChange {
        change_id,
        time,
        user_id: 1,
        user_ids: vec![1],
        document_id: 100 + change_id,
        document_type: DocumentType::Outing,
        change_type: ChangeType::Created,
        area_ids: Vec::new(),
        activities: Vec::new(),
        image1_id: None,
        image2_id: None,
        image3_id: None,
        more_images: false,
    }
}

pub fn view(document_id: DbId, document_type: DocumentType) -> DocumentView {
    DocumentView::new(document_id, document_type)
}

// ---------------------------------------------------------------------------
// Change log
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryChangeLog {
    changes: Vec<DocumentChange>,
    queries: AtomicUsize,
}

impl InMemoryChangeLog {
    pub fn new(changes: Vec<DocumentChange>) -> Self {
        Self {
            changes,
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of `query_changes` calls so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChangeLogStore for InMemoryChangeLog {
    type Error = FakeError;

    async fn query_changes(&self, query: &ChangeQuery) -> Result<Vec<DocumentChange>, FakeError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let mut selected: Vec<DocumentChange> = self
            .changes
            .iter()
            .filter(|c| query.admits(c))
            .cloned()
            .collect();
        selected.sort_by(canonical_order);
        selected.truncate(usize::try_from(query.limit).unwrap_or(0));
        Ok(selected)
    }
}

// ---------------------------------------------------------------------------
// Document source
// ---------------------------------------------------------------------------

/// Counts its own drops. Held by a batch for as long as it is in flight.
#[derive(Debug)]
struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct FakeDocumentSource {
    documents: HashMap<DbId, DocumentType>,
    failing: HashSet<DocumentType>,
    delays: HashMap<DocumentType, Duration>,
    hanging: HashSet<DocumentType>,
    return_everything: bool,
    calls: AtomicUsize,
    started: Arc<AtomicUsize>,
    dropped: Arc<AtomicUsize>,
}

impl FakeDocumentSource {
    pub fn with_documents(documents: impl IntoIterator<Item = (DbId, DocumentType)>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn failing(mut self, document_type: DocumentType) -> Self {
        self.failing.insert(document_type);
        self
    }

    pub fn delayed(mut self, document_type: DocumentType, delay: Duration) -> Self {
        self.delays.insert(document_type, delay);
        self
    }

    /// Batches of this type never complete.
    pub fn hanging(mut self, document_type: DocumentType) -> Self {
        self.hanging.insert(document_type);
        self
    }

    /// Return every stored document of the type, requested or not.
    pub fn returning_everything(mut self) -> Self {
        self.return_everything = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Hanging batches that have started waiting.
    pub fn hanging_started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Hanging batches that were dropped before completing.
    pub fn hanging_dropped(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for FakeDocumentSource {
    type Error = FakeError;

    async fn batch_get(
        &self,
        document_type: DocumentType,
        ids: &[DbId],
        _lang: Option<&str>,
    ) -> Result<Vec<DocumentView>, FakeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.hanging.contains(&document_type) {
            let _in_flight = DropCounter(Arc::clone(&self.dropped));
            self.started.fetch_add(1, Ordering::SeqCst);
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delays.get(&document_type) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&document_type) {
            return Err(FakeError);
        }

        let mut views: Vec<DocumentView> = self
            .documents
            .iter()
            .filter(|(id, t)| **t == document_type && (self.return_everything || ids.contains(*id)))
            .map(|(id, t)| view(*id, *t))
            .collect();
        views.sort_by_key(|v| v.document_id);
        Ok(views)
    }
}

// ---------------------------------------------------------------------------
// User directory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FakeUserDirectory {
    visibility: HashMap<DbId, bool>,
    preferences: HashMap<DbId, UserPreference>,
}

impl FakeUserDirectory {
    pub fn with_profile(mut self, user_id: DbId, is_profile_public: bool) -> Self {
        self.visibility.insert(user_id, is_profile_public);
        self
    }

    pub fn with_preference(mut self, pref: UserPreference) -> Self {
        self.visibility.entry(pref.user_id).or_insert(false);
        self.preferences.insert(pref.user_id, pref);
        self
    }
}

#[async_trait]
impl UserDirectory for FakeUserDirectory {
    type Error = FakeError;

    async fn profile_visibility(
        &self,
        user_id: DbId,
    ) -> Result<Option<ProfileVisibility>, FakeError> {
        Ok(self
            .visibility
            .get(&user_id)
            .map(|&is_profile_public| ProfileVisibility {
                user_id,
                is_profile_public,
            }))
    }

    async fn feed_preference(&self, user_id: DbId) -> Result<Option<UserPreference>, FakeError> {
        Ok(self.preferences.get(&user_id).cloned())
    }
}
