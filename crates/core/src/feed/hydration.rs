//! Batched, failure-tolerant loading of the documents a page refers to.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::document::{DocumentType, DocumentView};
use crate::error::CoreError;
use crate::feed::model::DocumentChange;
use crate::feed::ports::DocumentSource;
use crate::feed::{FeedError, FeedSettings, HydrationFailurePolicy};
use crate::types::DbId;

/// Hydrated views keyed by document id. Ids are unique across types.
pub type HydratedDocuments = HashMap<DbId, DocumentView>;

/// Ids to load, grouped by document type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentsToLoad {
    by_type: BTreeMap<DocumentType, BTreeSet<DbId>>,
}

impl DocumentsToLoad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every id needed to render `changes`.
    ///
    /// ```text
    /// (user 1, doc 2 'o', users {1, 3}), (user 4, doc 5 'r', users {4})
    ///   => { 'o': {2}, 'r': {5}, 'u': {1, 3, 4} }
    /// ```
    pub fn from_changes(changes: &[DocumentChange]) -> Self {
        let mut to_load = Self::new();
        for change in changes {
            to_load.add_change(change);
        }
        to_load
    }

    pub fn add(&mut self, document_type: DocumentType, id: DbId) {
        self.by_type.entry(document_type).or_default().insert(id);
    }

    pub fn add_change(&mut self, change: &DocumentChange) {
        self.add(change.document_type, change.document_id);

        self.add(DocumentType::Profile, change.user_id);
        for &user_id in &change.user_ids {
            self.add(DocumentType::Profile, user_id);
        }

        for image_id in change.image_ids() {
            self.add(DocumentType::Image, image_id);
        }
    }

    pub fn ids(&self, document_type: DocumentType) -> Option<&BTreeSet<DbId>> {
        self.by_type.get(&document_type)
    }

    pub fn contains(&self, document_type: DocumentType, id: DbId) -> bool {
        self.ids(document_type).is_some_and(|ids| ids.contains(&id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocumentType, &BTreeSet<DbId>)> {
        self.by_type.iter().map(|(t, ids)| (*t, ids))
    }

    pub fn type_count(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Load every id of `to_load` with one batch per document type.
///
/// The batches run concurrently inside the caller's future, so dropping that
/// future cancels all of them. Ids missing from a batch are simply absent
/// from the result. A batch that errors or exceeds
/// [`FeedSettings::hydration_timeout`] is handled per
/// [`FeedSettings::hydration_failure_policy`].
pub async fn hydrate<S>(
    source: &S,
    to_load: &DocumentsToLoad,
    lang: Option<&str>,
    settings: &FeedSettings,
) -> Result<HydratedDocuments, FeedError>
where
    S: DocumentSource + ?Sized,
{
    let batches = to_load.iter().map(|(document_type, ids)| {
        let ids: Vec<DbId> = ids.iter().copied().collect();
        async move {
            let outcome = tokio::time::timeout(
                settings.hydration_timeout,
                source.batch_get(document_type, &ids, lang),
            )
            .await;
            (document_type, outcome)
        }
    });
    let outcomes = futures::future::join_all(batches).await;

    let mut documents = HydratedDocuments::new();
    for (document_type, outcome) in outcomes {
        let views = match outcome {
            Ok(Ok(views)) => views,
            Ok(Err(err)) => {
                if settings.hydration_failure_policy == HydrationFailurePolicy::FailRequest {
                    return Err(FeedError::from_source(err));
                }
                tracing::warn!(%document_type, error = %err, "Document batch failed, omitting its ids");
                continue;
            }
            Err(_) => {
                if settings.hydration_failure_policy == HydrationFailurePolicy::FailRequest {
                    return Err(CoreError::Internal(format!(
                        "hydration of type '{document_type}' timed out"
                    ))
                    .into());
                }
                tracing::warn!(
                    %document_type,
                    timeout_ms = settings.hydration_timeout.as_millis() as u64,
                    "Document batch timed out, omitting its ids"
                );
                continue;
            }
        };

        for view in views {
            if to_load.contains(document_type, view.document_id) {
                documents.insert(view.document_id, view);
            }
        }
    }

    Ok(documents)
}
