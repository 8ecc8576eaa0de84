//! Builds feed pages: fetch, hydrate, filter, finalize.

use crate::error::CoreError;
use crate::feed::filter::{build_personal_filter, profile_filter, ChangeFilter};
use crate::feed::hydration::{hydrate, DocumentsToLoad, HydratedDocuments};
use crate::feed::model::{DocumentChange, FeedEntry, FeedPage};
use crate::feed::pagination::{format_time, FeedCursor};
use crate::feed::ports::{ChangeLogStore, ChangeQuery, DocumentSource, UserDirectory};
use crate::feed::{clamp_limit, FeedError, FeedSettings};
use crate::locale::validate_preferred_lang;
use crate::types::DbId;

/// Validated paging parameters shared by every feed variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub lang: Option<String>,
    /// Already clamped to `[1, MAX_PAGE_LIMIT]`.
    pub limit: i64,
    pub cursor: Option<FeedCursor>,
}

impl PageRequest {
    /// Validate raw query values. A malformed token is an error, never
    /// "start from the top".
    pub fn parse(
        lang: Option<&str>,
        limit: Option<i64>,
        token: Option<&str>,
    ) -> Result<Self, CoreError> {
        let lang = validate_preferred_lang(lang)?;
        let cursor = token.map(FeedCursor::decode).transpose()?;
        Ok(Self {
            lang,
            limit: clamp_limit(limit),
            cursor,
        })
    }

    /// First page with the default size.
    pub fn first() -> Self {
        Self {
            lang: None,
            limit: clamp_limit(None),
            cursor: None,
        }
    }
}

/// Orchestrates the change log, the document source and the user directory
/// into feed pages. Holds no state across requests.
pub struct FeedAssembler<C, D, U> {
    changes: C,
    documents: D,
    users: U,
    settings: FeedSettings,
}

impl<C, D, U> FeedAssembler<C, D, U>
where
    C: ChangeLogStore,
    D: DocumentSource,
    U: UserDirectory,
{
    pub fn new(changes: C, documents: D, users: U, settings: FeedSettings) -> Self {
        Self {
            changes,
            documents,
            users,
            settings,
        }
    }

    /// The public feed: every change.
    pub async fn global_feed(&self, page: &PageRequest) -> Result<FeedPage, FeedError> {
        self.load(None, page).await
    }

    /// The feed of an authenticated user, filtered by their preferences.
    pub async fn personal_feed(
        &self,
        user_id: DbId,
        page: &PageRequest,
    ) -> Result<FeedPage, FeedError> {
        let pref = self
            .users
            .feed_preference(user_id)
            .await
            .map_err(FeedError::from_source)?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: user_id,
            })?;

        let filter = build_personal_filter(&pref);
        tracing::debug!(
            user_id,
            personalized = filter.is_some(),
            "Loading personal feed"
        );
        self.load(filter, page).await
    }

    /// The changes a user took part in.
    ///
    /// Fails with `NotFound` for an unknown user, and with `Forbidden` for a
    /// private profile requested by an anonymous caller. Both checks happen
    /// before the change log is read.
    pub async fn profile_feed(
        &self,
        target_user_id: DbId,
        caller_authenticated: bool,
        page: &PageRequest,
    ) -> Result<FeedPage, FeedError> {
        let visibility = self
            .users
            .profile_visibility(target_user_id)
            .await
            .map_err(FeedError::from_source)?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: target_user_id,
            })?;

        if !visibility.is_profile_public && !caller_authenticated {
            return Err(CoreError::Forbidden("no permission to see the feed".into()).into());
        }

        self.load(Some(profile_filter(target_user_id)), page).await
    }

    async fn load(
        &self,
        filter: Option<ChangeFilter>,
        page: &PageRequest,
    ) -> Result<FeedPage, FeedError> {
        let query = ChangeQuery {
            filter,
            cursor: page.cursor,
            limit: page.limit,
        };
        let changes = self
            .changes
            .query_changes(&query)
            .await
            .map_err(FeedError::from_source)?;

        if changes.is_empty() {
            return Ok(FeedPage::empty());
        }

        let to_load = DocumentsToLoad::from_changes(&changes);
        let documents = hydrate(
            &self.documents,
            &to_load,
            page.lang.as_deref(),
            &self.settings,
        )
        .await?;

        let fetched = changes.len();
        let feed = assemble_page(changes, &documents);
        tracing::debug!(
            fetched,
            hydrated = documents.len(),
            dropped = fetched - feed.feed.len(),
            "Assembled feed page"
        );
        Ok(feed)
    }
}

/// Turn fetched changes and their hydrated documents into a page.
///
/// A change whose actor or subject document did not hydrate is dropped.
/// Participants and images that did not hydrate are left out of the entry.
/// The token points at the last entry that survived, not at the last change
/// fetched.
pub fn assemble_page(changes: Vec<DocumentChange>, documents: &HydratedDocuments) -> FeedPage {
    let surviving: Vec<DocumentChange> = changes
        .into_iter()
        .filter(|c| documents.contains_key(&c.user_id) && documents.contains_key(&c.document_id))
        .collect();

    let Some(last) = surviving.last() else {
        return FeedPage::empty();
    };
    let pagination_token = Some(FeedCursor::after(last).encode());

    let feed = surviving
        .iter()
        .filter_map(|c| build_entry(c, documents))
        .collect();

    FeedPage {
        feed,
        pagination_token,
    }
}

fn build_entry(change: &DocumentChange, documents: &HydratedDocuments) -> Option<FeedEntry> {
    let image = |id: Option<DbId>| id.and_then(|id| documents.get(&id).cloned());

    Some(FeedEntry {
        id: change.change_id,
        time: format_time(&change.time),
        user: documents.get(&change.user_id)?.clone(),
        participants: change
            .user_ids
            .iter()
            .filter(|&&id| id != change.user_id)
            .filter_map(|id| documents.get(id).cloned())
            .collect(),
        change_type: change.change_type,
        document: documents.get(&change.document_id)?.clone(),
        image1: image(change.image1_id),
        image2: image(change.image2_id),
        image3: image(change.image3_id),
        more_images: change.more_images,
    })
}
