//! Change records, user feed preferences and the feed response shapes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentType, DocumentView};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Kind of change recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Created,
    Updated,
    AddedPhotos,
}

impl ChangeType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ChangeType::Created => "created",
            ChangeType::Updated => "updated",
            ChangeType::AddedPhotos => "added_photos",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(ChangeType::Created),
            "updated" => Ok(ChangeType::Updated),
            "added_photos" => Ok(ChangeType::AddedPhotos),
            other => Err(CoreError::Validation(format!("Unknown change type '{other}'"))),
        }
    }
}

/// One immutable entry of the change log.
///
/// `change_id` comes from a global increasing sequence; `time` is not unique.
/// `user_ids` holds every participant and always includes `user_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub change_id: DbId,
    pub time: Timestamp,
    pub user_id: DbId,
    pub user_ids: Vec<DbId>,
    pub document_id: DbId,
    pub document_type: DocumentType,
    pub change_type: ChangeType,
    pub area_ids: Vec<DbId>,
    pub activities: Vec<String>,
    pub image1_id: Option<DbId>,
    pub image2_id: Option<DbId>,
    pub image3_id: Option<DbId>,
    pub more_images: bool,
}

impl DocumentChange {
    /// The image slots that are set, in slot order.
    pub fn image_ids(&self) -> impl Iterator<Item = DbId> + '_ {
        [self.image1_id, self.image2_id, self.image3_id]
            .into_iter()
            .flatten()
    }
}

/// Canonical feed order: newest first, ascending `change_id` among equal times.
pub fn canonical_order(a: &DocumentChange, b: &DocumentChange) -> Ordering {
    b.time
        .cmp(&a.time)
        .then_with(|| a.change_id.cmp(&b.change_id))
}

/// Feed preferences of a user, with the associated area and follow sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreference {
    pub user_id: DbId,
    pub feed_followed_only: bool,
    pub feed_filter_activities: Vec<String>,
    /// Rows of `feed_filter_areas` for this user.
    pub filter_area_ids: Vec<DbId>,
    /// Rows of `feed_followed_users` where this user is the follower.
    pub followed_user_ids: Vec<DbId>,
}

impl UserPreference {
    pub fn has_area_filter(&self) -> bool {
        !self.filter_area_ids.is_empty()
    }

    pub fn is_following_users(&self) -> bool {
        !self.followed_user_ids.is_empty()
    }
}

/// Existence and visibility of a profile-feed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileVisibility {
    pub user_id: DbId,
    pub is_profile_public: bool,
}

/// One element of a feed response. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    pub id: DbId,
    /// ISO-8601 time of the change.
    pub time: String,
    pub user: DocumentView,
    /// Hydrated participants other than the actor.
    pub participants: Vec<DocumentView>,
    pub change_type: ChangeType,
    pub document: DocumentView,
    pub image1: Option<DocumentView>,
    pub image2: Option<DocumentView>,
    pub image3: Option<DocumentView>,
    pub more_images: bool,
}

/// A page of the feed. The token is absent whenever the page is empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FeedPage {
    pub feed: Vec<FeedEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination_token: Option<String>,
}

impl FeedPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::{change, ts};

    #[test]
    fn change_type_round_trips() {
        for ct in [ChangeType::Created, ChangeType::Updated, ChangeType::AddedPhotos] {
            assert_eq!(ct.as_str().parse::<ChangeType>().unwrap(), ct);
        }
        assert!("deleted".parse::<ChangeType>().is_err());
    }

    #[test]
    fn canonical_order_is_time_desc_then_id_asc() {
        let mut changes = vec![
            change(1, ts(10)),
            change(3, ts(20)),
            change(2, ts(20)),
            change(4, ts(5)),
        ];
        changes.sort_by(canonical_order);
        let ids: Vec<_> = changes.iter().map(|c| c.change_id).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
    }

    #[test]
    fn image_ids_skip_empty_slots() {
        let mut c = change(1, ts(0));
        c.image1_id = Some(5);
        c.image3_id = Some(7);
        assert_eq!(c.image_ids().collect::<Vec<_>>(), vec![5, 7]);
    }

    #[test]
    fn empty_page_omits_token_key() {
        let json = serde_json::to_value(FeedPage::empty()).unwrap();
        assert_eq!(json, serde_json::json!({ "feed": [] }));
    }
}
