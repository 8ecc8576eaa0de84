//! Composition of a user's feed preferences into a change predicate.
//!
//! Precedence is encoded as a table over three flags rather than nested
//! conditionals:
//!
//! | followed only | area/activity | follows anyone | result                     |
//! |---------------|---------------|----------------|----------------------------|
//! | no            | no            | no             | global feed                |
//! | no            | no            | yes            | global feed                |
//! | no            | yes           | no             | area/activity              |
//! | no            | yes           | yes            | area/activity OR followed  |
//! | yes           | no            | no             | global feed                |
//! | yes           | no            | yes            | followed                   |
//! | yes           | yes           | no             | global feed                |
//! | yes           | yes           | yes            | followed                   |
//!
//! A followed-only user who follows nobody has no followed predicate, so they
//! fall back to the global feed like a user without any filter.

use crate::feed::model::{DocumentChange, UserPreference};
use crate::types::DbId;

/// Boolean predicate over [`DocumentChange`]s.
///
/// Each leaf is an array-overlap test. The db crate renders the same tree to
/// SQL; [`ChangeFilter::matches`] evaluates it in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeFilter {
    /// `area_ids` overlaps the given areas.
    AreasAny(Vec<DbId>),
    /// `activities` overlaps the given activities.
    ActivitiesAny(Vec<String>),
    /// `user_ids` overlaps the given users.
    UsersAny(Vec<DbId>),
    And(Box<ChangeFilter>, Box<ChangeFilter>),
    Or(Box<ChangeFilter>, Box<ChangeFilter>),
}

impl ChangeFilter {
    pub fn and(self, other: ChangeFilter) -> ChangeFilter {
        ChangeFilter::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: ChangeFilter) -> ChangeFilter {
        ChangeFilter::Or(Box::new(self), Box::new(other))
    }

    pub fn matches(&self, change: &DocumentChange) -> bool {
        match self {
            ChangeFilter::AreasAny(ids) => overlaps(&change.area_ids, ids),
            ChangeFilter::ActivitiesAny(acts) => overlaps(&change.activities, acts),
            ChangeFilter::UsersAny(ids) => overlaps(&change.user_ids, ids),
            ChangeFilter::And(a, b) => a.matches(change) && b.matches(change),
            ChangeFilter::Or(a, b) => a.matches(change) || b.matches(change),
        }
    }
}

fn overlaps<T: PartialEq>(left: &[T], right: &[T]) -> bool {
    left.iter().any(|v| right.contains(v))
}

// ---------------------------------------------------------------------------
// Decision table
// ---------------------------------------------------------------------------

/// The inputs of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterFlags {
    pub followed_only: bool,
    pub has_area_activity: bool,
    pub is_following: bool,
}

impl FilterFlags {
    const fn index(self) -> usize {
        (self.followed_only as usize) << 2
            | (self.has_area_activity as usize) << 1
            | self.is_following as usize
    }
}

/// Which predicate a user's feed is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPlan {
    Global,
    Followed,
    AreaActivity,
    AreaActivityOrFollowed,
}

const fn flags(followed_only: bool, has_area_activity: bool, is_following: bool) -> FilterFlags {
    FilterFlags {
        followed_only,
        has_area_activity,
        is_following,
    }
}

/// Every flag combination, in [`FilterFlags::index`] order.
pub const PLAN_TABLE: [(FilterFlags, FilterPlan); 8] = [
    (flags(false, false, false), FilterPlan::Global),
    (flags(false, false, true), FilterPlan::Global),
    (flags(false, true, false), FilterPlan::AreaActivity),
    (flags(false, true, true), FilterPlan::AreaActivityOrFollowed),
    (flags(true, false, false), FilterPlan::Global),
    (flags(true, false, true), FilterPlan::Followed),
    (flags(true, true, false), FilterPlan::Global),
    (flags(true, true, true), FilterPlan::Followed),
];

impl FilterPlan {
    pub fn for_flags(flags: FilterFlags) -> FilterPlan {
        let (_, plan) = PLAN_TABLE[flags.index()];
        plan
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// `area_ids` overlaps the user's filter areas, or `None` without any.
pub fn area_filter(pref: &UserPreference) -> Option<ChangeFilter> {
    pref.has_area_filter()
        .then(|| ChangeFilter::AreasAny(pref.filter_area_ids.clone()))
}

/// `activities` overlaps the user's activity filter, or `None` without any.
pub fn activity_filter(pref: &UserPreference) -> Option<ChangeFilter> {
    (!pref.feed_filter_activities.is_empty())
        .then(|| ChangeFilter::ActivitiesAny(pref.feed_filter_activities.clone()))
}

/// `user_ids` overlaps the followed users, or `None` when following nobody.
pub fn followed_users_filter(pref: &UserPreference) -> Option<ChangeFilter> {
    pref.is_following_users()
        .then(|| ChangeFilter::UsersAny(pref.followed_user_ids.clone()))
}

/// AND of whichever of the area and activity filters is configured.
pub fn area_activity_filter(pref: &UserPreference) -> Option<ChangeFilter> {
    match (area_filter(pref), activity_filter(pref)) {
        (Some(area), Some(activity)) => Some(area.and(activity)),
        (area, activity) => area.or(activity),
    }
}

/// Build the predicate for a user's personal feed.
///
/// `None` means the user gets the global feed.
pub fn build_personal_filter(pref: &UserPreference) -> Option<ChangeFilter> {
    let area_activity = area_activity_filter(pref);
    let plan = FilterPlan::for_flags(FilterFlags {
        followed_only: pref.feed_followed_only,
        has_area_activity: area_activity.is_some(),
        is_following: pref.is_following_users(),
    });

    match plan {
        FilterPlan::Global => None,
        FilterPlan::Followed => followed_users_filter(pref),
        FilterPlan::AreaActivity => area_activity,
        FilterPlan::AreaActivityOrFollowed => match (area_activity, followed_users_filter(pref)) {
            (Some(aa), Some(followed)) => Some(aa.or(followed)),
            (aa, followed) => aa.or(followed),
        },
    }
}

/// Changes a user took part in, for that user's profile feed.
pub fn profile_filter(user_id: DbId) -> ChangeFilter {
    ChangeFilter::UsersAny(vec![user_id])
}
