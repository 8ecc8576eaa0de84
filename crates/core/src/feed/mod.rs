//! The activity feed: filter composition, cursor pagination, hydration and
//! assembly of feed pages.
//!
//! Request flow, for every feed variant:
//!
//! ```text
//! filter::build_personal_filter  (personal / profile feeds only)
//!         |
//! ports::ChangeLogStore::query_changes  (canonical order, cursor, limit)
//!         |
//! hydration::DocumentsToLoad -> hydration::hydrate  (one batch per type)
//!         |
//! assembler::assemble_page  (drop unhydrated entries, compute cursor)
//! ```

pub mod assembler;
pub mod filter;
pub mod hydration;
pub mod model;
pub mod pagination;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

use std::str::FromStr;
use std::time::Duration;

use crate::error::CoreError;

pub use assembler::{FeedAssembler, PageRequest};
pub use filter::ChangeFilter;
pub use model::{ChangeType, DocumentChange, FeedEntry, FeedPage, ProfileVisibility, UserPreference};
pub use pagination::FeedCursor;

// ---------------------------------------------------------------------------
// Page size
// ---------------------------------------------------------------------------

/// Page size used when the request does not give one.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size served. Larger requests are clamped, not rejected.
pub const MAX_PAGE_LIMIT: i64 = 50;

/// Clamp a requested page size into `[1, MAX_PAGE_LIMIT]`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Boxed error raised by a collaborator behind one of the feed ports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors a feed request can end with.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Domain error: not found, forbidden, invalid token, ...
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A collaborator (change log, document source, user directory) failed.
    #[error("Feed source error: {0}")]
    Source(#[source] BoxError),
}

impl FeedError {
    pub fn from_source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FeedError::Source(Box::new(err))
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Default deadline for one per-type hydration batch.
pub const DEFAULT_HYDRATION_TIMEOUT: Duration = Duration::from_millis(5000);

/// What to do when a per-type hydration batch times out or errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HydrationFailurePolicy {
    /// Treat every id of that batch as unresolved.
    #[default]
    Omit,
    /// Fail the whole request.
    FailRequest,
}

impl FromStr for HydrationFailurePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omit" => Ok(HydrationFailurePolicy::Omit),
            "fail" | "fail_request" => Ok(HydrationFailurePolicy::FailRequest),
            other => Err(CoreError::Validation(format!(
                "unknown hydration failure policy '{other}' (expected 'omit' or 'fail')"
            ))),
        }
    }
}

/// Tunables of the feed assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub hydration_timeout: Duration,
    pub hydration_failure_policy: HydrationFailurePolicy,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            hydration_timeout: DEFAULT_HYDRATION_TIMEOUT,
            hydration_failure_policy: HydrationFailurePolicy::Omit,
        }
    }
}
