//! Domain layer of the activity feed.
//!
//! Holds everything that does not need a database: the change and document
//! types, the personal filter rules, cursor pagination, hydration and the
//! feed assembler together with the ports it reads through.

pub mod document;
pub mod error;
pub mod feed;
pub mod locale;
pub mod types;
