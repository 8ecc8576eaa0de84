//! Row types for the tables the feed reads.

pub mod change;
pub mod document;
pub mod user;
