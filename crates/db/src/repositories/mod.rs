//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async read methods
//! that accept `&PgPool` as the first argument.

pub mod change_log_repo;
pub mod document_repo;
pub mod user_repo;

pub use change_log_repo::ChangeLogRepo;
pub use document_repo::DocumentRepo;
pub use user_repo::UserRepo;
