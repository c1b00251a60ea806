//! Git branches, commits, and repository access.

pub mod branch;
pub mod commit;
pub mod repository;

pub use branch::Branch;
pub use commit::Commit;
pub use repository::GitRepository;

/// The length of a full commit hash.
pub const HASH_LEN: usize = 40;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;
