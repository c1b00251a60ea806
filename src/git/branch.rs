//! Branch handle and unmerged-commit queries.

use anyhow::Result;
use chrono::{DateTime, Duration, FixedOffset};

use crate::git::{Commit, GitRepository};

/// A branch on a remote, borrowed from the repository it lives in.
///
/// The identifying data cannot be changed after the branch is created. All
/// commit queries go through the owning [`GitRepository`].
#[derive(Clone)]
pub struct Branch<'r> {
    repo: &'r GitRepository,
    remote: String,
    name: String,
}

impl<'r> Branch<'r> {
    /// Creates a branch handle for `remote/name` in `repo`.
    pub fn new(repo: &'r GitRepository, remote: &str, name: &str) -> Self {
        Self {
            repo,
            remote: remote.to_string(),
            name: name.to_string(),
        }
    }

    /// Name of the remote on which this branch is.
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Name of the branch.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full name of the branch (`remote/name`).
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.remote, self.name)
    }

    /// The commit at the tip of the branch.
    pub fn tip(&self) -> Result<Commit> {
        self.repo.commit_for_branch(self)
    }

    /// Age of the branch: the age of its tip commit relative to `now`.
    pub fn age(&self, now: DateTime<FixedOffset>) -> Result<Duration> {
        Ok(self.tip()?.age(now))
    }

    /// Commits in this branch that are not in `master_branch`, newest first.
    ///
    /// When `limit` is given, at most `limit` commits are returned.
    pub fn unmerged_commits(
        &self,
        master_branch: &Branch,
        limit: Option<usize>,
    ) -> Result<Vec<Commit>> {
        self.repo.unmerged_commits(master_branch, self, limit)
    }

    /// Number of commits in this branch that are not in `master_branch`.
    ///
    /// The count is the true total, independent of any display limit.
    pub fn num_of_unmerged_commits(&self, master_branch: &Branch) -> Result<usize> {
        self.repo.num_of_unmerged_commits(master_branch, self)
    }

    /// Checks if there are commits in this branch that are not in
    /// `master_branch`.
    pub fn has_unmerged_commits(&self, master_branch: &Branch) -> Result<bool> {
        self.repo.has_unmerged_commits(master_branch, self)
    }

    /// Checks if there are more than `limit` commits in this branch that are
    /// not in `master_branch`.
    pub fn has_more_unmerged_commits_than(
        &self,
        master_branch: &Branch,
        limit: usize,
    ) -> Result<bool> {
        Ok(self.num_of_unmerged_commits(master_branch)? > limit)
    }
}

impl std::fmt::Debug for Branch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Branch")
            .field("remote", &self.remote)
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for Branch<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.repo, other.repo)
            && self.remote == other.remote
            && self.name == other.name
    }
}
