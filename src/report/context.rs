//! Render context: the immutable snapshot a report is produced from.

use anyhow::Result;
use chrono::{DateTime, Duration, FixedOffset};
use thiserror::Error;

use crate::git::{Branch, Commit};

/// Errors for malformed report configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The commit details URL format has no `{}` placeholder for the hash.
    #[error("commit details URL format '{0}' does not contain a '{{}}' placeholder")]
    MissingPlaceholder(String),

    /// A display limit was set to zero; use no limit instead.
    #[error("{0} must be a positive integer; omit it to show everything")]
    ZeroLimit(&'static str),
}

/// A URL template for commit detail pages.
///
/// The template must contain a `{}` placeholder, which is replaced by the
/// full commit hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitUrlFormat(String);

impl CommitUrlFormat {
    /// Creates a URL format, rejecting templates without a placeholder.
    pub fn new(fmt: impl Into<String>) -> Result<Self, ValidationError> {
        let fmt = fmt.into();
        if !fmt.contains("{}") {
            return Err(ValidationError::MissingPlaceholder(fmt));
        }
        Ok(Self(fmt))
    }

    /// The URL for the given commit: the template with the full hash
    /// substituted.
    pub fn url_for(&self, commit: &Commit) -> String {
        self.0.replacen("{}", commit.hash(), 1)
    }
}

/// Display configuration for the report.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Template for linking commit hashes to an external detail page.
    ///
    /// When absent, short hashes are rendered as plain text.
    pub commit_details_url_fmt: Option<CommitUrlFormat>,

    /// Maximum number of subject characters to show per commit.
    ///
    /// When absent, full subjects are shown.
    pub commit_subject_limit: Option<usize>,

    /// Maximum number of unmerged commits to list per branch.
    ///
    /// When absent, all unmerged commits are listed.
    pub unmerged_commits_limit: Option<usize>,
}

impl RenderOptions {
    /// Creates display options, rejecting zero limits and placeholder-less
    /// URL formats.
    ///
    /// A limit of zero is indistinguishable from "unset" in loosely-typed
    /// configuration; here it is an error, and "no limit" is spelled `None`.
    pub fn new(
        commit_details_url_fmt: Option<String>,
        commit_subject_limit: Option<usize>,
        unmerged_commits_limit: Option<usize>,
    ) -> Result<Self, ValidationError> {
        let commit_details_url_fmt = commit_details_url_fmt
            .map(CommitUrlFormat::new)
            .transpose()?;

        if commit_subject_limit == Some(0) {
            return Err(ValidationError::ZeroLimit("commit subject limit"));
        }
        if unmerged_commits_limit == Some(0) {
            return Err(ValidationError::ZeroLimit("unmerged commits limit"));
        }

        Ok(Self {
            commit_details_url_fmt,
            commit_subject_limit,
            unmerged_commits_limit,
        })
    }
}

/// Merge status of a branch relative to master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchStatus {
    /// The branch is fully merged and is eligible for removal.
    NoUnmergedCommits,
    /// The branch has outstanding work.
    HasUnmergedCommits,
}

/// An immutable snapshot of one branch, taken once per report.
///
/// Holds everything the renderer needs so that rendering itself never
/// touches the repository.
#[derive(Debug, Clone)]
pub struct BranchSummary {
    /// Name of the branch.
    pub name: String,
    /// The commit at the tip of the branch.
    pub commit: Commit,
    /// Elapsed time since the branch was last updated.
    pub age: Duration,
    /// True total of unmerged commits, independent of any display limit.
    pub total_unmerged: usize,
    /// Unmerged commits to display, newest first; at most
    /// `unmerged_commits_limit` entries.
    pub unmerged: Vec<Commit>,
}

impl BranchSummary {
    /// Snapshots `branch` against `master_branch`.
    ///
    /// The commit list is cut off at `limit` entries, while
    /// `total_unmerged` always reflects the true count.
    pub fn collect(
        branch: &Branch,
        master_branch: &Branch,
        now: DateTime<FixedOffset>,
        limit: Option<usize>,
    ) -> Result<Self> {
        let commit = branch.tip()?;
        let total_unmerged = branch.num_of_unmerged_commits(master_branch)?;
        let unmerged = if total_unmerged == 0 {
            Vec::new()
        } else {
            branch.unmerged_commits(master_branch, limit)?
        };

        Ok(Self {
            name: branch.name().to_string(),
            age: commit.age(now),
            commit,
            total_unmerged,
            unmerged,
        })
    }

    /// Merge status of the snapshotted branch.
    pub fn status(&self) -> BranchStatus {
        if self.total_unmerged == 0 {
            BranchStatus::NoUnmergedCommits
        } else {
            BranchStatus::HasUnmergedCommits
        }
    }
}

/// Everything a single report is rendered from.
///
/// Rendering is a pure function of this value; two renders of the same
/// context produce identical output.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Name of the repository being reported on.
    pub repo_name: String,
    /// Name of the remote whose branches are shown.
    pub remote: String,
    /// Name of the branch used as the comparison baseline.
    pub master_branch: String,
    /// Branches to display in full, in the order they should appear.
    pub shown_branches: Vec<BranchSummary>,
    /// Names of branches listed without detail, in the order they should
    /// appear.
    pub ignored_branches: Vec<String>,
    /// Display configuration.
    pub options: RenderOptions,
    /// When the repository was last updated from its remotes, if known.
    pub last_update: Option<DateTime<FixedOffset>>,
}
