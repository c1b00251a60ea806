//! Git repository access.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::{BranchType, Oid, Repository, Sort};
use tracing::debug;

use crate::git::{Branch, Commit};

/// Git repository wrapper.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open repository at current directory.
    pub fn open() -> Result<Self> {
        let repo = Repository::open(".").context("Not in a git repository")?;

        Ok(Self { repo })
    }

    /// Open repository at specified path.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Name of the repository: its top-level directory.
    pub fn name(&self) -> Result<String> {
        let workdir = self
            .repo
            .workdir()
            .context("Repository has no working directory")?;

        let name = workdir
            .file_name()
            .context("Failed to determine repository directory name")?
            .to_string_lossy()
            .to_string();

        Ok(name)
    }

    /// Get access to the underlying git2::Repository.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// All branches on the given remote, excluding the symbolic HEAD entry.
    pub fn branches_on_remote(&self, remote: &str) -> Result<Vec<Branch<'_>>> {
        let prefix = format!("{remote}/");
        let mut branches = Vec::new();

        let iter = self
            .repo
            .branches(Some(BranchType::Remote))
            .context("Failed to list remote branches")?;

        for entry in iter {
            let (branch, _) = entry.context("Failed to read remote branch")?;
            let Some(full_name) = branch.name().context("Branch name is not valid UTF-8")? else {
                continue;
            };

            let Some(name) = full_name.strip_prefix(&prefix) else {
                continue;
            };

            // `origin/HEAD` is a symbolic pointer, not a branch of its own.
            if name == "HEAD" {
                continue;
            }

            branches.push(Branch::new(self, remote, name));
        }

        debug!(remote, count = branches.len(), "listed remote branches");
        Ok(branches)
    }

    /// The commit at the tip of the given branch.
    pub fn commit_for_branch(&self, branch: &Branch) -> Result<Commit> {
        let oid = self.branch_tip_oid(branch)?;
        let commit = self
            .repo
            .find_commit(oid)
            .with_context(|| format!("Failed to find tip commit of '{}'", branch.full_name()))?;

        Commit::from_git2(&commit)
    }

    /// Commits in `other_branch` that are not in `master_branch`, newest
    /// first, with at most `limit` entries when a limit is given.
    pub fn unmerged_commits(
        &self,
        master_branch: &Branch,
        other_branch: &Branch,
        limit: Option<usize>,
    ) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();

        for oid in self.unmerged_walk(master_branch, other_branch)? {
            if let Some(limit) = limit {
                if commits.len() == limit {
                    break;
                }
            }

            let oid = oid.context("Failed to get commit OID from walker")?;
            let commit = self
                .repo
                .find_commit(oid)
                .context("Failed to find commit")?;
            commits.push(Commit::from_git2(&commit)?);
        }

        Ok(commits)
    }

    /// Number of commits in `other_branch` that are not in `master_branch`.
    pub fn num_of_unmerged_commits(
        &self,
        master_branch: &Branch,
        other_branch: &Branch,
    ) -> Result<usize> {
        let mut count = 0;
        for oid in self.unmerged_walk(master_branch, other_branch)? {
            oid.context("Failed to get commit OID from walker")?;
            count += 1;
        }

        Ok(count)
    }

    /// Checks if there are commits in `other_branch` that are not in
    /// `master_branch`.
    pub fn has_unmerged_commits(
        &self,
        master_branch: &Branch,
        other_branch: &Branch,
    ) -> Result<bool> {
        // One step of the walk is enough; no need to count everything.
        match self.unmerged_walk(master_branch, other_branch)?.next() {
            Some(oid) => {
                oid.context("Failed to get commit OID from walker")?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Date when the repository was last updated from its remotes.
    ///
    /// Taken from the last modification time of `.git/FETCH_HEAD`, so it is
    /// an error when the repository has never been fetched.
    pub fn date_of_last_update(&self) -> Result<DateTime<FixedOffset>> {
        let fetch_head = self.repo.path().join("FETCH_HEAD");
        let mtime = std::fs::metadata(&fetch_head)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to stat {}", fetch_head.display()))?;

        let date: DateTime<chrono::Local> = mtime.into();
        Ok(date.fixed_offset())
    }

    fn branch_tip_oid(&self, branch: &Branch) -> Result<Oid> {
        let ref_name = format!("refs/remotes/{}", branch.full_name());
        let reference = self
            .repo
            .find_reference(&ref_name)
            .with_context(|| format!("Branch '{}' not found", branch.full_name()))?;

        let commit = reference
            .peel_to_commit()
            .with_context(|| format!("Failed to resolve '{}' to a commit", branch.full_name()))?;

        Ok(commit.id())
    }

    /// Walks commits reachable from `other_branch` but not from
    /// `master_branch`, newest first.
    fn unmerged_walk(
        &self,
        master_branch: &Branch,
        other_branch: &Branch,
    ) -> Result<git2::Revwalk<'_>> {
        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker
            .set_sorting(Sort::TIME)
            .context("Failed to set revwalk sorting")?;
        walker
            .push(self.branch_tip_oid(other_branch)?)
            .context("Failed to push branch tip")?;
        walker
            .hide(self.branch_tip_oid(master_branch)?)
            .context("Failed to hide master tip")?;

        Ok(walker)
    }
}
