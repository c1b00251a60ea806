//! Commit value type.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset};

use crate::git::{HASH_LEN, SHORT_HASH_LEN};

/// A single commit, detached from the repository it came from.
///
/// The data cannot be changed after the commit is created. The hash is
/// normalized to lowercase and must be a full 40-character hex identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    hash: String,
    author: String,
    email: String,
    date: DateTime<FixedOffset>,
    subject: String,
}

impl Commit {
    /// Creates a commit from raw data, validating the hash.
    pub fn new(
        hash: &str,
        author: &str,
        email: &str,
        date: DateTime<FixedOffset>,
        subject: &str,
    ) -> Result<Self> {
        let hash = hash.to_lowercase();

        if hash.len() != HASH_LEN {
            anyhow::bail!(
                "commit hash '{}' has invalid length {} (expected {})",
                hash,
                hash.len(),
                HASH_LEN
            );
        }

        if let Some(c) = hash.chars().find(|c| !c.is_ascii_hexdigit()) {
            anyhow::bail!("commit hash '{}' contains invalid character '{}'", hash, c);
        }

        Ok(Self {
            hash,
            author: author.to_string(),
            email: email.to_string(),
            date,
            subject: subject.to_string(),
        })
    }

    /// Creates a commit from a `git2` commit object.
    pub fn from_git2(commit: &git2::Commit) -> Result<Self> {
        let author = commit.author();
        let timestamp = author.when();
        let date = DateTime::from_timestamp(timestamp.seconds(), 0)
            .context("Invalid commit timestamp")?
            .with_timezone(
                &FixedOffset::east_opt(timestamp.offset_minutes() * 60)
                    .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap()),
            );

        Self::new(
            &commit.id().to_string(),
            author.name().unwrap_or("Unknown"),
            author.email().unwrap_or("unknown@example.com"),
            date,
            commit.summary().unwrap_or(""),
        )
    }

    /// Full identifier of the commit.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Author of the commit.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Email of the author.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Date the commit was authored.
    pub fn date(&self) -> DateTime<FixedOffset> {
        self.date
    }

    /// Subject (the first line of the commit message).
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Abbreviated hash: the first [`SHORT_HASH_LEN`] characters.
    pub fn short_hash(&self) -> &str {
        &self.hash[..SHORT_HASH_LEN]
    }

    /// Shorter version of the subject.
    ///
    /// When the subject has at most `limit` characters it is returned
    /// unmodified. Otherwise the first `limit` characters are returned with
    /// an appended ellipsis (`...`).
    pub fn short_subject(&self, limit: usize) -> String {
        if self.subject.chars().count() <= limit {
            return self.subject.clone();
        }
        let truncated: String = self.subject.chars().take(limit).collect();
        format!("{truncated}...")
    }

    /// Age of the commit relative to `now`.
    pub fn age(&self, now: DateTime<FixedOffset>) -> Duration {
        now - self.date
    }
}
