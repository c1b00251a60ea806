//! Configuration for report generation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

/// Report configuration, loaded from a YAML file.
///
/// Every field has a default, so a missing file or an empty mapping is a
/// valid configuration. Command-line flags override loaded values.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Path to the repository to report on.
    #[serde(default = "default_repo_path")]
    pub repo_path: PathBuf,

    /// Remote whose branches are reported.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch used as the comparison baseline.
    #[serde(default = "default_master_branch")]
    pub master_branch: String,

    /// Glob patterns of branches to list without detail.
    #[serde(default)]
    pub ignored_branches: Vec<String>,

    /// URL template for commit detail pages, with `{}` for the full hash.
    #[serde(default)]
    pub commit_details_url_fmt: Option<String>,

    /// Maximum number of subject characters to show per commit.
    #[serde(default)]
    pub commit_subject_limit: Option<usize>,

    /// Maximum number of unmerged commits to list per branch.
    #[serde(default)]
    pub unmerged_commits_limit: Option<usize>,
}

fn default_repo_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_master_branch() -> String {
    "master".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            repo_path: default_repo_path(),
            remote: default_remote(),
            master_branch: default_master_branch(),
            ignored_branches: Vec::new(),
            commit_details_url_fmt: None,
            commit_subject_limit: None,
            unmerged_commits_limit: None,
        }
    }
}

impl ReportConfig {
    /// The default config file location
    /// (`<user config dir>/branch-report/config.yaml`).
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("branch-report")
            .join("config.yaml")
    }

    /// Loads configuration from the given file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Loads configuration from an explicit path, or from the default
    /// location when no path is given.
    ///
    /// An explicit path must exist; a missing file at the default location
    /// falls back to the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Branch names to exclude from detailed reporting, matched by glob
/// patterns compiled once up front.
#[derive(Debug)]
pub struct IgnoreList {
    set: GlobSet,
}

impl IgnoreList {
    /// Compiles the given glob patterns.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("Invalid ignored-branch pattern: '{pattern}'"))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .context("Failed to build ignored-branch matcher")?;

        Ok(Self { set })
    }

    /// Checks if the given branch name matches any ignore pattern.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.set.is_match(name)
    }
}
