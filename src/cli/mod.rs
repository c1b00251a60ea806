//! CLI interface for branch-report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::config::{IgnoreList, ReportConfig};
use crate::git::GitRepository;
use crate::report::{BranchSummary, RenderContext, RenderOptions};

pub mod branches;
pub mod report;

/// branch-report: reports of git branches and their unmerged commits.
#[derive(Parser)]
#[command(name = "branch-report")]
#[command(about = "Reports of git branches and their unmerged commits", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Render the HTML branch report
    Report(report::ReportCommand),
    /// Show an overview of branches in the terminal
    Branches(branches::BranchesCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Report(cmd) => cmd.execute(),
            Commands::Branches(cmd) => cmd.execute(),
        }
    }
}

/// Configuration flags shared by all commands; each one overrides the
/// corresponding config-file value.
#[derive(Args)]
pub struct ConfigOverrides {
    /// Path to the config file (default: the user config directory).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the repository to report on.
    #[arg(long, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Remote whose branches are reported.
    #[arg(long, value_name = "REMOTE")]
    pub remote: Option<String>,

    /// Branch used as the comparison baseline.
    #[arg(long, value_name = "BRANCH")]
    pub master: Option<String>,

    /// Glob pattern of branches to ignore (repeatable).
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignored: Vec<String>,

    /// URL template for commit detail pages, with {} for the full hash.
    #[arg(long = "commit-url-fmt", value_name = "FMT")]
    pub commit_url_fmt: Option<String>,

    /// Maximum number of subject characters to show per commit.
    #[arg(long, value_name = "N")]
    pub subject_limit: Option<usize>,

    /// Maximum number of unmerged commits to list per branch.
    #[arg(long, value_name = "N")]
    pub commits_limit: Option<usize>,
}

impl ConfigOverrides {
    /// Loads the config file and applies the flag overrides.
    pub fn resolve(&self) -> Result<ReportConfig> {
        let mut config = ReportConfig::load_or_default(self.config.as_deref())?;

        if let Some(repo) = &self.repo {
            config.repo_path = repo.clone();
        }
        if let Some(remote) = &self.remote {
            config.remote = remote.clone();
        }
        if let Some(master) = &self.master {
            config.master_branch = master.clone();
        }
        if !self.ignored.is_empty() {
            config.ignored_branches = self.ignored.clone();
        }
        if let Some(fmt) = &self.commit_url_fmt {
            config.commit_details_url_fmt = Some(fmt.clone());
        }
        if let Some(limit) = self.subject_limit {
            config.commit_subject_limit = Some(limit);
        }
        if let Some(limit) = self.commits_limit {
            config.unmerged_commits_limit = Some(limit);
        }

        Ok(config)
    }
}

/// Collects the report snapshot for the given configuration.
///
/// Opens the repository, lists the branches on the configured remote,
/// splits them into shown and ignored (the master branch goes to neither),
/// sorts both listings by name, and snapshots every shown branch against
/// master. The returned context owns all of its data; nothing in it borrows
/// the repository.
pub(crate) fn build_context(config: &ReportConfig) -> Result<RenderContext> {
    let options = RenderOptions::new(
        config.commit_details_url_fmt.clone(),
        config.commit_subject_limit,
        config.unmerged_commits_limit,
    )?;
    let ignore = IgnoreList::new(&config.ignored_branches)?;

    let repo = GitRepository::open_at(&config.repo_path).with_context(|| {
        format!(
            "Failed to open git repository at '{}'",
            config.repo_path.display()
        )
    })?;
    let repo_name = repo.name()?;

    let all_branches = repo.branches_on_remote(&config.remote)?;
    let master_branch = all_branches
        .iter()
        .find(|b| b.name() == config.master_branch)
        .with_context(|| {
            format!(
                "Master branch '{}' not found on remote '{}'",
                config.master_branch, config.remote
            )
        })?
        .clone();

    let mut shown = Vec::new();
    let mut ignored_branches = Vec::new();
    for branch in &all_branches {
        if branch.name() == config.master_branch {
            continue;
        }
        if ignore.is_ignored(branch.name()) {
            ignored_branches.push(branch.name().to_string());
        } else {
            shown.push(branch);
        }
    }
    shown.sort_by(|a, b| a.name().cmp(b.name()));
    ignored_branches.sort();

    debug!(
        shown = shown.len(),
        ignored = ignored_branches.len(),
        "partitioned branches"
    );

    let now = Local::now().fixed_offset();
    let shown_branches = shown
        .iter()
        .map(|branch| {
            BranchSummary::collect(branch, &master_branch, now, options.unmerged_commits_limit)
                .with_context(|| format!("Failed to summarize branch '{}'", branch.name()))
        })
        .collect::<Result<Vec<_>>>()?;

    // A repository that was never fetched simply has no last-update line.
    let last_update = repo.date_of_last_update().ok();

    Ok(RenderContext {
        repo_name,
        remote: config.remote.clone(),
        master_branch: config.master_branch.clone(),
        shown_branches,
        ignored_branches,
        options,
        last_update,
    })
}
