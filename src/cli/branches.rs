//! Branches command — terminal and YAML overviews of branch status.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::ConfigOverrides;
use crate::report::context::{BranchStatus, RenderContext};
use crate::report::format::{format_age, format_date};

/// Branches command options.
#[derive(Parser)]
pub struct BranchesCommand {
    /// Configuration overrides.
    #[command(flatten)]
    pub config: ConfigOverrides,

    /// Output the overview as YAML instead of a table.
    #[arg(long)]
    pub yaml: bool,
}

/// YAML view of the branch overview.
#[derive(Serialize)]
struct BranchesView {
    repository: String,
    remote: String,
    master_branch: String,
    branches: Vec<BranchView>,
    ignored_branches: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_update: Option<String>,
}

/// YAML view of one branch.
#[derive(Serialize)]
struct BranchView {
    name: String,
    age: String,
    unmerged_commits: usize,
    tip: CommitView,
}

/// YAML view of one commit.
#[derive(Serialize)]
struct CommitView {
    hash: String,
    author: String,
    email: String,
    date: String,
    subject: String,
}

impl BranchesCommand {
    /// Executes the branches command.
    pub fn execute(self) -> Result<()> {
        let config = self.config.resolve()?;
        let context = crate::cli::build_context(&config)?;

        if self.yaml {
            let view = BranchesView::from_context(&context);
            let yaml = serde_yaml::to_string(&view).context("Failed to serialize overview")?;
            println!("{yaml}");
            return Ok(());
        }

        print_table(&context)
    }
}

impl BranchesView {
    fn from_context(context: &RenderContext) -> Self {
        Self {
            repository: context.repo_name.clone(),
            remote: context.remote.clone(),
            master_branch: context.master_branch.clone(),
            branches: context
                .shown_branches
                .iter()
                .map(|summary| BranchView {
                    name: summary.name.clone(),
                    age: format_age(summary.age),
                    unmerged_commits: summary.total_unmerged,
                    tip: CommitView {
                        hash: summary.commit.hash().to_string(),
                        author: summary.commit.author().to_string(),
                        email: summary.commit.email().to_string(),
                        date: format_date(summary.commit.date()),
                        subject: summary.commit.subject().to_string(),
                    },
                })
                .collect(),
            ignored_branches: context.ignored_branches.clone(),
            last_update: context.last_update.map(format_date),
        }
    }
}

fn print_table(context: &RenderContext) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    writeln!(
        stdout,
        "{} (branches on {}, compared against {})",
        context.repo_name, context.remote, context.master_branch
    )?;

    if context.shown_branches.is_empty() {
        writeln!(stdout, "  no branches")?;
    }

    for summary in &context.shown_branches {
        match summary.status() {
            BranchStatus::NoUnmergedCommits => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                write!(stdout, "  \u{2713} {:<30}", summary.name)?;
                stdout.reset()?;
                write!(stdout, " merged, can be removed")?;
            }
            BranchStatus::HasUnmergedCommits => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                write!(stdout, "  \u{25cf} {:<30}", summary.name)?;
                stdout.reset()?;
                write!(stdout, " {:>3} unmerged", summary.total_unmerged)?;
            }
        }
        writeln!(
            stdout,
            "  {}  updated {} ago",
            summary.commit.short_hash(),
            format_age(summary.age)
        )?;
    }

    if !context.ignored_branches.is_empty() {
        writeln!(stdout, "Ignored: {}", context.ignored_branches.join(", "))?;
    }

    Ok(())
}
