//! Report command — renders the HTML branch report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::cli::ConfigOverrides;

/// Report command options.
#[derive(Parser)]
pub struct ReportCommand {
    /// Configuration overrides.
    #[command(flatten)]
    pub config: ConfigOverrides,

    /// Write the report to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ReportCommand {
    /// Executes the report command.
    pub fn execute(self) -> Result<()> {
        let config = self.config.resolve()?;
        let context = crate::cli::build_context(&config)?;

        info!(
            repo = %context.repo_name,
            remote = %context.remote,
            branches = context.shown_branches.len(),
            "rendering branch report"
        );

        let page = crate::report::render(&context);

        match &self.output {
            Some(path) => std::fs::write(path, page)
                .with_context(|| format!("Failed to write report to '{}'", path.display()))?,
            None => print!("{page}"),
        }

        Ok(())
    }
}
