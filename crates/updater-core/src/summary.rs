//! Markdown written to the job summary page of the current run.

use crate::error::Result;
use crate::io;
use std::path::PathBuf;

/// Environment variable the runner sets to the summary file of the step.
pub const STEP_SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";

#[derive(Debug, Clone, Default)]
pub struct JobSummary {
    path: Option<PathBuf>,
}

impl JobSummary {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var_os(STEP_SUMMARY_ENV).map(PathBuf::from))
    }

    pub fn append(&self, markdown: &str) -> Result<()> {
        let Some(path) = &self.path else {
            tracing::debug!("{STEP_SUMMARY_ENV} not set, skipping job summary");
            return Ok(());
        };
        let mut text = markdown.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        io::append_text(path, &text)
    }

    pub fn append_diff(&self, diff: &str) -> Result<()> {
        self.append(&format!("```diff\n{}\n```", diff.trim_end()))
    }
}
