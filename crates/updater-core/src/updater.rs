//! The check → rewrite → commit → pull request run.
//!
//! ```text
//! list workflows ─┬─ none ──────────────────────────────► NoWorkflows (0)
//!                 └─ reconcile each ─┬─ clean tree ─────► UpToDate (0)
//!                                    └─ changes ─┬─ skip ► ChangesNotSubmitted (1)
//!                                                └─ branch, commit, PR ► PullRequestOpened (0)
//! ```

use crate::annotations;
use crate::config::Configuration;
use crate::error::Result;
use crate::git::{update_branch_name, SourceControl};
use crate::github::{GitHubApi, NewPullRequest};
use crate::io;
use crate::reconcile::{reconcile, ReferenceOutcome};
use crate::release::{MemoizedReleases, ReleaseSource};
use crate::summary::JobSummary;
use serde::Serialize;
use std::collections::BTreeSet;

pub const PULL_REQUEST_HEADER: &str = "### GitHub Actions Version Updates";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    NoWorkflows,
    UpToDate,
    PullRequestOpened {
        branch: String,
        number: u64,
        url: String,
    },
    /// Updates were written to the working tree but the operator opted out
    /// of pull requests.
    ChangesNotSubmitted,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::NoWorkflows
            | RunOutcome::UpToDate
            | RunOutcome::PullRequestOpened { .. } => 0,
            RunOutcome::ChangesNotSubmitted => 1,
        }
    }
}

/// Header line followed by the change notes, one per line, sorted.
pub fn pull_request_body(notes: &BTreeSet<String>) -> String {
    let mut body = format!("{PULL_REQUEST_HEADER}\n");
    for note in notes {
        body.push_str(note);
        body.push('\n');
    }
    body
}

// ---------------------------------------------------------------------------
// Updater
// ---------------------------------------------------------------------------

pub struct Updater<'a, G, S> {
    config: &'a Configuration,
    github: &'a G,
    git: &'a S,
    summary: JobSummary,
    clock: fn() -> i64,
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl<'a, G: GitHubApi, S: SourceControl> Updater<'a, G, S> {
    pub fn new(config: &'a Configuration, github: &'a G, git: &'a S, summary: JobSummary) -> Self {
        Self {
            config,
            github,
            git,
            summary,
            clock: unix_now,
        }
    }

    /// Replace the source of the branch-name timestamp.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn run(&self) -> Result<RunOutcome> {
        let config = self.config;
        let paths = self.github.list_workflow_paths(&config.repository)?;
        if paths.is_empty() {
            annotations::warning(&format!(
                "No Workflow found in \"{}\". Skipping GitHub Actions Version Update",
                config.repository
            ));
            return Ok(RunOutcome::NoWorkflows);
        }

        if !config.ignore.is_empty() {
            let ignored: Vec<&str> = config.ignore.iter().collect();
            annotations::echo(&format!("Actions \"{}\" will be skipped", ignored.join(", ")));
        }

        let releases = MemoizedReleases::new(self.github);
        let mut notes = BTreeSet::new();
        for path in &paths {
            let _group = annotations::group(&format!("Checking \"{path}\" for updates"));
            match self.update_workflow(path, &releases) {
                Ok(found) => notes.extend(found),
                Err(e) => {
                    tracing::warn!(%path, error = %e, "workflow skipped");
                    annotations::echo(&format!("Skipping \"{path}\": {e}"));
                }
            }
        }

        if !self.git.has_changes()? {
            annotations::notice("Everything is up-to-date! \u{1F389} \u{1F389}");
            return Ok(RunOutcome::UpToDate);
        }

        let body = pull_request_body(&notes);
        self.summary.append(&body)?;
        if let Some(file) = &config.pull_request_body_file {
            io::atomic_write(file, body.as_bytes())?;
        }

        if config.skip_pull_request {
            self.summary.append_diff(&self.git.diff()?)?;
            annotations::error(
                "Updates found but skipping pull request. Checkout build summary for details",
            );
            return Ok(RunOutcome::ChangesNotSubmitted);
        }

        let branch = update_branch_name((self.clock)());
        self.git
            .configure_author(&config.committer_username, &config.committer_email)?;
        self.git.create_branch(&branch)?;
        self.git
            .commit_and_push(&config.commit_message, &config.commit_author(), &branch)?;

        let pr = self.github.create_pull_request(
            &config.repository,
            &NewPullRequest {
                title: config.pull_request_title.clone(),
                head: branch.clone(),
                base: config.base_branch.clone(),
                body,
            },
        )?;
        annotations::echo(&format!("Pull request #{} opened: {}", pr.number, pr.html_url));
        Ok(RunOutcome::PullRequestOpened {
            branch,
            number: pr.number,
            url: pr.html_url,
        })
    }

    /// Reconcile one workflow file and write it back if it changed.
    /// Returns the change notes it contributed.
    fn update_workflow(&self, path: &str, releases: &dyn ReleaseSource) -> Result<BTreeSet<String>> {
        let file = self.config.workspace.join(path);
        let text = std::fs::read_to_string(&file)?;
        let result = reconcile(&text, &self.config.ignore, releases)?;
        for outcome in &result.outcomes {
            report(outcome);
        }
        if result.changed {
            io::atomic_write(&file, result.text.as_bytes())?;
            tracing::info!(%path, "workflow updated");
        }
        Ok(result.notes)
    }
}

fn report(outcome: &ReferenceOutcome) {
    match outcome {
        ReferenceOutcome::Updated {
            repository,
            from,
            to,
        } => {
            annotations::echo(&format!("Found new version for \"{repository}\""));
            annotations::echo(&format!("Updating \"{from}\" with \"{to}\""));
        }
        ReferenceOutcome::UpToDate { repository } => {
            annotations::echo(&format!("No updates found for \"{repository}\""));
        }
        ReferenceOutcome::NoRelease { repository, status } => {
            annotations::warning(&format!(
                "Could not find any release for \"{repository}\", status code: {status}"
            ));
        }
        ReferenceOutcome::Malformed { reference } => {
            annotations::warning(&format!(
                "Action \"{reference}\" is in a wrong format, \
                 We only support community actions currently"
            ));
        }
        ReferenceOutcome::Ignored { reference } => {
            tracing::debug!(%reference, "ignored by configuration");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
