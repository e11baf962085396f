//! Source-control plumbing, done by shelling out to the `git` binary.

use crate::error::{Result, UpdaterError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Branch prefix for update branches. The suffix is a unix timestamp so
/// repeated runs never collide.
pub const BRANCH_PREFIX: &str = "gh-actions-update-";

pub fn update_branch_name(unix_seconds: i64) -> String {
    format!("{BRANCH_PREFIX}{unix_seconds}")
}

pub trait SourceControl {
    fn configure_author(&self, username: &str, email: &str) -> Result<()>;

    /// True if the working tree has uncommitted changes.
    fn has_changes(&self) -> Result<bool>;

    /// Create `branch` from the current HEAD and switch to it, carrying the
    /// working tree changes along.
    fn create_branch(&self, branch: &str) -> Result<()>;

    fn commit_and_push(&self, message: &str, author: &str, branch: &str) -> Result<()>;

    /// Unified diff of the uncommitted changes.
    fn diff(&self) -> Result<String>;
}

// ---------------------------------------------------------------------------
// SystemGit
// ---------------------------------------------------------------------------

pub struct SystemGit {
    /// Resolved lazily so runs that never touch git work without it.
    bin: Option<PathBuf>,
    workdir: PathBuf,
}

impl SystemGit {
    pub fn new(workdir: &Path) -> Self {
        Self {
            bin: which::which("git").ok(),
            workdir: workdir.to_path_buf(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.bin.is_some()
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let bin = self.bin.as_ref().ok_or(UpdaterError::GitNotInstalled)?;
        tracing::debug!(?args, "git");
        let output = Command::new(bin)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| UpdaterError::GitFailed {
                command: args.join(" "),
                stderr: e.to_string(),
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(UpdaterError::GitFailed {
                command: args.join(" "),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn commit(&self, message: &str, author: &str) -> Result<()> {
        self.run(&["add", "--all"])?;
        let author_arg = format!("--author={author}");
        self.run(&["commit", &author_arg, "-m", message])?;
        Ok(())
    }

    fn push(&self, branch: &str) -> Result<()> {
        self.run(&["push", "--set-upstream", "origin", branch])?;
        Ok(())
    }
}

impl SourceControl for SystemGit {
    fn configure_author(&self, username: &str, email: &str) -> Result<()> {
        self.run(&["config", "user.name", username])?;
        self.run(&["config", "user.email", email])?;
        Ok(())
    }

    fn has_changes(&self) -> Result<bool> {
        Ok(!self.run(&["status", "--porcelain"])?.trim().is_empty())
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch])?;
        Ok(())
    }

    fn commit_and_push(&self, message: &str, author: &str, branch: &str) -> Result<()> {
        self.commit(message, author)?;
        self.push(branch)
    }

    fn diff(&self) -> Result<String> {
        self.run(&["diff"])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
