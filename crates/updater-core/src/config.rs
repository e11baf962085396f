use crate::error::{Result, UpdaterError};
use crate::github::DEFAULT_API_URL;
use crate::reference::{validate_repository, ActionReference};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_COMMITTER_USERNAME: &str = "github-actions[bot]";
pub const DEFAULT_COMMITTER_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update GitHub Action Versions";
pub const DEFAULT_PULL_REQUEST_TITLE: &str = "Update GitHub Action Versions";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone, Serialize)]
pub struct Configuration {
    #[serde(skip)]
    pub token: String,
    /// `owner/name` of the repository being updated.
    pub repository: String,
    /// Branch the pull request targets and the update branch starts from.
    pub base_branch: String,
    pub api_url: String,
    pub workspace: PathBuf,
    pub ignore: IgnoreSet,
    pub committer_username: String,
    pub committer_email: String,
    pub commit_message: String,
    pub pull_request_title: String,
    pub skip_pull_request: bool,
    pub pull_request_body_file: Option<PathBuf>,
}

impl Configuration {
    /// Defaults for everything except the three values no run can guess.
    pub fn new(token: &str, repository: &str, base_branch: &str) -> Result<Self> {
        validate_repository(repository)?;
        let base_branch = base_branch.trim();
        let base_branch = base_branch.strip_prefix("refs/heads/").unwrap_or(base_branch);
        if base_branch.is_empty() {
            return Err(UpdaterError::InvalidConfig {
                field: "base_branch".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(Self {
            token: token.to_string(),
            repository: repository.to_string(),
            base_branch: base_branch.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            workspace: PathBuf::from("."),
            ignore: IgnoreSet::default(),
            committer_username: DEFAULT_COMMITTER_USERNAME.to_string(),
            committer_email: DEFAULT_COMMITTER_EMAIL.to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            pull_request_title: DEFAULT_PULL_REQUEST_TITLE.to_string(),
            skip_pull_request: false,
            pull_request_body_file: None,
        })
    }

    /// `Name <email>`, as accepted by `git commit --author`.
    pub fn commit_author(&self) -> String {
        format!("{} <{}>", self.committer_username, self.committer_email)
    }

    /// Checks that span several fields. The pull request body file must live
    /// outside the workspace, otherwise `git add --all` commits it.
    pub fn validate(&self) -> Result<()> {
        let Some(file) = &self.pull_request_body_file else {
            return Ok(());
        };
        let file = normalize(file)?;
        if file.starts_with(normalize(&self.workspace)?) {
            return Err(UpdaterError::InvalidConfig {
                field: "pull_request_body_file".to_string(),
                reason: format!(
                    "{} is inside the workspace and would be committed",
                    file.display()
                ),
            });
        }
        Ok(())
    }
}

/// Absolute form of `path` with `.` and `..` resolved lexically. The file
/// need not exist yet.
fn normalize(path: &Path) -> Result<PathBuf> {
    let mut out = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// IgnoreSet
// ---------------------------------------------------------------------------

/// Actions the operator never wants touched. An entry matches a reference
/// either exactly (`owner/repo@v1`) or by repository (`owner/repo`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IgnoreSet(BTreeSet<String>);

impl IgnoreSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn matches(&self, raw: &str) -> bool {
        if self.0.contains(raw) {
            return true;
        }
        ActionReference::parse(raw).is_some_and(|r| self.0.contains(&r.repository))
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        IgnoreSet(iter.into_iter().map(Into::into).collect())
    }
}

/// Parse the ignore input: either a JSON array of strings or a
/// comma-separated list. Blank entries are dropped.
pub fn parse_ignore_list(input: &str) -> Result<IgnoreSet> {
    let trimmed = input.trim();
    let entries: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| UpdaterError::InvalidConfig {
            field: "ignore".to_string(),
            reason: e.to_string(),
        })?
    } else {
        trimmed.split(',').map(str::to_string).collect()
    };
    Ok(entries
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
