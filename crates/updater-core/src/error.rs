use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdaterError {
    #[error("invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("invalid repository '{0}': expected 'owner/name'")]
    InvalidRepository(String),

    #[error("git not found: install git and make sure it is on PATH")]
    GitNotInstalled,

    #[error("git {command} failed: {stderr}")]
    GitFailed { command: String, stderr: String },

    #[error("could not list workflows for {repository}, status code: {status}")]
    WorkflowListing { repository: String, status: u16 },

    #[error("pull request creation failed, status code: {status}: {body}")]
    PullRequestFailed { status: u16, body: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, UpdaterError>;
