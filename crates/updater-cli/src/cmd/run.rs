use crate::output::print_json;
use anyhow::Context;
use clap::builder::FalseyValueParser;
use clap::Args;
use std::path::{Path, PathBuf};
use updater_core::annotations;
use updater_core::config::{
    parse_ignore_list, Configuration, DEFAULT_COMMITTER_EMAIL, DEFAULT_COMMITTER_USERNAME,
    DEFAULT_COMMIT_MESSAGE, DEFAULT_PULL_REQUEST_TITLE,
};
use updater_core::git::SystemGit;
use updater_core::github::{GitHubClient, DEFAULT_API_URL};
use updater_core::summary::JobSummary;
use updater_core::updater::Updater;

/// Every input can come from a flag or from the environment the Actions
/// runner provides (`INPUT_*` for action inputs, `GITHUB_*` for context).
#[derive(Args)]
pub struct RunArgs {
    /// Token used for API calls (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Repository to update, as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Branch the pull request targets
    #[arg(long, env = "GITHUB_REF_NAME")]
    base_branch: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Actions to leave alone: comma-separated or a JSON array
    #[arg(long, env = "INPUT_IGNORE")]
    ignore: Option<String>,

    #[arg(long, env = "INPUT_COMMITTER_USERNAME", default_value = DEFAULT_COMMITTER_USERNAME)]
    committer_username: String,

    #[arg(long, env = "INPUT_COMMITTER_EMAIL", default_value = DEFAULT_COMMITTER_EMAIL)]
    committer_email: String,

    #[arg(long, env = "INPUT_COMMIT_MESSAGE", default_value = DEFAULT_COMMIT_MESSAGE)]
    commit_message: String,

    #[arg(long, env = "INPUT_PULL_REQUEST_TITLE", default_value = DEFAULT_PULL_REQUEST_TITLE)]
    pull_request_title: String,

    /// Write updates and a diff to the job summary instead of opening a pull request
    #[arg(long, env = "INPUT_SKIP_PULL_REQUEST", value_parser = FalseyValueParser::new())]
    skip_pull_request: bool,

    /// Also write the pull request body here; must be outside the checkout
    #[arg(long, env = "INPUT_PULL_REQUEST_BODY_FILE")]
    pull_request_body_file: Option<PathBuf>,
}

impl RunArgs {
    fn into_configuration(self, workspace: &Path) -> anyhow::Result<Configuration> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .context("no token: set --token, INPUT_TOKEN or GITHUB_TOKEN")?;

        let mut config = Configuration::new(&token, &self.repository, &self.base_branch)?;
        config.api_url = self.api_url;
        config.workspace = workspace.to_path_buf();
        if let Some(ignore) = self.ignore.as_deref() {
            config.ignore = parse_ignore_list(ignore)?;
        }
        config.committer_username = self.committer_username;
        config.committer_email = self.committer_email;
        config.commit_message = self.commit_message;
        config.pull_request_title = self.pull_request_title;
        config.skip_pull_request = self.skip_pull_request;
        config.pull_request_body_file = self.pull_request_body_file;
        config.validate()?;
        Ok(config)
    }
}

pub fn run(root: &Path, args: RunArgs, json: bool) -> anyhow::Result<i32> {
    let config = {
        let _group = annotations::group("Parse Configuration");
        let config = args
            .into_configuration(root)
            .context("invalid configuration")?;
        annotations::echo("Using Configuration:");
        annotations::echo(&serde_json::to_string_pretty(&config)?);
        config
    };

    let github = GitHubClient::new(&config.api_url, &config.token)
        .context("failed to build GitHub client")?;
    let git = SystemGit::new(&config.workspace);

    let outcome = {
        let _group = annotations::group("Run GitHub Actions Version Updater");
        Updater::new(&config, &github, &git, JobSummary::from_env())
            .run()
            .inspect_err(|e| annotations::error(&e.to_string()))?
    };
    tracing::info!(?outcome, "run finished");

    if json {
        print_json(&outcome)?;
    }
    Ok(outcome.exit_code())
}
