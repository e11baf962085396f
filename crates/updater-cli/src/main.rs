mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::run::RunArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gha-updater",
    about = "Keep the actions pinned in GitHub workflows on their latest releases",
    version,
    propagate_version = true
)]
struct Cli {
    /// Repository checkout (default: auto-detect from .git/)
    #[arg(long, global = true, env = "GITHUB_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every workflow for newer action releases, rewrite them, and open a pull request
    Run(RunArgs),

    /// List the action references pinned in workflow files, without network access
    Scan {
        /// Workflow files to scan (default: .github/workflows/*.yml)
        files: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run(_) => tracing::Level::INFO,
        Commands::Scan { .. } => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.json {
        updater_core::annotations::route_to_stderr();
    }

    let root = root::resolve_root(cli.workspace.as_deref());

    let result = match cli.command {
        Commands::Run(args) => cmd::run::run(&root, args, cli.json),
        Commands::Scan { files } => cmd::scan::run(&root, &files, cli.json).map(|()| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
