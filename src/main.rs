//! credcheck - validate API credentials from the command line

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cred_check::config::DEFAULT_ENV_FILE;
use cred_check::types::Service;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "credcheck",
    version,
    about = "Validate GitHub, GitLab and Bluesky API credentials",
    long_about = "Validate GitHub, GitLab and Bluesky API credentials.\n\n\
        Credentials are read from environment variables, falling back to a .env file.\n\
        Exit code 0 means the credential works (possibly with limited permissions)."
)]
struct Cli {
    /// Dotenv file to read credentials from
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Ignore the dotenv file and use only the process environment
    #[arg(long, global = true)]
    no_env_file: bool,

    /// Treat a failed permission probe as a validation failure
    #[arg(long, global = true)]
    strict: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate GITHUB_API_KEY against the GitHub API
    Github,
    /// Validate GITLAB_API_KEY against a GitLab instance
    Gitlab,
    /// Validate BLUESKY_HANDLE / BLUESKY_PASSWORD against Bluesky
    Bluesky,
    /// Publish a post to Bluesky with the configured credentials
    Post {
        /// Text of the post
        message: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,cred_check={level},credcheck={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let env_file = (!args.no_env_file).then_some(args.env_file.as_path());

    let code = match args.command {
        Commands::Github => cli::run_validate(Service::GitHub, env_file, args.strict).await,
        Commands::Gitlab => cli::run_validate(Service::GitLab, env_file, args.strict).await,
        Commands::Bluesky => cli::run_validate(Service::Bluesky, env_file, args.strict).await,
        Commands::Post { message, yes } => cli::run_post(&message, env_file, yes).await?,
    };

    Ok(ExitCode::from(code))
}
