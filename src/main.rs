mod autolink;
mod config;
mod event;
mod github;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};
use crate::github::GitHubClient;

/// pr-autolink — rewrites the marked section of a pull request description
/// with links to the JIRA issues named in the head branch.
#[derive(Parser, Debug)]
#[command(name = "pr-autolink", version, about)]
struct Cli {
    /// Path to the event payload JSON (defaults to $GITHUB_EVENT_PATH)
    #[arg(long)]
    event: Option<PathBuf>,

    /// Path to a config file (defaults to .pr-autolink.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compute and print the rewritten body without calling the GitHub API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("reading pull request event");
    let context = event::load(cli.event.as_deref())?;

    let _main_span = info_span!(
        "pr_autolink",
        owner = %context.pr.owner,
        repo = %context.pr.repo,
        pr = context.pr.number
    )
    .entered();
    debug!(branch = %context.head_branch, "pull request context loaded");

    info!("loading configuration");
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let issue_base_url = config
        .issue_base_url()
        .ok_or(ConfigError::MissingIssueBaseUrl)?;

    let keys = autolink::extract_issue_keys(&context.head_branch);
    debug!(keys = keys.len(), "extracted issue keys from branch");

    let new_body = match autolink::rewrite_body(
        &context.head_branch,
        context.body.as_deref(),
        &issue_base_url,
    ) {
        Some(body) => body,
        None => {
            info!("pull request has no body; nothing to update");
            println!(
                "{} pull request #{} has no body; nothing to update",
                "-".yellow(),
                context.pr.number
            );
            return Ok(());
        }
    };

    if cli.dry_run {
        info!("dry run; skipping pull request update");
        println!("{}", "── rewritten body (dry run) ──".bold());
        println!("{new_body}");
        return Ok(());
    }

    let token = config.github_token().ok_or(ConfigError::MissingToken)?;
    let client = GitHubClient::new(token);

    info!("performing pull request update");
    let status = github::push_update(&client, &context.pr, &new_body).await?;

    if status.is_success() {
        println!(
            "{} pull request #{} updated ({} issue {})",
            "✓".green(),
            context.pr.number,
            keys.len(),
            if keys.len() == 1 { "link" } else { "links" }
        );
    } else {
        println!("{} pull request update returned {}", "!".red(), status);
    }

    Ok(())
}
