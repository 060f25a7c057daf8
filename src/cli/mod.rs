//! Command-line interface for issue-triage.
//!
//! Thin drivers only: the `triage` command wires the concrete clients to
//! the orchestrator and maps the summary to an exit code; `labels` and
//! `config` are debug aids.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{GitHubClient, IssueTracker, ModelClient};
use crate::config;
use crate::core::{TriageOrchestrator, TriageRequest};
use crate::domain::IssueRef;

/// issue-triage - automated triage for incoming GitHub issues
#[derive(Parser, Debug)]
#[command(name = "issue-triage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Triage a single issue
    Triage {
        /// Issue number
        #[arg(short, long)]
        number: u64,

        /// Repository owner
        #[arg(short, long)]
        owner: String,

        /// Repository name
        #[arg(short, long)]
        repo: String,

        /// Issue title (fetched from the tracker if not provided)
        #[arg(long)]
        title: Option<String>,

        /// Issue body (fetched alongside the title)
        #[arg(long)]
        body: Option<String>,

        /// Tracker access token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,

        /// Model service token
        #[arg(long, env = "TRIAGE_MODEL_TOKEN", hide_env_values = true, default_value = "")]
        model_token: String,
    },

    /// Print the loaded label taxonomy
    Labels,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command, returning the process exit code
    pub async fn execute(self) -> Result<i32> {
        match self.command {
            Commands::Triage {
                number,
                owner,
                repo,
                title,
                body,
                token,
                model_token,
            } => run_triage(number, owner, repo, title, body, token, model_token).await,
            Commands::Labels => {
                show_labels()?;
                Ok(0)
            }
            Commands::Config => {
                show_config()?;
                Ok(0)
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_triage(
    number: u64,
    owner: String,
    repo: String,
    title: Option<String>,
    body: Option<String>,
    token: String,
    model_token: String,
) -> Result<i32> {
    let config = config::config()?;
    let taxonomy = config.load_taxonomy()?;

    let tracker = GitHubClient::new(token.clone());
    let model = ModelClient::new(config.model_endpoint.clone(), model_token);

    // Fetch title/body from the tracker when not supplied
    let (title, body) = match title {
        Some(title) => (title, body.unwrap_or_default()),
        None => {
            let issue_ref = IssueRef::new(owner.clone(), repo.clone(), number);
            let issue = tracker
                .fetch_issue(&issue_ref)
                .await
                .with_context(|| format!("Failed to fetch issue {}", issue_ref))?;
            (issue.title, issue.body)
        }
    };

    let request = TriageRequest {
        number,
        title,
        body,
        owner,
        repo,
        credential: token,
    };

    let orchestrator =
        TriageOrchestrator::new(&model, &model, &tracker, &taxonomy, config.triage.clone());
    let summary = orchestrator.run(&request).await;

    print!("{}", summary.render());
    Ok(summary.exit_code())
}

fn show_labels() -> Result<()> {
    let config = config::config()?;
    let taxonomy = config.load_taxonomy()?;

    for (name, spec) in &taxonomy.labels {
        match &spec.group {
            Some(group) => println!("{:<24} [{}] {}", name, group, spec.description),
            None => println!("{:<24} {}", name, spec.description),
        }
    }

    Ok(())
}

fn show_config() -> Result<()> {
    let config = config::config()?;

    println!("model endpoint: {}", config.model_endpoint);
    println!("taxonomy:       {}", config.taxonomy_path.display());
    match &config.config_file {
        Some(path) => println!("config file:    {}", path.display()),
        None => println!("config file:    (none found)"),
    }
    println!(
        "labels:         pending={} duplicate={}",
        config.triage.pending_label, config.triage.duplicate_label
    );
    println!(
        "retry:          {} attempts, {}ms initial delay",
        config.triage.retry.max_attempts, config.triage.retry.initial_delay_ms
    );

    Ok(())
}
