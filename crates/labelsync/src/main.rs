mod cli;
mod color;
mod commands;
mod config;
mod output;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{Backend, Cli, Commands};
use config::Settings;
use github_backend::GitHubClient;
use gitlab_backend::GitLabClient;
use label_core::{ExecuteOptions, LabelStore};
use label_mock::MockLabelStore;
use output::output_error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const GITLAB_API_URL: &str = "https://gitlab.com/api/v4";

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        // Partial failure: results were printed, but the run did not succeed
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            output_error(&e, cli.format);
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr so stdout stays parseable
fn init_logging(verbose: bool) {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        for directive in ["label_core=info", "labelsync=info"] {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<bool> {
    // Completions need neither settings nor a remote
    if let Commands::Completions { shell } = &cli.command {
        Cli::generate_completions(*shell);
        return Ok(true);
    }

    let mut settings = Settings::load(cli.config.clone())?;

    match &cli.command {
        Commands::Validate { file } => {
            let file = label_file(file, &settings);
            commands::validate::handle_validate(&file, cli.format)?;
            Ok(true)
        }
        Commands::List => {
            let store = open_store(cli, &mut settings)?;
            commands::labels::handle_list(store.as_ref(), cli.format)?;
            Ok(true)
        }
        Commands::Plan { file } => {
            let file = label_file(file, &settings);
            let store = open_store(cli, &mut settings)?;
            commands::sync::handle_plan(store.as_ref(), &file, cli.format)?;
            Ok(true)
        }
        Commands::Sync {
            file,
            dry_run,
            concurrency,
        } => {
            let file = label_file(file, &settings);
            let concurrency = concurrency.unwrap_or(settings.concurrency);
            if concurrency == 0 {
                return Err(anyhow!("--concurrency must be at least 1"));
            }
            let options = ExecuteOptions {
                dry_run: *dry_run,
                concurrency,
            };

            let store = open_store(cli, &mut settings)?;
            commands::sync::handle_sync(store.as_ref(), &file, options, cli.format)
        }
        Commands::Completions { .. } => Ok(true),
    }
}

fn label_file(file: &Option<PathBuf>, settings: &Settings) -> PathBuf {
    file.clone()
        .unwrap_or_else(|| settings.labels_file.clone())
}

/// Create the label store for the selected backend
fn open_store(cli: &Cli, settings: &mut Settings) -> Result<Box<dyn LabelStore>> {
    if let Some(dir) = label_mock::get_mock_dir() {
        debug!(dir = %dir.display(), "using mock label store");
        let store = MockLabelStore::new(&dir)
            .with_context(|| format!("Failed to load mock scenario {}", dir.display()))?;
        return Ok(Box::new(store));
    }

    let backend = settings.resolve_backend(cli.backend);
    settings.apply_backend_config(backend);
    settings.merge_with_cli(cli.url.clone(), cli.token.clone());
    settings.validate(backend)?;

    let token = settings
        .token
        .as_deref()
        .context("API token not configured")?;

    match backend {
        Backend::GitHub => {
            let (Some(owner), Some(repo)) = (&settings.github.owner, &settings.github.repo)
            else {
                return Err(anyhow!("GitHub repository not configured"));
            };
            debug!(%owner, %repo, "using GitHub label store");
            let client = match settings.url.as_deref() {
                Some(url) => GitHubClient::with_base_url(url, owner, repo, token),
                None => GitHubClient::new(owner, repo, token),
            };
            Ok(Box::new(client))
        }
        Backend::GitLab => {
            let project_id = settings
                .gitlab
                .project_id
                .as_deref()
                .context("GitLab project not configured")?;
            let url = settings.url.as_deref().unwrap_or(GITLAB_API_URL);
            debug!(project = %project_id, %url, "using GitLab label store");
            Ok(Box::new(GitLabClient::new(url, token, project_id)))
        }
    }
}
