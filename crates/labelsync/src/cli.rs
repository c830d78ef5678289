use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "labelsync",
    version,
    about = "Keep repository labels in sync with a declarative label file"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Label host to sync against. If not specified, uses config or defaults to GitHub.
    #[arg(long, short = 'b', value_enum, global = true, env = "LABELSYNC_BACKEND")]
    pub backend: Option<Backend>,

    /// Path to a TOML settings file
    #[arg(long, env = "LABELSYNC_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API base URL (overrides config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API token (overrides config file and environment)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Log each operation as it is applied
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// GitHub repository labels
    #[default]
    #[value(name = "github", alias = "gh")]
    GitHub,
    /// GitLab project labels
    #[value(name = "gitlab", alias = "gl")]
    GitLab,
}

impl Backend {
    pub fn display_name(&self) -> &'static str {
        match self {
            Backend::GitHub => "GitHub",
            Backend::GitLab => "GitLab",
        }
    }
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply the label file to the remote repository
    Sync {
        /// Label file (YAML, JSON or TOML). Defaults to the configured labels_file.
        #[arg(long, short = 'f', value_name = "PATH")]
        file: Option<PathBuf>,

        /// Show what would change without modifying anything
        #[arg(long, short = 'n')]
        dry_run: bool,

        /// Maximum number of API calls in flight
        #[arg(long, short = 'j', value_name = "N")]
        concurrency: Option<usize>,
    },
    /// Show the operations a sync would perform
    Plan {
        /// Label file (YAML, JSON or TOML). Defaults to the configured labels_file.
        #[arg(long, short = 'f', value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Check a label file without contacting the remote
    Validate {
        /// Label file (YAML, JSON or TOML). Defaults to the configured labels_file.
        #[arg(long, short = 'f', value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// List the labels currently on the remote
    #[command(visible_alias = "ls")]
    List,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completions and write to stdout
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "labelsync", &mut std::io::stdout());
    }
}
