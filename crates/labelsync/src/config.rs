use crate::cli::Backend;
use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_LABELS_FILE: &str = ".github/labels.yml";
const LOCAL_SETTINGS_FILE: &str = ".labelsync.toml";

/// Tool settings, layered from files, environment and flags
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub backend: Option<Backend>,
    /// Global URL override (applies to any backend)
    pub url: Option<String>,
    /// Global token override (applies to any backend)
    pub token: Option<String>,
    /// Label file used when a command gets no `--file`
    pub labels_file: PathBuf,
    pub concurrency: usize,
    #[serde(default)]
    pub github: GitHubSettings,
    #[serde(default)]
    pub gitlab: GitLabSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GitHubSettings {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub token: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GitLabSettings {
    /// Numeric ID or `group/project` path
    pub project_id: Option<String>,
    pub token: Option<String>,
    pub url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: None,
            url: None,
            token: None,
            labels_file: PathBuf::from(DEFAULT_LABELS_FILE),
            concurrency: 1,
            github: GitHubSettings::default(),
            gitlab: GitLabSettings::default(),
        }
    }
}

impl Settings {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let explicit_path = config_path.as_deref();
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        let mut settings = Self::from_figment(figment(explicit_path))?;
        settings.fill_from_ci_env(|key| std::env::var(key).ok());

        Ok(settings)
    }

    /// Fill still-unset values from the conventional CI variables
    /// (`GITHUB_TOKEN`, `GITHUB_REPOSITORY`, `GITLAB_TOKEN`).
    fn fill_from_ci_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.github.token.is_none() {
            self.github.token = lookup("GITHUB_TOKEN");
        }
        if self.gitlab.token.is_none() {
            self.gitlab.token = lookup("GITLAB_TOKEN");
        }
        // GitHub Actions exposes the current repository as owner/repo
        if self.github.owner.is_none() && self.github.repo.is_none() {
            if let Some((owner, repo)) = lookup("GITHUB_REPOSITORY")
                .as_deref()
                .and_then(split_repository)
            {
                self.github.owner = Some(owner);
                self.github.repo = Some(repo);
            }
        }
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    /// Backend from the flag, then settings, then GitHub
    pub fn resolve_backend(&self, cli_backend: Option<Backend>) -> Backend {
        cli_backend.or(self.backend).unwrap_or_default()
    }

    /// Apply backend-specific configuration, falling back to global settings
    pub fn apply_backend_config(&mut self, backend: Backend) {
        let (url, token) = match backend {
            Backend::GitHub => (&mut self.github.url, &mut self.github.token),
            Backend::GitLab => (&mut self.gitlab.url, &mut self.gitlab.token),
        };
        // Global url/token win over backend-specific ones
        if self.url.is_none() {
            self.url = url.take();
        }
        if self.token.is_none() {
            self.token = token.take();
        }
        self.backend = Some(backend);
    }

    pub fn merge_with_cli(&mut self, cli_url: Option<String>, cli_token: Option<String>) {
        if let Some(url) = cli_url {
            self.url = Some(url);
        }
        if let Some(token) = cli_token {
            self.token = Some(token);
        }
    }

    pub fn validate(&self, backend: Backend) -> Result<()> {
        let name = backend.display_name();

        if self.token.is_none() {
            let env_hint = match backend {
                Backend::GitHub => "GITHUB_TOKEN",
                Backend::GitLab => "GITLAB_TOKEN",
            };
            return Err(anyhow!(
                "{} token not configured. Set via --token, LABELSYNC_TOKEN or {} env var, or config file",
                name,
                env_hint
            ));
        }

        match backend {
            Backend::GitHub => {
                if self.github.owner.is_none() || self.github.repo.is_none() {
                    return Err(anyhow!(
                        "GitHub repository not configured. Set github.owner and github.repo in the config file, \
                         LABELSYNC_GITHUB_OWNER/LABELSYNC_GITHUB_REPO, or GITHUB_REPOSITORY=owner/repo"
                    ));
                }
            }
            Backend::GitLab => {
                if self.gitlab.project_id.is_none() {
                    return Err(anyhow!(
                        "GitLab project not configured. Set gitlab.project_id in the config file \
                         or LABELSYNC_GITLAB_PROJECT_ID"
                    ));
                }
            }
        }

        if self.concurrency == 0 {
            return Err(anyhow!("concurrency must be at least 1"));
        }
        Ok(())
    }
}

/// Build the layered provider chain: defaults, files, then environment
fn figment(explicit: Option<&Path>) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

    for path in config_paths(explicit) {
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }
    }

    figment
        .merge(Env::prefixed("LABELSYNC_").map(|key| {
            // Map LABELSYNC_GITHUB_OWNER -> github.owner for nested config
            match key.as_str() {
                "github_owner" => "github.owner".into(),
                "github_repo" => "github.repo".into(),
                "github_url" => "github.url".into(),
                "github_token" => "github.token".into(),
                "gitlab_project_id" => "gitlab.project_id".into(),
                "gitlab_url" => "gitlab.url".into(),
                "gitlab_token" => "gitlab.token".into(),
                _ => key.into(),
            }
        }))
}

fn split_repository(value: &str) -> Option<(String, String)> {
    let (owner, repo) = value.trim().split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "labelsync").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("labelsync").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("labelsync")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(LOCAL_SETTINGS_FILE))
}
