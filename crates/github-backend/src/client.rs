use std::time::Duration;
use ureq::Agent;

use crate::error::{GitHubError, Result};
use crate::models::*;

/// GitHub REST API client scoped to one repository's labels
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    /// Create a new GitHub client targeting api.github.com
    pub fn new(owner: &str, repo: &str, token: &str) -> Self {
        Self::with_base_url("https://api.github.com", owner, repo, token)
    }

    /// Create a new GitHub client with a custom base URL (for GitHub Enterprise or testing)
    pub fn with_base_url(base_url: &str, owner: &str, repo: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
        }
    }

    /// Build a repo-scoped URL
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url, self.owner, self.repo, path
        )
    }

    /// URL of a single label; names may contain spaces, colons, emoji
    fn label_url(&self, name: &str) -> String {
        self.repo_url(&format!("/labels/{}", urlencoding::encode(name)))
    }

    /// Build the Authorization header value
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Check response status and return error if not successful
    fn check_response(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        // Detect rate limiting: 403 or 429 with x-ratelimit-remaining: 0
        if status == 403 || status == 429 {
            if let Some(remaining) = response.headers().get("x-ratelimit-remaining") {
                if remaining.to_str().unwrap_or("") == "0" {
                    return Err(GitHubError::RateLimited);
                }
            }
        }

        // Try to read error body
        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());

        // Try to parse as GitHub error response
        let message = if let Ok(error_response) = serde_json::from_str::<serde_json::Value>(&body) {
            error_response
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or(&body)
                .to_string()
        } else if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };

        if status == 401 {
            Err(GitHubError::Unauthorized)
        } else {
            Err(GitHubError::Api { status, message })
        }
    }

    // ==================== Label Operations ====================

    /// List one page of labels (pages start at 1)
    pub fn list_labels_page(&self, page: usize, per_page: usize) -> Result<Vec<GitHubLabel>> {
        let url = format!(
            "{}?per_page={}&page={}",
            self.repo_url("/labels"),
            per_page,
            page
        );

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(GitHubError::Http)?;

        let mut response = self.check_response(response)?;
        let labels: Vec<GitHubLabel> = response.body_mut().read_json()?;
        Ok(labels)
    }

    /// Get a label by name, `None` if it does not exist
    pub fn get_label(&self, name: &str) -> Result<Option<GitHubLabel>> {
        let url = self.label_url(name);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(GitHubError::Http)?;

        let mut response = match self.check_response(response) {
            Ok(response) => response,
            Err(GitHubError::Api { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let label: GitHubLabel = response.body_mut().read_json()?;
        Ok(Some(label))
    }

    /// Create a label
    pub fn create_label(&self, label: &CreateGitHubLabel) -> Result<GitHubLabel> {
        let url = self.repo_url("/labels");

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send_json(label)
            .map_err(GitHubError::Http)?;

        let mut response = self.check_response(response)?;
        let created: GitHubLabel = response.body_mut().read_json()?;
        Ok(created)
    }

    /// Update (and optionally rename) a label by its current name
    pub fn update_label(&self, name: &str, update: &UpdateGitHubLabel) -> Result<GitHubLabel> {
        let url = self.label_url(name);

        let response = self
            .agent
            .patch(&url)
            .header("Authorization", &self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send_json(update)
            .map_err(GitHubError::Http)?;

        let mut response = match self.check_response(response) {
            Ok(response) => response,
            Err(GitHubError::Api { status: 404, .. }) => {
                return Err(GitHubError::LabelNotFound(name.to_string()));
            }
            Err(e) => return Err(e),
        };
        let label: GitHubLabel = response.body_mut().read_json()?;
        Ok(label)
    }

    /// Delete a label by name
    pub fn delete_label(&self, name: &str) -> Result<()> {
        let url = self.label_url(name);

        let response = self
            .agent
            .delete(&url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(GitHubError::Http)?;

        match self.check_response(response) {
            Ok(_) => Ok(()),
            Err(GitHubError::Api { status: 404, .. }) => {
                Err(GitHubError::LabelNotFound(name.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
