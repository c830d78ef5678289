use std::time::Duration;
use ureq::Agent;

use crate::error::{GitLabError, Result};
use crate::models::*;

/// GitLab REST API client scoped to one project's labels
pub struct GitLabClient {
    agent: Agent,
    base_url: String,
    token: String,
    project_id: String,
}

impl GitLabClient {
    /// Create a new GitLab client.
    ///
    /// `base_url` should include the API version path, e.g. `https://gitlab.com/api/v4`.
    /// `project_id` can be a numeric ID or a path like `group/project`.
    pub fn new(base_url: &str, token: &str, project_id: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            project_id: project_id.to_string(),
        }
    }

    /// Build a project-scoped URL
    fn project_url(&self, path: &str) -> String {
        format!(
            "{}/projects/{}{}",
            self.base_url,
            urlencoding::encode(&self.project_id),
            path
        )
    }

    /// Labels can be addressed by title as well as by ID
    fn label_url(&self, name: &str) -> String {
        self.project_url(&format!("/labels/{}", urlencoding::encode(name)))
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

        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());

        // Try to parse as GitLab error JSON
        let message = if let Ok(error_value) = serde_json::from_str::<serde_json::Value>(&body) {
            // GitLab can return {"message": "..."}, {"message": {"field": [...]}} or {"error": "..."}
            if let Some(msg) = error_value.get("message").and_then(|m| m.as_str()) {
                msg.to_string()
            } else if let Some(msg) = error_value.get("message").filter(|m| m.is_object()) {
                msg.to_string()
            } else if let Some(msg) = error_value.get("error").and_then(|e| e.as_str()) {
                msg.to_string()
            } else if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                body
            }
        } else if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };

        if status == 401 {
            Err(GitLabError::Unauthorized)
        } else {
            Err(GitLabError::Api { status, message })
        }
    }

    /// Handle transport-level errors
    fn handle_error(&self, err: ureq::Error) -> GitLabError {
        GitLabError::Http(err)
    }

    // ==================== Label Operations ====================

    /// List one page of labels (pages start at 1)
    pub fn list_labels_page(&self, page: usize, per_page: usize) -> Result<Vec<GitLabLabel>> {
        // Group labels show up by default but cannot be edited through the project
        let url = self.project_url(&format!(
            "/labels?per_page={}&page={}&include_ancestor_groups=false",
            per_page, page
        ));

        let response = self
            .agent
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| self.handle_error(e))?;

        let mut response = self.check_response(response)?;
        let labels: Vec<GitLabLabel> = response.body_mut().read_json()?;
        Ok(labels)
    }

    /// Get a label by name, `None` if it does not exist
    pub fn get_label(&self, name: &str) -> Result<Option<GitLabLabel>> {
        let url = self.label_url(name);

        let response = self
            .agent
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| self.handle_error(e))?;

        let mut response = match self.check_response(response) {
            Ok(response) => response,
            Err(GitLabError::Api { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let label: GitLabLabel = response.body_mut().read_json()?;
        Ok(Some(label))
    }

    /// Create a new label
    pub fn create_label(&self, label: &CreateGitLabLabel) -> Result<GitLabLabel> {
        let url = self.project_url("/labels");
        let response = self
            .agent
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send_json(label)
            .map_err(|e| self.handle_error(e))?;
        let mut response = self.check_response(response)?;
        let created: GitLabLabel = response.body_mut().read_json()?;
        Ok(created)
    }

    /// Update (and optionally rename) a label by its current name
    pub fn update_label(&self, name: &str, update: &UpdateGitLabLabel) -> Result<GitLabLabel> {
        let url = self.label_url(name);
        let response = self
            .agent
            .put(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send_json(update)
            .map_err(|e| self.handle_error(e))?;
        let mut response = match self.check_response(response) {
            Ok(response) => response,
            Err(GitLabError::Api { status: 404, .. }) => {
                return Err(GitLabError::LabelNotFound(name.to_string()));
            }
            Err(e) => return Err(e),
        };
        let label: GitLabLabel = response.body_mut().read_json()?;
        Ok(label)
    }

    /// Delete a label by name
    pub fn delete_label(&self, name: &str) -> Result<()> {
        let url = self.label_url(name);
        let response = self
            .agent
            .delete(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .call()
            .map_err(|e| self.handle_error(e))?;
        match self.check_response(response) {
            Ok(_) => Ok(()),
            Err(GitLabError::Api { status: 404, .. }) => {
                Err(GitLabError::LabelNotFound(name.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
