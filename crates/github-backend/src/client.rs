use std::time::Duration;
use tracing::debug;
use ureq::Agent;

use crate::error::{GitHubError, Result};
use crate::models::*;

/// Default public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub REST API client for issue labels
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a new GitHub client targeting api.github.com
    pub fn new(token: &str) -> Self {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    /// Create a new GitHub client with a custom base URL (for GitHub Enterprise or testing)
    pub fn with_base_url(base_url: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Build a repo-scoped URL
    fn repo_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!("{}/repos/{}/{}{}", self.base_url, owner, repo, path)
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

        // Rate limiting: 403 with x-ratelimit-remaining: 0
        let rate_limited = status == 403
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|remaining| remaining.to_str().unwrap_or("") == "0");

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
            Err(GitHubError::Unauthorized(message))
        } else if rate_limited {
            Err(GitHubError::RateLimited(message))
        } else {
            Err(GitHubError::Api { status, message })
        }
    }

    /// List labels attached to an issue or pull request
    pub fn list_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<GitHubLabel>> {
        let url = format!(
            "{}?per_page=100",
            self.repo_url(owner, repo, &format!("/issues/{}/labels", number))
        );
        debug!(%url, "Listing issue labels");

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

    /// Replace every label on an issue or pull request
    ///
    /// Labels that do not exist in the repository yet are created by GitHub.
    pub fn set_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        names: &[String],
    ) -> Result<Vec<GitHubLabel>> {
        let url = self.repo_url(owner, repo, &format!("/issues/{}/labels", number));
        let body = SetGitHubIssueLabels {
            labels: names.to_vec(),
        };
        debug!(%url, count = names.len(), "Replacing issue labels");

        let response = self
            .agent
            .put(&url)
            .header("Authorization", &self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send_json(&body)
            .map_err(GitHubError::Http)?;

        let mut response = self.check_response(response)?;
        let labels: Vec<GitHubLabel> = response.body_mut().read_json()?;
        Ok(labels)
    }

    /// Delete a label definition from the repository by name
    pub fn delete_label(&self, owner: &str, repo: &str, name: &str) -> Result<()> {
        let encoded_name = urlencoding::encode(name);
        let url = self.repo_url(owner, repo, &format!("/labels/{}", encoded_name));
        debug!(%url, "Deleting label definition");

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
