use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::app::{AutopilotError, Result};
use crate::config::DeployConfig;

/// Whether `upsert_file` created a new file or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoStatus {
    Exists,
    Created(String),
}

/// Minimal client for the GitHub REST contents API.
pub struct GithubClient {
    client: Client,
    api_base: Url,
    token: String,
}

impl GithubClient {
    pub fn new(config: &DeployConfig, token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AutopilotError::MissingInput(
                "GitHub token missing (--token or GITHUB_TOKEN)".into(),
            ));
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            api_base: Url::parse(&config.api_base)?,
            token: token.to_string(),
        })
    }

    /// `{api_base}/{segments...}` with every segment percent-encoded.
    pub fn endpoint<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| AutopilotError::Config(format!("invalid API base: {}", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Contents API address for a forward-slash relative path.
    pub fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url> {
        let segments = ["repos", owner, repo, "contents"]
            .into_iter()
            .chain(path.split('/').filter(|s| !s.is_empty()));
        self.endpoint(segments)
    }

    async fn request(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value> {
        debug!(%method, %url, "GitHub request");
        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AutopilotError::Github {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    /// Make sure `owner/repo` exists, creating a private repository for the
    /// authenticated user when allowed.
    pub async fn ensure_repo(&self, owner: &str, repo: &str, create: bool) -> Result<RepoStatus> {
        let url = self.endpoint(["repos", owner, repo])?;
        match self.request(Method::GET, url, None).await {
            Ok(_) => return Ok(RepoStatus::Exists),
            Err(e) if create && e.status() == Some(404) => {}
            Err(e) => return Err(e),
        }

        let body = json!({ "name": repo, "private": true, "auto_init": false });
        let created = self
            .request(Method::POST, self.endpoint(["user", "repos"])?, Some(&body))
            .await?;
        let full_name = created
            .get("full_name")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("{}/{}", owner, repo));
        Ok(RepoStatus::Created(full_name))
    }

    /// Blob sha of `path` on `branch`, or `None` when the file is absent.
    pub async fn file_sha(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Option<String>> {
        let mut url = self.contents_url(owner, repo, path)?;
        url.query_pairs_mut().append_pair("ref", branch);

        match self.request(Method::GET, url, None).await {
            Ok(json) => Ok(json.get("sha").and_then(Value::as_str).map(String::from)),
            Err(e) if e.status() == Some(404) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn upsert_file(
        &self,
        target: &Target<'_>,
        path: &str,
        content_b64: &str,
        message: &str,
    ) -> Result<Upsert> {
        let sha = self
            .file_sha(target.owner, target.repo, target.branch, path)
            .await?;

        let mut body = json!({
            "message": message,
            "content": content_b64,
            "branch": target.branch,
        });
        if let Some(sha) = &sha {
            body["sha"] = Value::String(sha.clone());
        }

        let url = self.contents_url(target.owner, target.repo, path)?;
        self.request(Method::PUT, url, Some(&body)).await?;

        Ok(if sha.is_some() {
            Upsert::Updated
        } else {
            Upsert::Created
        })
    }
}

/// Destination of an upload.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub branch: &'a str,
}

/// Message for a failed response: the JSON `message`, else the raw body,
/// else the status code.
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(Value::as_str).map(String::from))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body.to_string()
            }
        })
}
