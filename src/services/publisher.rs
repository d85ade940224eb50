use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use mockall::automock;
use reqwest::{header, Method};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

const GITHUB_API: &str = "https://api.github.com";

/// Errors that can occur while publishing a submission
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Change host request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Malformed response from change host: {0}")]
    MalformedResponse(&'static str),
}

/// A single file carried by a proposed change set
#[derive(Debug, Clone)]
pub struct ChangeFile {
    pub path: String,
    pub content: FileContent,
}

#[derive(Debug, Clone)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

/// A named set of file additions proposed against the base branch
///
/// Never committed directly; always submitted for review.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    pub branch: String,
    pub title: String,
    pub commit_message: String,
    pub body: String,
    pub files: Vec<ChangeFile>,
}

/// Reference to a proposed change set
#[derive(Debug, Clone)]
pub struct PullRequestRef {
    pub number: u64,
    pub html_url: String,
}

/// Reference to a tracking entry in the issue tracker
#[derive(Debug, Clone)]
pub struct TrackingIssue {
    pub number: u64,
    pub html_url: String,
}

/// Version-control change proposal and application tracking
///
/// The three writes a registration performs (change-set proposal,
/// tracking-issue creation, cross-reference write) are sequential and not
/// transactional; a failure partway leaves partial external state.
#[automock]
#[async_trait]
pub trait ChangePublisher: Send + Sync {
    /// Propose a change set against the base branch of the main repository
    async fn propose_change_set(&self, change: ChangeSet) -> Result<PullRequestRef, PublishError>;

    /// Open a tracking issue in the applications repository
    async fn open_tracking_issue(
        &self,
        title: &str,
        body: &str,
    ) -> Result<TrackingIssue, PublishError>;

    /// Commit a single file to the applications repository's default branch
    async fn put_file(&self, path: &str, message: &str, content: &[u8])
        -> Result<(), PublishError>;
}

/// Change publisher backed by the GitHub REST API
pub struct GithubPublisher {
    client: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
    applications_repo: String,
    base_branch: String,
}

impl GithubPublisher {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            token: config.github_token.clone(),
            owner: config.github_repo_owner.clone(),
            repo: config.github_repo.clone(),
            applications_repo: config.applications_repo.clone(),
            base_branch: config.github_base_branch.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{GITHUB_API}{path}"))
            .bearer_auth(&self.token)
            .header(header::USER_AGENT, "arena-backend")
            .header(header::ACCEPT, "application/vnd.github+json")
    }

    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<Value, PublishError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or_default();
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Change host rejected the request")
                .to_string();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChangePublisher for GithubPublisher {
    async fn propose_change_set(&self, change: ChangeSet) -> Result<PullRequestRef, PublishError> {
        let owner = &self.owner;
        let repo = &self.repo;

        // Branch from the current head of the base branch
        let base_ref = self
            .execute(self.request(
                Method::GET,
                &format!("/repos/{owner}/{repo}/git/ref/heads/{}", self.base_branch),
            ))
            .await?;
        let base_sha = base_ref
            .pointer("/object/sha")
            .and_then(Value::as_str)
            .ok_or(PublishError::MalformedResponse("base ref has no sha"))?;

        self.execute(
            self.request(Method::POST, &format!("/repos/{owner}/{repo}/git/refs"))
                .json(&serde_json::json!({
                    "ref": format!("refs/heads/{}", change.branch),
                    "sha": base_sha,
                })),
        )
        .await?;

        for file in &change.files {
            let encoded = match &file.content {
                FileContent::Text(text) => STANDARD.encode(text.as_bytes()),
                FileContent::Binary(bytes) => STANDARD.encode(bytes),
            };
            self.execute(
                self.request(
                    Method::PUT,
                    &format!("/repos/{owner}/{repo}/contents/{}", file.path),
                )
                .json(&serde_json::json!({
                    "message": change.commit_message,
                    "content": encoded,
                    "branch": change.branch,
                })),
            )
            .await?;
        }

        let pr = self
            .execute(
                self.request(Method::POST, &format!("/repos/{owner}/{repo}/pulls")).json(
                    &serde_json::json!({
                        "title": change.title,
                        "body": change.body,
                        "head": change.branch,
                        "base": self.base_branch,
                    }),
                ),
            )
            .await?;

        Ok(PullRequestRef {
            number: pr
                .get("number")
                .and_then(Value::as_u64)
                .ok_or(PublishError::MalformedResponse("pull request has no number"))?,
            html_url: pr
                .get("html_url")
                .and_then(Value::as_str)
                .ok_or(PublishError::MalformedResponse("pull request has no url"))?
                .to_string(),
        })
    }

    async fn open_tracking_issue(
        &self,
        title: &str,
        body: &str,
    ) -> Result<TrackingIssue, PublishError> {
        let issue = self
            .execute(
                self.request(
                    Method::POST,
                    &format!("/repos/{}/{}/issues", self.owner, self.applications_repo),
                )
                .json(&serde_json::json!({
                    "title": title,
                    "body": body,
                })),
            )
            .await?;

        Ok(TrackingIssue {
            number: issue
                .get("number")
                .and_then(Value::as_u64)
                .ok_or(PublishError::MalformedResponse("issue has no number"))?,
            html_url: issue
                .get("html_url")
                .and_then(Value::as_str)
                .ok_or(PublishError::MalformedResponse("issue has no url"))?
                .to_string(),
        })
    }

    async fn put_file(
        &self,
        path: &str,
        message: &str,
        content: &[u8],
    ) -> Result<(), PublishError> {
        self.execute(
            self.request(
                Method::PUT,
                &format!(
                    "/repos/{}/{}/contents/{path}",
                    self.owner, self.applications_repo
                ),
            )
            .json(&serde_json::json!({
                "message": message,
                "content": STANDARD.encode(content),
            })),
        )
        .await?;

        Ok(())
    }
}
