use async_trait::async_trait;
use mockall::automock;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::WardenProfile;

/// Errors that can occur while resolving a warden profile
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Profile lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Profile lookup rejected with status {0}")]
    Rejected(u16),
}

/// Lookup of warden profile fields in the platform user database
#[automock]
#[async_trait]
pub trait WardenDirectory: Send + Sync {
    /// Resolve the profile for a username; None when no such user exists
    async fn profile(&self, username: &str) -> Result<Option<WardenProfile>, DirectoryError>;
}

/// Warden directory backed by the user-database HTTP API
pub struct HttpWardenDirectory {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpWardenDirectory {
    pub fn new(client: reqwest::Client, url: String, api_key: String) -> Self {
        Self {
            client,
            url,
            api_key,
        }
    }
}

#[async_trait]
impl WardenDirectory for HttpWardenDirectory {
    async fn profile(&self, username: &str) -> Result<Option<WardenProfile>, DirectoryError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("username", username)])
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DirectoryError::Rejected(response.status().as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        Ok(Some(WardenProfile {
            github_username: body
                .get("gitHubUsername")
                .and_then(|v| v.as_str())
                .map(str::to_owned),
            email: body.get("email").and_then(|v| v.as_str()).map(str::to_owned),
        }))
    }
}
