use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

/// Errors that can occur while verifying a session
#[derive(Debug, Error)]
pub enum AuthClientError {
    #[error("Session verification request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// External session-verification check
///
/// Consulted after business-rule validation so a well-formed but
/// unauthenticated request receives a generic rejection.
#[automock]
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Returns true when the presented session token belongs to the user
    async fn verify(&self, username: &str, token: &str) -> Result<bool, AuthClientError>;
}

/// Session verifier backed by the platform authentication service
pub struct HttpSessionVerifier {
    client: reqwest::Client,
    url: String,
}

impl HttpSessionVerifier {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl SessionVerifier for HttpSessionVerifier {
    async fn verify(&self, username: &str, token: &str) -> Result<bool, AuthClientError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({
                "username": username,
                "sessionToken": token,
            }))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}
