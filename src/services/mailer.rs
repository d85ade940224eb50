use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

/// Errors that can occur while sending mail
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Mail API rejected the message with status {0}")]
    Rejected(u16),
}

/// Outbound confirmation email sender
///
/// Failures are the caller's to swallow: a registration is already
/// published by the time a confirmation is sent.
#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Mailer backed by an HTTP mail API
pub struct HttpMailer {
    client: reqwest::Client,
    url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(client: reqwest::Client, url: String, api_key: String, from: String) -> Self {
        Self {
            client,
            url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "text": body,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}
