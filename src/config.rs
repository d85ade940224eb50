use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory holding the per-handle JSON records
    pub handles_dir: PathBuf,
    /// Start of the bot registration window (inclusive)
    pub registration_start: DateTime<Utc>,
    /// End of the bot registration window (exclusive)
    pub registration_end: DateTime<Utc>,
    /// Token used for the change-host API
    pub github_token: String,
    /// Organization owning the platform repositories
    pub github_repo_owner: String,
    /// Repository receiving handle registration change sets
    pub github_repo: String,
    /// Base branch change sets are proposed against
    pub github_base_branch: String,
    /// Repository receiving bot application issues and cross-references
    pub applications_repo: String,
    /// Session verification endpoint
    pub auth_service_url: String,
    /// Warden profile lookup endpoint
    pub user_directory_url: String,
    /// API key for the warden profile lookup
    pub user_directory_key: String,
    /// Mail API endpoint for confirmation emails
    pub mail_api_url: String,
    /// API key for the mail API
    pub mail_api_key: String,
    /// Sender address for confirmation emails
    pub mail_from: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let handles_dir = env::var("HANDLES_DIR")
            .unwrap_or_else(|_| "./_data/handles".to_string())
            .into();

        let registration_start = parse_datetime("REGISTRATION_START")?;
        let registration_end = parse_datetime("REGISTRATION_END")?;

        let github_token =
            env::var("GITHUB_TOKEN").map_err(|_| ConfigError::MissingEnvVar("GITHUB_TOKEN"))?;

        let github_repo_owner = env::var("GITHUB_REPO_OWNER")
            .map_err(|_| ConfigError::MissingEnvVar("GITHUB_REPO_OWNER"))?;

        let github_repo =
            env::var("GITHUB_REPO").map_err(|_| ConfigError::MissingEnvVar("GITHUB_REPO"))?;

        let github_base_branch =
            env::var("GITHUB_BASE_BRANCH").unwrap_or_else(|_| "main".to_string());

        let applications_repo =
            env::var("APPLICATIONS_REPO").unwrap_or_else(|_| "bot-applications".to_string());

        let auth_service_url = env::var("AUTH_SERVICE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("AUTH_SERVICE_URL"))?;

        let user_directory_url = env::var("USER_DIRECTORY_URL")
            .map_err(|_| ConfigError::MissingEnvVar("USER_DIRECTORY_URL"))?;

        let user_directory_key = env::var("USER_DIRECTORY_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("USER_DIRECTORY_KEY"))?;

        let mail_api_url =
            env::var("MAIL_API_URL").map_err(|_| ConfigError::MissingEnvVar("MAIL_API_URL"))?;

        let mail_api_key =
            env::var("MAIL_API_KEY").map_err(|_| ConfigError::MissingEnvVar("MAIL_API_KEY"))?;

        let mail_from =
            env::var("MAIL_FROM").map_err(|_| ConfigError::MissingEnvVar("MAIL_FROM"))?;

        Ok(Self {
            host,
            port,
            handles_dir,
            registration_start,
            registration_end,
            github_token,
            github_repo_owner,
            github_repo,
            github_base_branch,
            applications_repo,
            auth_service_url,
            user_directory_url,
            user_directory_key,
            mail_api_url,
            mail_api_key,
            mail_from,
        })
    }
}

/// Parse a required RFC 3339 timestamp from the environment
fn parse_datetime(var: &'static str) -> Result<DateTime<Utc>, ConfigError> {
    let raw = env::var(var).map_err(|_| ConfigError::MissingEnvVar(var))?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ConfigError::InvalidValue(var))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
