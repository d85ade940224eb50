use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{ApplicationRecord, RegisterBotRequest, RegistrationRecord, WardenProfile};
use crate::services::auth::{AuthClientError, SessionVerifier};
use crate::services::avatar::{self, AvatarError, NormalizedAvatar};
use crate::services::directory::WardenDirectory;
use crate::services::handle_registry::{HandleLookup, HandleRegistry, HandleRegistryError};
use crate::services::mailer::Mailer;
use crate::services::publisher::{
    ChangeFile, ChangePublisher, ChangeSet, FileContent, PublishError, PullRequestRef,
    TrackingIssue,
};

/// Maximum length of a bot handle
pub const MAX_HANDLE_LENGTH: usize = 25;

/// Errors that can occur during bot registration
///
/// Display strings double as the user-facing response messages.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Bot applications are only accepted within the bot registration window.")]
    WindowClosed,
    #[error("Bot name is required.")]
    MissingBotName,
    #[error("Bot name's length is limited to {MAX_HANDLE_LENGTH} characters.")]
    NameTooLong,
    #[error("Bot must have an owner.")]
    MissingOwner,
    #[error(
        "Bot name can only use alphanumeric characters [a-zA-Z0-9], underscores (_), and hyphens (-)."
    )]
    InvalidNameCharacters,
    #[error("{0} is already a registered handle")]
    NameTaken(String),
    #[error("You can only register a bot to your user account or your team's account.")]
    NotOwner,
    #[error("Unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Avatar(#[from] AvatarError),
    #[error(transparent)]
    Registry(#[from] HandleRegistryError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error(transparent)]
    Auth(#[from] AuthClientError),
    #[error("Failed to encode registration record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The submission window, `[start, end)`
#[derive(Debug, Clone, Copy)]
pub struct RegistrationWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RegistrationWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

/// Result of a published registration
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub pull_request: PullRequestRef,
    pub issue: TrackingIssue,
}

/// True when the handle uses only the allowed character set
pub fn is_valid_handle(handle: &str) -> bool {
    handle
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// The bot-registration pipeline
///
/// A strictly linear chain of gates: window, input validation, ownership,
/// session authentication, avatar normalization, publication, notification.
/// Every step completes before the next begins; there are no retries and
/// no coordination between concurrent submissions for the same name.
pub struct RegistrationService {
    registry: Arc<HandleRegistry>,
    verifier: Arc<dyn SessionVerifier>,
    publisher: Arc<dyn ChangePublisher>,
    directory: Arc<dyn WardenDirectory>,
    mailer: Arc<dyn Mailer>,
    window: RegistrationWindow,
}

impl RegistrationService {
    pub fn new(
        registry: Arc<HandleRegistry>,
        verifier: Arc<dyn SessionVerifier>,
        publisher: Arc<dyn ChangePublisher>,
        directory: Arc<dyn WardenDirectory>,
        mailer: Arc<dyn Mailer>,
        window: RegistrationWindow,
    ) -> Self {
        Self {
            registry,
            verifier,
            publisher,
            directory,
            mailer,
            window,
        }
    }

    /// Validate and publish a bot registration
    pub async fn register(
        &self,
        request: RegisterBotRequest,
        username: &str,
        session_token: &str,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        if !self.window.contains(now) {
            return Err(RegistrationError::WindowClosed);
        }

        let bot_name = request.bot_name.trim();
        if bot_name.is_empty() {
            return Err(RegistrationError::MissingBotName);
        }
        if bot_name.len() > MAX_HANDLE_LENGTH {
            return Err(RegistrationError::NameTooLong);
        }
        if request.owner.is_empty() {
            return Err(RegistrationError::MissingOwner);
        }
        if !is_valid_handle(bot_name) {
            return Err(RegistrationError::InvalidNameCharacters);
        }

        match self.registry.lookup(bot_name).await? {
            HandleLookup::Found(_) => {
                return Err(RegistrationError::NameTaken(bot_name.to_string()));
            }
            HandleLookup::NotFound => {}
        }

        // A team account may register a bot on the team's behalf
        if request.owner != username {
            let teams = self.registry.teams_for(username).await?;
            if !teams.iter().any(|team| team.handle == request.owner) {
                return Err(RegistrationError::NotOwner);
            }
        }

        if !self.verifier.verify(username, session_token).await? {
            return Err(RegistrationError::Unauthorized);
        }

        let normalized = match request.image.as_deref() {
            Some(encoded) => Some(avatar::normalize(bot_name, encoded)?),
            None => None,
        };

        // Profile resolution is best-effort: a missing or unreachable
        // profile only costs the PR mention and the confirmation email.
        let profile = match self.directory.profile(username).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                info!(username, "no directory profile for submitter");
                WardenProfile::default()
            }
            Err(e) => {
                warn!(username, error = %e, "warden profile lookup failed");
                WardenProfile::default()
            }
        };

        let pull_request = self
            .publisher
            .propose_change_set(build_change_set(
                bot_name,
                username,
                &request.description,
                normalized.as_ref(),
                profile.github_username.as_deref(),
            )?)
            .await?;
        info!(bot_name, number = pull_request.number, "change set proposed");

        let issue = self
            .publisher
            .open_tracking_issue(&format!("{bot_name} Bot Application"), &request.submission)
            .await?;

        let cross_reference = ApplicationRecord {
            handle: bot_name.to_string(),
            owner: request.owner.clone(),
            issue_id: issue.number,
            issue_url: issue.html_url.clone(),
        };
        self.publisher
            .put_file(
                &format!("data/{bot_name}-{}.json", issue.number),
                &format!("{bot_name} issue #{}", issue.number),
                &serde_json::to_vec_pretty(&cross_reference)?,
            )
            .await?;

        self.send_confirmation(bot_name, &profile, &pull_request)
            .await;

        Ok(RegistrationOutcome {
            pull_request,
            issue,
        })
    }

    /// Send the confirmation email when an address is known; never fatal
    async fn send_confirmation(
        &self,
        bot_name: &str,
        profile: &WardenProfile,
        pull_request: &PullRequestRef,
    ) {
        let Some(email) = profile.email.as_deref() else {
            return;
        };

        let subject = format!("Application to register bot \"{bot_name}\" has been submitted");
        let body = format!(
            "Your application to register a new bot ({bot_name}) has been received.\n\n\
             You can see the PR here: {}",
            pull_request.html_url
        );

        if let Err(e) = self.mailer.send(email, &subject, &body).await {
            warn!(bot_name, error = %e, "confirmation email failed");
        }
    }
}

fn build_change_set(
    bot_name: &str,
    username: &str,
    description: &str,
    avatar: Option<&NormalizedAvatar>,
    github_username: Option<&str>,
) -> Result<ChangeSet, RegistrationError> {
    let record = RegistrationRecord {
        handle: bot_name.to_string(),
        image: avatar.map(NormalizedAvatar::record_path),
    };

    let mut files = vec![ChangeFile {
        path: format!("_data/handles/{bot_name}.json"),
        content: FileContent::Text(serde_json::to_string_pretty(&record)?),
    }];
    if let Some(avatar) = avatar {
        files.push(ChangeFile {
            path: format!("_data/handles/avatars/{}", avatar.filename),
            content: FileContent::Binary(avatar.bytes.clone()),
        });
    }

    let title = format!("Register bot {bot_name}");
    let mut body = format!(
        "Registration for bot {bot_name} submitted by {username}.\n\nDescription:\n{description}\n"
    );
    if let Some(github_username) = github_username {
        body.push_str(&format!("\n@{github_username}\n"));
    }

    Ok(ChangeSet {
        branch: format!("bot/{bot_name}"),
        commit_message: title.clone(),
        title,
        body,
        files,
    })
}
