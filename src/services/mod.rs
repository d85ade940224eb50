pub mod auth;
pub mod avatar;
pub mod directory;
pub mod handle_registry;
pub mod mailer;
pub mod publisher;
pub mod registration;

pub use auth::{AuthClientError, HttpSessionVerifier, SessionVerifier};
pub use avatar::{AvatarError, NormalizedAvatar, AVATAR_WIDTH};
pub use directory::{DirectoryError, HttpWardenDirectory, WardenDirectory};
pub use handle_registry::{HandleLookup, HandleRegistry, HandleRegistryError};
pub use mailer::{HttpMailer, MailError, Mailer};
pub use publisher::{
    ChangeFile, ChangePublisher, ChangeSet, FileContent, GithubPublisher, PublishError,
    PullRequestRef, TrackingIssue,
};
pub use registration::{
    RegistrationError, RegistrationOutcome, RegistrationService, RegistrationWindow,
};
