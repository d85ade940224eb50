//! Arena - registration services for the competitive audit platform
//!
//! This library provides the bot-registration pipeline and the handle
//! registry lookups behind it.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::AppError;

pub use models::{
    ApplicationRecord, RegisterBotRequest, RegisterBotResponse, RegistrationRecord, WardenProfile,
    WardenRecord,
};

pub use services::{
    ChangePublisher, HandleRegistry, Mailer, RegistrationService, RegistrationWindow,
    SessionVerifier, WardenDirectory,
};

/// Application state shared across handlers
///
/// Service handles are constructed once by the process entry point and
/// injected here; the pipeline owns none of its collaborators.
pub struct AppState {
    pub config: Config,
    pub registry: Arc<HandleRegistry>,
    pub registration: Arc<RegistrationService>,
}
