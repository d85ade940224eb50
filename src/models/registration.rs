use serde::{Deserialize, Serialize};

/// Request payload for bot registration
///
/// String fields default to empty when absent so missing-field checks can
/// answer with their own status instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBotRequest {
    #[serde(default)]
    pub bot_name: String,
    /// Base64-encoded avatar image
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub description: String,
    /// Application text carried into the tracking issue
    #[serde(default)]
    pub submission: String,
}

/// Handle record added to the main repository by the change set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Cross-reference record linking a tracking issue back to owner and handle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub handle: String,
    pub owner: String,
    pub issue_id: u64,
    pub issue_url: String,
}

/// Response payload for a successful bot registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterBotResponse {
    pub message: String,
}
