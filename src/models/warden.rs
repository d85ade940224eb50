use serde::{Deserialize, Serialize};

/// Per-handle record persisted in the handles directory
///
/// The canonical source of truth for name collision checks. A record with
/// a non-empty members list denotes a team account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenRecord {
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

impl WardenRecord {
    pub fn is_team(&self) -> bool {
        self.members.as_ref().is_some_and(|m| !m.is_empty())
    }

    pub fn has_member(&self, handle: &str) -> bool {
        self.members
            .as_ref()
            .is_some_and(|m| m.iter().any(|member| member == handle))
    }
}

/// Profile fields resolved from the user directory
#[derive(Debug, Clone, Default)]
pub struct WardenProfile {
    pub github_username: Option<String>,
    pub email: Option<String>,
}
