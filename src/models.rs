//! Data types shared across the auth and routing modules.

use serde::{Deserialize, Serialize};

/// Profile returned alongside the token on login. The server does not
/// always include it, and when it does only `username` is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserProfile {
    /// Name to show in the UI, falling back to the login name
    pub fn display(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}
