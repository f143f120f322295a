//! `[social]` configuration section.

use serde::{Deserialize, Serialize};

/// Platform connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSettings {
    /// X API v2 base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Numeric id of the agent's own account, required for mention polling
    #[serde(default)]
    pub user_id: Option<String>,
    /// Environment variable holding the user-context access token
    #[serde(default = "default_bearer_token_env")]
    pub bearer_token_env: String,
    /// Platform post length limit in characters
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_base_url() -> String {
    "https://api.x.com/2".to_string()
}

fn default_bearer_token_env() -> String {
    "X_ACCESS_TOKEN".to_string()
}

fn default_max_chars() -> usize {
    280
}

impl Default for SocialSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: None,
            bearer_token_env: default_bearer_token_env(),
            max_chars: default_max_chars(),
        }
    }
}
