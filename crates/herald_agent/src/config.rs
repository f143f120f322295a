//! Layered agent configuration.

use crate::PromptStyle;
use config::{Config, Environment, File, FileFormat};
use herald_core::WeightedOption;
use herald_error::{ConfigError, HeraldError, HeraldResult};
use herald_models::ModelSettings;
use herald_social::SocialSettings;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled defaults, the lowest configuration layer.
const DEFAULT_CONFIG: &str = include_str!("../../../herald.toml");

/// Prefix of environment overrides, e.g. `HERALD__AGENT__POLL_INTERVAL_SECS`.
const ENV_PREFIX: &str = "HERALD";

/// Complete agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Loop timings and switches
    #[serde(default)]
    pub agent: AgentSettings,
    /// Weighted topic table for autonomous posts
    #[serde(default)]
    pub topics: Vec<WeightedOption>,
    /// Prompt templates
    #[serde(default)]
    pub style: PromptStyle,
    /// Text generation provider
    #[serde(default)]
    pub model: ModelSettings,
    /// Social platform connection
    #[serde(default)]
    pub social: SocialSettings,
    /// Status API
    #[serde(default)]
    pub api: ApiSettings,
}

/// `[agent]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Pause after a successful posting cycle (seconds)
    #[serde(default = "default_post_interval_secs")]
    pub post_interval_secs: u64,
    /// Pause after a failed posting cycle (seconds)
    #[serde(default = "default_post_recovery_secs")]
    pub post_recovery_secs: u64,
    /// Pause after a completed poll cycle (seconds)
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Pause between replies within one poll cycle (milliseconds)
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    /// Mentions requested per fetch
    #[serde(default = "default_mention_page_size")]
    pub mention_page_size: usize,
    /// Run the autonomous posting loop
    #[serde(default = "default_enabled")]
    pub enable_posting: bool,
    /// Run the mention polling loop
    #[serde(default = "default_enabled")]
    pub enable_mentions: bool,
}

fn default_post_interval_secs() -> u64 {
    3600
}

fn default_post_recovery_secs() -> u64 {
    60
}

fn default_poll_interval_secs() -> u64 {
    1200
}

fn default_reply_delay_ms() -> u64 {
    1000
}

fn default_mention_page_size() -> usize {
    10
}

fn default_enabled() -> bool {
    true
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            post_interval_secs: default_post_interval_secs(),
            post_recovery_secs: default_post_recovery_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            reply_delay_ms: default_reply_delay_ms(),
            mention_page_size: default_mention_page_size(),
            enable_posting: default_enabled(),
            enable_mentions: default_enabled(),
        }
    }
}

impl AgentSettings {
    /// Pause after a successful posting cycle.
    pub fn post_interval(&self) -> Duration {
        Duration::from_secs(self.post_interval_secs)
    }

    /// Pause after a failed posting cycle.
    pub fn post_recovery(&self) -> Duration {
        Duration::from_secs(self.post_recovery_secs)
    }

    /// Pause after a completed poll cycle.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Pause between replies within one poll cycle.
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

/// `[api]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Address to serve `/health` and `/metrics` on; disabled when unset
    #[serde(default)]
    pub bind: Option<SocketAddr>,
}

fn config_error(context: &str, e: impl std::fmt::Display) -> HeraldError {
    HeraldError::from(ConfigError::new(format!("{}: {}", context, e)))
}

impl AgentConfig {
    /// Load configuration with precedence: environment > file > home dir > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (herald.toml shipped with the crate)
    /// 2. User config in home directory (~/.config/herald/herald.toml)
    /// 3. `path` if given (must exist), otherwise ./herald.toml if present
    /// 4. `HERALD__SECTION__KEY` environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source cannot be read or parsed.
    #[instrument]
    pub fn load(path: Option<&Path>) -> HeraldResult<Self> {
        debug!("Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/herald/herald.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("herald").required(false)),
        };

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))
    }

    /// Bundled defaults overlaid with a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the document cannot be parsed.
    pub fn from_toml(overrides: &str) -> HeraldResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(overrides, FileFormat::Toml))
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))
    }

    /// Check invariants the loops rely on.
    ///
    /// Returns non-fatal warnings on success.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty topic table, a zero weight,
    /// a zero interval, a page size outside 5..=100, or a template missing its
    /// required placeholder.
    pub fn validate(&self) -> HeraldResult<Vec<String>> {
        let mut warnings = Vec::new();

        if self.topics.is_empty() {
            return Err(ConfigError::new("[[topics]] table is empty").into());
        }
        if let Some(topic) = self.topics.iter().find(|topic| topic.weight == 0) {
            return Err(ConfigError::new(format!(
                "topic '{}' has weight 0; weights must be positive",
                topic.prompt
            ))
            .into());
        }
        if self.topics.iter().any(|topic| topic.prompt.trim().is_empty()) {
            warnings.push("a topic has an empty prompt".to_string());
        }

        let intervals = [
            ("agent.post_interval_secs", self.agent.post_interval_secs),
            ("agent.post_recovery_secs", self.agent.post_recovery_secs),
            ("agent.poll_interval_secs", self.agent.poll_interval_secs),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigError::new(format!("{} must be greater than 0", name)).into());
        }
        if self.agent.reply_delay_ms == 0 {
            warnings.push("agent.reply_delay_ms is 0; replies are sent in bursts".to_string());
        }

        if !(5..=100).contains(&self.agent.mention_page_size) {
            return Err(ConfigError::new(format!(
                "agent.mention_page_size must be between 5 and 100, got {}",
                self.agent.mention_page_size
            ))
            .into());
        }

        if !self.style.post_template.contains("{topic}") {
            return Err(ConfigError::new("style.post_template must contain {topic}").into());
        }
        if !self.style.reply_template.contains("{text}") {
            return Err(ConfigError::new("style.reply_template must contain {text}").into());
        }
        if self.style.max_chars == 0 {
            return Err(ConfigError::new("style.max_chars must be greater than 0").into());
        }
        if self.style.max_chars > self.social.max_chars {
            warnings.push(format!(
                "style.max_chars ({}) exceeds social.max_chars ({}); posts will be truncated",
                self.style.max_chars, self.social.max_chars
            ));
        }

        if self.agent.enable_mentions && self.social.user_id.is_none() {
            warnings.push(
                "agent.enable_mentions is set but social.user_id is missing; mention polling is disabled"
                    .to_string(),
            );
        }
        if !self.agent.enable_posting && !self.agent.enable_mentions {
            warnings.push("both loops are disabled; the agent will exit immediately".to_string());
        }

        Ok(warnings)
    }

    /// Whether the mention loop can run with this configuration.
    pub fn mentions_enabled(&self) -> bool {
        self.agent.enable_mentions && self.social.user_id.is_some()
    }
}
