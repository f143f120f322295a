//! Prompt templates for posts and replies.

use herald_core::InboundItem;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static LEADING_HANDLES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s*@\w+)+\s*").expect("Valid handle regex"));

/// Strip the `@handle` prefix a platform puts in front of mention text.
///
/// Handles inside the text are kept.
///
/// # Examples
///
/// ```
/// use herald_agent::clean_mention_text;
///
/// assert_eq!(clean_mention_text("@herald @alice what about @bob?"), "what about @bob?");
/// ```
pub fn clean_mention_text(text: &str) -> String {
    LEADING_HANDLES.replace(text, "").trim().to_string()
}

/// `[style]` section: length limit and prompt templates.
///
/// Templates use `{topic}`, `{author}`, `{text}` and `{max_chars}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptStyle {
    /// Length the model is asked to stay under
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    /// Template for autonomous posts; must contain `{topic}`
    #[serde(default = "default_post_template")]
    pub post_template: String,
    /// Template for replies; must contain `{text}`
    #[serde(default = "default_reply_template")]
    pub reply_template: String,
}

fn default_max_chars() -> usize {
    280
}

fn default_post_template() -> String {
    "Write one social media post about: {topic}\n\
     Keep it under {max_chars} characters. No hashtags unless they add meaning. \
     Reply with the post text only."
        .to_string()
}

fn default_reply_template() -> String {
    "@{author} mentioned you and wrote: \"{text}\"\n\
     Write a helpful, friendly reply under {max_chars} characters. \
     Reply with the text only, without quoting the mention."
        .to_string()
}

impl Default for PromptStyle {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            post_template: default_post_template(),
            reply_template: default_reply_template(),
        }
    }
}

impl PromptStyle {
    /// Prompt for an autonomous post about `topic`.
    pub fn post_prompt(&self, topic: &str) -> String {
        self.post_template
            .replace("{max_chars}", &self.max_chars.to_string())
            .replace("{topic}", topic)
    }

    /// Prompt for a reply to `item`.
    pub fn reply_prompt(&self, item: &InboundItem) -> String {
        self.reply_template
            .replace("{max_chars}", &self.max_chars.to_string())
            .replace("{author}", item.author_username())
            .replace("{text}", &clean_mention_text(item.text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::InboundItemBuilder;

    #[test]
    fn test_clean_keeps_text_without_handles() {
        assert_eq!(clean_mention_text("  plain question  "), "plain question");
        assert_eq!(clean_mention_text("@herald"), "");
    }

    #[test]
    fn test_post_prompt_fills_placeholders() {
        let style = PromptStyle {
            max_chars: 100,
            post_template: "Topic: {topic} ({max_chars})".to_string(),
            ..PromptStyle::default()
        };
        assert_eq!(style.post_prompt("rust"), "Topic: rust (100)");
    }

    #[test]
    fn test_reply_prompt_uses_author_and_clean_text() {
        let item = InboundItemBuilder::default()
            .id("1")
            .text("@herald how do lifetimes work?")
            .author_id("2")
            .author_username("alice")
            .build()
            .expect("Valid item");
        let style = PromptStyle {
            reply_template: "{author}: {text}".to_string(),
            ..PromptStyle::default()
        };
        assert_eq!(style.reply_prompt(&item), "alice: how do lifetimes work?");
    }

    #[test]
    fn test_default_templates_have_required_placeholders() {
        let style = PromptStyle::default();
        assert!(style.post_template.contains("{topic}"));
        assert!(style.reply_template.contains("{text}"));
    }
}
