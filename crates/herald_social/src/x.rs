//! X (Twitter) API v2 client.

use crate::{SocialSettings, fit_to_limit};
use async_trait::async_trait;
use herald_core::{InboundItem, InboundItemBuilder, PublishedPost, compare_item_ids};
use herald_error::{FetchError, FetchErrorKind, HeraldResult, PublishError, PublishErrorKind};
use herald_interface::{ContentPublisher, MentionSource};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

const MIN_PAGE_SIZE: usize = 5;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<ReplySettings<'a>>,
}

#[derive(Debug, Serialize)]
struct ReplySettings<'a> {
    in_reply_to_tweet_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    #[serde(default)]
    data: Option<CreatedTweet>,
    #[serde(default)]
    errors: Vec<ApiProblem>,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiProblem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiProblem {
    fn describe(&self) -> String {
        self.detail
            .as_ref()
            .or(self.message.as_ref())
            .or(self.title.as_ref())
            .cloned()
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct MentionsResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    #[serde(default)]
    includes: Option<Includes>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: String,
    text: String,
    #[serde(default)]
    author_id: Option<String>,
    #[serde(default)]
    referenced_tweets: Vec<ReferencedTweet>,
}

#[derive(Debug, Deserialize)]
struct ReferencedTweet {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    username: String,
}

/// Client for the X API v2 with a user-context access token.
///
/// Posts and replies go to `POST /tweets`; mentions come from
/// `GET /users/{id}/mentions` and are returned oldest-first.
#[derive(Debug, Clone)]
pub struct XClient {
    client: Client,
    base_url: String,
    access_token: String,
    user_id: Option<String>,
    max_chars: usize,
}

impl XClient {
    /// Create a client against `base_url` (e.g. `https://api.x.com/2`).
    pub fn new(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            user_id: None,
            max_chars: 280,
        }
    }

    /// Build a client from the `[social]` section, reading the token from the environment.
    ///
    /// # Errors
    ///
    /// Returns a publish error if the token variable is unset or empty.
    pub fn from_settings(settings: &SocialSettings) -> HeraldResult<Self> {
        let token = std::env::var(&settings.bearer_token_env)
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                PublishError::new(PublishErrorKind::MissingCredentials(
                    settings.bearer_token_env.clone(),
                ))
            })?;

        let mut client =
            Self::new(token, settings.base_url.clone()).with_max_chars(settings.max_chars);
        if let Some(user_id) = &settings.user_id {
            client = client.with_user_id(user_id.clone());
        }
        Ok(client)
    }

    /// Account whose mentions are fetched.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Post length limit applied before sending.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    #[instrument(skip(self, text), fields(reply_to = ?in_reply_to_id))]
    async fn create_tweet(
        &self,
        text: &str,
        in_reply_to_id: Option<&str>,
    ) -> Result<PublishedPost, PublishError> {
        let text = fit_to_limit(text, self.max_chars);
        let body = CreateTweetRequest {
            text: &text,
            reply: in_reply_to_id.map(|id| ReplySettings {
                in_reply_to_tweet_id: id,
            }),
        };

        let response = self
            .client
            .post(format!("{}/tweets", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send post request");
                PublishError::new(PublishErrorKind::Http(e.to_string()))
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PublishError::new(PublishErrorKind::RateLimited));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, body = %message, "Post request returned error");
            return Err(PublishError::new(PublishErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let parsed: CreateTweetResponse = response
            .json()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Parse(e.to_string())))?;

        match parsed.data {
            Some(created) => {
                info!(post_id = %created.id, "Published");
                Ok(PublishedPost::new(created.id))
            }
            None => {
                let reason = parsed
                    .errors
                    .iter()
                    .map(ApiProblem::describe)
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(PublishError::new(PublishErrorKind::Rejected(reason)))
            }
        }
    }
}

/// Assemble inbound items from a mentions page, oldest first.
fn into_items(response: MentionsResponse) -> Result<Vec<InboundItem>, FetchError> {
    let usernames: HashMap<String, String> = response
        .includes
        .map(|includes| {
            includes
                .users
                .into_iter()
                .map(|user| (user.id, user.username))
                .collect()
        })
        .unwrap_or_default();

    let mut items = response
        .data
        .into_iter()
        .map(|tweet| {
            let author_id = tweet.author_id.unwrap_or_default();
            let author_username = usernames.get(&author_id).cloned().unwrap_or_default();
            let mut builder = InboundItemBuilder::default();
            builder
                .id(tweet.id)
                .text(tweet.text)
                .author_id(author_id)
                .author_username(author_username);
            for reference in tweet.referenced_tweets {
                builder.referenced_type(reference.kind);
            }
            builder
                .build()
                .map_err(|e| FetchError::new(FetchErrorKind::Parse(e.to_string())))
        })
        .collect::<Result<Vec<_>, _>>()?;

    items.sort_by(|a, b| compare_item_ids(a.id(), b.id()));
    Ok(items)
}

#[async_trait]
impl ContentPublisher for XClient {
    async fn publish_content(&self, text: &str) -> HeraldResult<PublishedPost> {
        Ok(self.create_tweet(text, None).await?)
    }

    async fn publish_reply(&self, text: &str, in_reply_to_id: &str) -> HeraldResult<PublishedPost> {
        Ok(self.create_tweet(text, Some(in_reply_to_id)).await?)
    }

    fn platform_name(&self) -> &str {
        "x"
    }
}

#[async_trait]
impl MentionSource for XClient {
    #[instrument(skip(self), fields(user_id = ?self.user_id))]
    async fn fetch_mentions_since(
        &self,
        cursor: Option<&str>,
        page_size: usize,
    ) -> HeraldResult<Vec<InboundItem>> {
        let user_id = self.user_id.as_deref().ok_or_else(|| {
            FetchError::new(FetchErrorKind::MissingCredentials("social.user_id".to_string()))
        })?;

        let max_results = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE).to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("max_results", max_results.as_str()),
            ("tweet.fields", "author_id,referenced_tweets"),
            ("expansions", "author_id"),
            ("user.fields", "username"),
        ];
        if let Some(since_id) = cursor {
            query.push(("since_id", since_id));
        }

        let response = self
            .client
            .get(format!("{}/users/{}/mentions", self.base_url, user_id))
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetchError::new(FetchErrorKind::Http(e.to_string())))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::new(FetchErrorKind::RateLimited).into());
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::new(FetchErrorKind::Api {
                status: status.as_u16(),
                message,
            })
            .into());
        }

        let parsed: MentionsResponse = response
            .json()
            .await
            .map_err(|e| FetchError::new(FetchErrorKind::Parse(e.to_string())))?;

        let items = into_items(parsed)?;
        debug!(count = items.len(), "Fetched mentions");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_are_sorted_oldest_first_with_usernames() {
        let response: MentionsResponse = serde_json::from_value(serde_json::json!({
            "data": [
                {"id": "1900", "text": "newer", "author_id": "7"},
                {"id": "850", "text": "older", "author_id": "8",
                 "referenced_tweets": [{"type": "quoted", "id": "5"}]}
            ],
            "includes": {"users": [
                {"id": "7", "username": "alice", "name": "Alice"},
                {"id": "8", "username": "bob", "name": "Bob"}
            ]}
        }))
        .expect("Valid payload");

        let items = into_items(response).expect("Items build");
        assert_eq!(items[0].id(), "850");
        assert_eq!(items[0].author_username(), "bob");
        assert!(items[0].referenced_types().contains("quoted"));
        assert_eq!(items[1].id(), "1900");
        assert_eq!(items[1].author_username(), "alice");
    }

    #[test]
    fn test_empty_page_has_no_items() {
        let response: MentionsResponse =
            serde_json::from_value(serde_json::json!({"meta": {"result_count": 0}}))
                .expect("Valid payload");
        assert!(into_items(response).expect("Items build").is_empty());
    }
}
