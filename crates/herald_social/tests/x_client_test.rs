//! X API v2 client against a mock server.

use herald_error::{FetchErrorKind, HeraldErrorKind, PublishErrorKind};
use herald_interface::{ContentPublisher, MentionSource};
use herald_social::XClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> XClient {
    XClient::new("user_token", server.uri()).with_user_id("99")
}

#[tokio::test]
async fn test_publish_content_posts_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tweets"))
        .and(header("Authorization", "Bearer user_token"))
        .and(body_json(json!({"text": "hello world"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": "1850000000000000001", "text": "hello world"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let post = client(&server)
        .publish_content("  hello world \n")
        .await
        .expect("Post succeeds");

    assert_eq!(post.id, "1850000000000000001");
}

#[tokio::test]
async fn test_publish_reply_addresses_item() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tweets"))
        .and(body_json(json!({
            "text": "thanks!",
            "reply": {"in_reply_to_tweet_id": "1849"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": "1851", "text": "thanks!"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let post = client(&server)
        .publish_reply("thanks!", "1849")
        .await
        .expect("Reply succeeds");

    assert_eq!(post.id, "1851");
}

#[tokio::test]
async fn test_long_post_is_fitted_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tweets"))
        .and(body_json(json!({"text": "aaaa bbbb…"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": "7", "text": "aaaa bbbb…"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let post = client(&server)
        .with_max_chars(12)
        .publish_content("aaaa bbbb cccc dddd")
        .await
        .expect("Fitted post succeeds");

    assert_eq!(post.id, "7");
}

#[tokio::test]
async fn test_publish_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tweets"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client(&server).publish_content("hi").await.unwrap_err();
    match err.kind() {
        HeraldErrorKind::Publish(e) => assert_eq!(e.kind, PublishErrorKind::RateLimited),
        other => panic!("Expected publish error, got {}", other),
    }
}

#[tokio::test]
async fn test_errors_array_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tweets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"detail": "You are not allowed to create a Tweet with duplicate content."}]
        })))
        .mount(&server)
        .await;

    let err = client(&server).publish_content("again").await.unwrap_err();
    match err.kind() {
        HeraldErrorKind::Publish(e) => match &e.kind {
            PublishErrorKind::Rejected(reason) => assert!(reason.contains("duplicate content")),
            other => panic!("Expected rejection, got {}", other),
        },
        other => panic!("Expected publish error, got {}", other),
    }
}

#[tokio::test]
async fn test_fetch_mentions_since_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/99/mentions"))
        .and(query_param("since_id", "1000"))
        .and(query_param("max_results", "10"))
        .and(query_param("expansions", "author_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "1003", "text": "@herald third", "author_id": "3"},
                {"id": "1002", "text": "RT @herald second", "author_id": "2",
                 "referenced_tweets": [{"type": "retweeted", "id": "900"}]},
                {"id": "1001", "text": "@herald first", "author_id": "1"}
            ],
            "includes": {"users": [
                {"id": "1", "username": "ann", "name": "Ann"},
                {"id": "2", "username": "ben", "name": "Ben"},
                {"id": "3", "username": "cat", "name": "Cat"}
            ]},
            "meta": {"result_count": 3, "newest_id": "1003", "oldest_id": "1001"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server)
        .fetch_mentions_since(Some("1000"), 10)
        .await
        .expect("Fetch succeeds");

    let ids: Vec<&str> = items.iter().map(|item| item.id().as_str()).collect();
    assert_eq!(ids, vec!["1001", "1002", "1003"]);
    assert_eq!(items[0].author_username(), "ann");
    assert!(items[1].is_reshare());
    assert!(!items[2].is_reshare());
}

#[tokio::test]
async fn test_page_size_is_clamped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/99/mentions"))
        .and(query_param("max_results", "5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"meta": {"result_count": 0}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server)
        .fetch_mentions_since(None, 1)
        .await
        .expect("Fetch succeeds");
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_fetch_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/99/mentions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("over capacity"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_mentions_since(None, 10)
        .await
        .unwrap_err();
    match err.kind() {
        HeraldErrorKind::Fetch(e) => {
            assert!(matches!(e.kind, FetchErrorKind::Api { status: 503, .. }))
        }
        other => panic!("Expected fetch error, got {}", other),
    }
}

#[tokio::test]
async fn test_fetch_without_user_id_is_missing_credentials() {
    let err = XClient::new("user_token", "http://127.0.0.1:9")
        .fetch_mentions_since(None, 10)
        .await
        .unwrap_err();
    match err.kind() {
        HeraldErrorKind::Fetch(e) => {
            assert!(matches!(e.kind, FetchErrorKind::MissingCredentials(_)))
        }
        other => panic!("Expected fetch error, got {}", other),
    }
}
