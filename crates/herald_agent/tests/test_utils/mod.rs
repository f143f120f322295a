//! Mock collaborators shared by the agent tests.

#![allow(dead_code)]

use async_trait::async_trait;
use herald_agent::{MentionHandler, RandomSource};
use herald_core::{InboundItem, InboundItemBuilder, PublishedPost};
use herald_error::{
    FetchError, FetchErrorKind, GenerationError, GenerationErrorKind, HeraldResult, PublishError,
    PublishErrorKind,
};
use herald_interface::{ContentGenerator, ContentPublisher, MentionSource};
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use tokio::time::Instant;

/// Build an inbound item authored by `author`.
pub fn item(id: &str, author: &str, types: &[&str]) -> InboundItem {
    let mut builder = InboundItemBuilder::default();
    builder
        .id(id)
        .text(format!("@herald hello from {}", author))
        .author_id(format!("uid-{}", author))
        .author_username(author);
    for kind in types {
        builder.referenced_type(*kind);
    }
    builder.build().expect("Valid item")
}

/// Random source returning a fixed fraction of the requested range.
pub struct FixedSource(pub f64);

impl RandomSource for FixedSource {
    fn draw(&mut self, upper: f64) -> f64 {
        self.0 * upper
    }
}

/// Scripted generator; falls back to `default` once the script runs out.
pub struct MockGenerator {
    script: Mutex<VecDeque<Result<String, GenerationErrorKind>>>,
    default: Result<String, GenerationErrorKind>,
    prompts: Mutex<Vec<String>>,
    calls: Mutex<Vec<Instant>>,
}

impl MockGenerator {
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_sequence(Vec::new(), Ok(text.into()))
    }

    pub fn new_error(kind: GenerationErrorKind) -> Self {
        Self::new_sequence(Vec::new(), Err(kind))
    }

    pub fn new_sequence(
        script: Vec<Result<String, GenerationErrorKind>>,
        default: Result<String, GenerationErrorKind>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            default,
            prompts: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Instants of each call relative to `start`, in whole seconds.
    pub fn call_offsets(&self, start: Instant) -> Vec<u64> {
        self.calls
            .lock()
            .iter()
            .map(|at| at.duration_since(start).as_secs())
            .collect()
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate_text(&self, prompt: &str) -> HeraldResult<String> {
        self.prompts.lock().push(prompt.to_string());
        self.calls.lock().push(Instant::now());
        let next = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        next.map_err(|kind| GenerationError::new(kind).into())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Publisher recording `(text, in_reply_to)` pairs.
#[derive(Default)]
pub struct MockPublisher {
    published: Mutex<Vec<(String, Option<String>)>>,
    fail: bool,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<(String, Option<String>)> {
        self.published.lock().clone()
    }

    fn record(&self, text: &str, reply_to: Option<&str>) -> HeraldResult<PublishedPost> {
        if self.fail {
            return Err(PublishError::new(PublishErrorKind::Api {
                status: 403,
                message: "forbidden".to_string(),
            })
            .into());
        }
        let mut published = self.published.lock();
        published.push((text.to_string(), reply_to.map(str::to_string)));
        Ok(PublishedPost::new(format!("post-{}", published.len())))
    }
}

#[async_trait]
impl ContentPublisher for MockPublisher {
    async fn publish_content(&self, text: &str) -> HeraldResult<PublishedPost> {
        self.record(text, None)
    }

    async fn publish_reply(&self, text: &str, in_reply_to_id: &str) -> HeraldResult<PublishedPost> {
        self.record(text, Some(in_reply_to_id))
    }

    fn platform_name(&self) -> &str {
        "mock"
    }
}

/// Mention source serving scripted pages; empty once the script runs out.
#[derive(Default)]
pub struct MockSource {
    pages: Mutex<VecDeque<Result<Vec<InboundItem>, FetchErrorKind>>>,
    cursors: Mutex<Vec<Option<String>>>,
}

impl MockSource {
    pub fn new(pages: Vec<Result<Vec<InboundItem>, FetchErrorKind>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            cursors: Mutex::new(Vec::new()),
        }
    }

    /// Cursor passed to each fetch.
    pub fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().clone()
    }
}

#[async_trait]
impl MentionSource for MockSource {
    async fn fetch_mentions_since(
        &self,
        cursor: Option<&str>,
        _page_size: usize,
    ) -> HeraldResult<Vec<InboundItem>> {
        self.cursors.lock().push(cursor.map(str::to_string));
        let page = self.pages.lock().pop_front().unwrap_or(Ok(Vec::new()));
        page.map_err(|kind| FetchError::new(kind).into())
    }
}

/// Handler recording item ids and when they were handled.
#[derive(Default)]
pub struct RecordingHandler {
    handled: Mutex<Vec<(String, Instant)>>,
    fail_ids: HashSet<String>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(ids: &[&str]) -> Self {
        Self {
            handled: Mutex::new(Vec::new()),
            fail_ids: ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    pub fn handled_ids(&self) -> Vec<String> {
        self.handled.lock().iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn handled_at(&self) -> Vec<Instant> {
        self.handled.lock().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl MentionHandler for RecordingHandler {
    async fn handle(&self, item: &InboundItem) -> HeraldResult<()> {
        self.handled
            .lock()
            .push((item.id().to_string(), Instant::now()));
        if self.fail_ids.contains(item.id()) {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into());
        }
        Ok(())
    }
}

/// Handler that panics, taking its loop down with it.
pub struct PanickingHandler;

#[async_trait]
impl MentionHandler for PanickingHandler {
    async fn handle(&self, _item: &InboundItem) -> HeraldResult<()> {
        panic!("handler exploded");
    }
}
