//! Agent loops for an autonomous social-posting bot.
//!
//! Two independent loops run side by side under an [`AgentServer`]:
//! - **AutonomousPoster**: picks a weighted topic, generates a post, publishes it
//! - **MentionPoller**: fetches new mentions past a cursor, skips re-shares and
//!   already handled items, and hands the rest to a [`MentionHandler`]
//!
//! Both loops stop between cycles when their [`StopSignal`] fires. Collaborator
//! failures abandon the current cycle or item and are logged; they never end a
//! loop.
//!
//! # Example
//!
//! ```no_run
//! use herald_agent::{AgentConfig, AgentMetrics, AgentServer};
//! use herald_interface::MentionSource;
//! use herald_models::build_generator;
//! use herald_social::XClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AgentConfig::load(None)?;
//! config.validate()?;
//!
//! let generator = build_generator(&config.model)?;
//! let x = Arc::new(XClient::from_settings(&config.social)?);
//! let source: Arc<dyn MentionSource> = x.clone();
//! let server = AgentServer::from_config(
//!     &config,
//!     generator,
//!     x,
//!     Some(source),
//!     AgentMetrics::new(),
//! )?;
//!
//! let stop = server.stop_handle();
//! tokio::spawn(async move {
//!     let _ = tokio::signal::ctrl_c().await;
//!     stop.stop();
//! });
//! server.run().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod dedup;
mod metrics;
mod poller;
mod poster;
mod prompts;
mod reply;
mod selector;
mod server;
mod stop;

pub use api::{ApiState, create_router, serve_status_api};
pub use config::{AgentConfig, AgentSettings, ApiSettings};
pub use dedup::{DedupStore, DedupTracker};
pub use metrics::{AgentMetrics, MentionSnapshot, MetricsSnapshot, PostingSnapshot, ReplySnapshot};
pub use poller::{MentionHandler, MentionPoller};
pub use poster::{AutonomousPoster, PostOutcome};
pub use prompts::{PromptStyle, clean_mention_text};
pub use reply::ReplyHandler;
pub use selector::{RandomSource, RngSource, WeightedSelector, select_weighted};
pub use server::AgentServer;
pub use stop::{StopHandle, StopSignal};
