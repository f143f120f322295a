//! LLM provider integrations for herald.
//!
//! Each client implements [`ContentGenerator`](herald_interface::ContentGenerator)
//! for a single-prompt, single-answer exchange.
//!
//! # Available Providers
//!
//! - **OpenAI** and any OpenAI-compatible chat completions endpoint
//! - **Anthropic** messages API
//!
//! # Example
//!
//! ```no_run
//! use herald_interface::ContentGenerator;
//! use herald_models::{ModelProvider, ModelSettings, build_generator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ModelSettings {
//!     provider: ModelProvider::OpenAi,
//!     model: "gpt-4o-mini".to_string(),
//!     ..ModelSettings::default()
//! };
//! let generator = build_generator(&settings)?;
//! let text = generator.generate_text("Say hello in five words").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anthropic;
mod openai;
mod retry;
mod settings;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;
pub use retry::RetryPolicy;
pub use settings::{ModelProvider, ModelSettings, build_generator};
