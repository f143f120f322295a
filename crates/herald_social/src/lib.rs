//! Social platform integrations for herald.
//!
//! Provides [`ContentPublisher`](herald_interface::ContentPublisher) and
//! [`MentionSource`](herald_interface::MentionSource) implementations:
//!
//! - [`XClient`] - X (Twitter) API v2, posting, replying and mention timelines
//! - [`DryRunPublisher`] - logs what would be posted, never touches the network
//!
//! Publishers fit text to the platform limit with [`fit_to_limit`] before sending.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dry_run;
mod settings;
mod text;
mod x;

pub use dry_run::DryRunPublisher;
pub use settings::SocialSettings;
pub use text::fit_to_limit;
pub use x::XClient;
