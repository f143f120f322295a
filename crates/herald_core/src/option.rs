//! Weighted topic options.

use serde::{Deserialize, Serialize};

/// A prompt paired with its relative selection weight.
///
/// # Examples
///
/// ```
/// use herald_core::WeightedOption;
///
/// let option = WeightedOption::new("Share a tip about Rust lifetimes", 4);
/// assert_eq!(option.weight, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedOption {
    /// Topic prompt handed to the content template
    pub prompt: String,
    /// Relative weight; must be greater than zero
    pub weight: u32,
}

impl WeightedOption {
    /// Create a new weighted option.
    pub fn new(prompt: impl Into<String>, weight: u32) -> Self {
        Self {
            prompt: prompt.into(),
            weight,
        }
    }
}
