//! Weighted random topic selection.

use herald_core::WeightedOption;
use herald_error::{ConfigError, HeraldResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random draws.
pub trait RandomSource: Send {
    /// Draw a value uniformly from `[0, upper)`.
    fn draw(&mut self, upper: f64) -> f64;
}

/// [`RandomSource`] backed by a standard RNG.
#[derive(Debug, Clone)]
pub struct RngSource(StdRng);

impl RngSource {
    /// Seed from operating system entropy.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Reproducible source for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for RngSource {
    fn draw(&mut self, upper: f64) -> f64 {
        if upper <= 0.0 {
            return 0.0;
        }
        self.0.gen_range(0.0..upper)
    }
}

/// Locate the option whose weight bucket contains `r`.
///
/// Weights are subtracted from `r` in sequence order and the first option at
/// which the running value reaches zero or below wins. A value left over after
/// the last option (rounding drift) selects the last option. Returns `None` only
/// for an empty slice.
///
/// # Examples
///
/// ```
/// use herald_agent::select_weighted;
/// use herald_core::WeightedOption;
///
/// let options = vec![WeightedOption::new("p1", 4), WeightedOption::new("p2", 1)];
/// assert_eq!(select_weighted(&options, 0.0), Some("p1"));
/// assert_eq!(select_weighted(&options, 4.95), Some("p2"));
/// ```
pub fn select_weighted(options: &[WeightedOption], r: f64) -> Option<&str> {
    let mut remaining = r;
    for option in options {
        remaining -= f64::from(option.weight);
        if remaining <= 0.0 {
            return Some(option.prompt.as_str());
        }
    }
    options.last().map(|option| option.prompt.as_str())
}

/// Validated weighted topic table.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSelector {
    options: Vec<WeightedOption>,
    total: u64,
}

impl WeightedSelector {
    /// Build a selector over `options`, kept in the given order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the table is empty or any weight is zero.
    pub fn new(options: Vec<WeightedOption>) -> HeraldResult<Self> {
        if options.is_empty() {
            return Err(ConfigError::new("topic table is empty").into());
        }
        if let Some(zero) = options.iter().find(|option| option.weight == 0) {
            return Err(
                ConfigError::new(format!("topic '{}' has weight 0", zero.prompt)).into(),
            );
        }
        let total = options.iter().map(|option| u64::from(option.weight)).sum();
        Ok(Self { options, total })
    }

    /// Pick one prompt with probability proportional to its weight.
    pub fn select(&self, rng: &mut dyn RandomSource) -> &str {
        let r = rng.draw(self.total as f64);
        select_weighted(&self.options, r).unwrap_or_default()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// Options in selection order.
    pub fn options(&self) -> &[WeightedOption] {
        &self.options
    }
}
