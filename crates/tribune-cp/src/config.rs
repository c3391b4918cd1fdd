// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Search parameters.
//!
//! ```rust
//! use std::time::Duration;
//! use tribune_cp::config::{SearchConfig, ValueOrder};
//!
//! let config = SearchConfig::builder()
//!     .with_time_limit(Duration::from_secs(5))
//!     .with_seed(7)
//!     .with_value_order(ValueOrder::Shuffled)
//!     .build();
//! assert_eq!(config.seed(), 7);
//! ```

use std::time::Duration;

/// The default number of steps between two clock reads, minus one.
pub const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x3FFF;

/// The order in which the values of a branching variable are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueOrder {
    /// Smallest value first.
    #[default]
    Ascending,
    /// A permutation drawn from the seeded generator.
    Shuffled,
}

impl std::fmt::Display for ValueOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueOrder::Ascending => write!(f, "Ascending"),
            ValueOrder::Shuffled => write!(f, "Shuffled"),
        }
    }
}

/// Parameters of a single call to `CpModel::solve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    time_limit: Option<Duration>,
    clock_check_mask: u64,
    seed: u64,
    value_order: ValueOrder,
    log_interval: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            clock_check_mask: DEFAULT_CLOCK_CHECK_MASK,
            seed: 0,
            value_order: ValueOrder::Ascending,
            log_interval: None,
        }
    }
}

impl SearchConfig {
    /// Returns a builder starting from the defaults.
    #[inline]
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// The clock is read whenever `steps & clock_check_mask == 0`.
    #[inline]
    pub fn clock_check_mask(&self) -> u64 {
        self.clock_check_mask
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn value_order(&self) -> ValueOrder {
        self.value_order
    }

    /// Interval between two progress lines, or `None` for no progress log.
    #[inline]
    pub fn log_interval(&self) -> Option<Duration> {
        self.log_interval
    }
}

impl std::fmt::Display for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchConfig(time_limit: {:?}, seed: {}, value_order: {})",
            self.time_limit, self.seed, self.value_order
        )
    }
}

/// Builder for `SearchConfig`.
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.config.time_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_optional_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.config.time_limit = limit;
        self
    }

    #[inline]
    pub fn with_clock_check_mask(mut self, mask: u64) -> Self {
        self.config.clock_check_mask = mask;
        self
    }

    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    #[inline]
    pub fn with_value_order(mut self, order: ValueOrder) -> Self {
        self.config.value_order = order;
        self
    }

    #[inline]
    pub fn with_log_interval(mut self, interval: Duration) -> Self {
        self.config.log_interval = Some(interval);
        self
    }

    #[inline]
    pub fn build(self) -> SearchConfig {
        self.config
    }
}
