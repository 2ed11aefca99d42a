//! Search configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Order in which the candidates of a slot are tried.
///
/// Both orders are deterministic, so identical inputs always produce the
/// same sequence of reported solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueOrder {
    /// Roster declaration order.
    #[default]
    Declaration,

    /// Fewest duties so far first; ties in declaration order.
    ///
    /// Tends to reach a low-spread incumbent much sooner on large rosters.
    LeastLoaded,
}

/// Configuration for the duty search.
///
/// # Examples
///
/// ```
/// use u_duty::search::{SearchConfig, ValueOrder};
///
/// let config = SearchConfig::default()
///     .with_solution_limit(10)
///     .with_enumerate_ties(true)
///     .with_value_order(ValueOrder::LeastLoaded);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Stop after this many reported solutions. 0 = no limit.
    pub solution_limit: usize,

    /// Also report solutions that tie the incumbent instead of only strict
    /// improvements.
    pub enumerate_ties: bool,

    /// Candidate order within a slot.
    pub value_order: ValueOrder,

    /// Split the top-level subtrees across rayon workers.
    ///
    /// Only honored with the `parallel` feature; reporting order across
    /// workers is then best-effort rather than traversal order.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            solution_limit: 0,
            enumerate_ties: false,
            value_order: ValueOrder::Declaration,
            parallel: false,
        }
    }
}

impl SearchConfig {
    pub fn with_solution_limit(mut self, n: usize) -> Self {
        self.solution_limit = n;
        self
    }

    pub fn with_enumerate_ties(mut self, on: bool) -> Self {
        self.enumerate_ties = on;
        self
    }

    pub fn with_value_order(mut self, order: ValueOrder) -> Self {
        self.value_order = order;
        self
    }

    pub fn with_parallel(mut self, on: bool) -> Self {
        self.parallel = on;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.parallel && !cfg!(feature = "parallel") {
            return Err("parallel search requires the `parallel` feature".into());
        }
        Ok(())
    }
}
