//! Search outcome types.

use std::fmt;
use std::ops::AddAssign;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverStatus {
    /// The tree was exhausted; the best solution is proven optimal.
    Optimal,
    /// The solution limit was reached before the tree was exhausted.
    Feasible,
    /// The tree was exhausted without finding any solution.
    Infeasible,
    /// The reporter or the cancellation flag stopped the search.
    Cancelled,
}

impl SolverStatus {
    /// Whether the search ran to completion.
    pub fn is_proven(self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Infeasible)
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Feasible => "feasible",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchStats {
    /// Nodes entered, root included.
    pub nodes: u64,
    /// Complete assignments reached.
    pub leaves: u64,
    /// Decisions refuted by propagation.
    pub failures: u64,
    /// Nodes cut because their bound could not beat the incumbent.
    pub pruned_by_bound: u64,
    /// Deepest decision level reached.
    pub max_depth: usize,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.failures += other.failures;
        self.pruned_by_bound += other.pruned_by_bound;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}
