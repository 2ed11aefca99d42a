//! Branch-and-bound duty search.
//!
//! Explores the 0/1 model compiled by [`ConstraintBuilder`](crate::builder::ConstraintBuilder)
//! depth-first. Each (event, role) slot is filled in chronological, then
//! role order by trying its remaining candidates; every decision is
//! propagated to a fixpoint by the [`Store`](crate::cp::Store). A node is
//! pruned when a lower bound on the [`Score`](crate::eval::Score) of any
//! completion cannot beat the incumbent.
//!
//! # Termination
//!
//! | Condition | Status |
//! |-----------|--------|
//! | tree exhausted, solution found | [`SolverStatus::Optimal`] |
//! | tree exhausted, no solution | [`SolverStatus::Infeasible`] |
//! | `solution_limit` reached | [`SolverStatus::Feasible`] |
//! | reporter stop or cancellation flag | [`SolverStatus::Cancelled`] |
//!
//! # References
//!
//! - Land & Doig (1960), "An Automatic Method of Solving Discrete
//!   Programming Problems"
//! - Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//!   Constraint Satisfaction Problems"

mod bound;
mod config;
#[cfg(feature = "parallel")]
mod parallel;
mod runner;
mod types;

pub use config::{SearchConfig, ValueOrder};
pub use runner::{DutySearch, SearchResult};
pub use types::{SearchStats, SolverStatus};
