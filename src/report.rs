//! Solution reporting.
//!
//! The search engine hands every improving complete assignment to a
//! [`SolutionReporter`], which answers with [`ControlFlow::Continue`] to keep
//! searching or [`ControlFlow::Break`] to stop. Stopping ends the search
//! with [`SolverStatus::Cancelled`](crate::search::SolverStatus::Cancelled).
//!
//! Any `FnMut(&DutySolution) -> ControlFlow<()>` closure is a reporter.
//!
//! # Examples
//!
//! ```
//! use std::ops::ControlFlow;
//! use u_duty::report::{DutySolution, SolutionReporter};
//!
//! let mut seen = 0;
//! let mut reporter = |_: &DutySolution| {
//!     seen += 1;
//!     if seen >= 3 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
//! };
//! # fn check(_: &mut impl SolutionReporter) {}
//! # check(&mut reporter);
//! ```

use crate::eval::{Evaluator, Score};
use crate::model::{Assignment, Roster};
use std::ops::ControlFlow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A complete, feasible assignment with its objective terms.
///
/// This is everything an external sink needs to render or export a
/// solution: the assignment itself, the score, and per-person and
/// per-series duty counts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DutySolution {
    /// Duty held by each person at each event.
    pub assignment: Assignment,
    /// Lexicographic objective value.
    pub score: Score,
    /// Scalar objective `weight * spread + not_preferred`.
    pub objective: u64,
    /// Highest duty count of any person.
    pub max_duty: usize,
    /// Lowest duty count of any person.
    pub min_duty: usize,
    /// Duties per person, in roster order.
    pub duty_counts: Vec<usize>,
    /// Duties per person and series: `series_counts[person][series]`.
    pub series_counts: Vec<Vec<usize>>,
    /// Mean duties per person.
    pub average_duty: f64,
}

impl DutySolution {
    /// Evaluates `assignment` and packages the result.
    pub fn new(roster: &Roster, evaluator: &Evaluator<'_>, assignment: Assignment) -> Self {
        let eval = evaluator.evaluate(&assignment);
        let total: usize = eval.duty_counts.iter().sum();
        let average_duty = if eval.duty_counts.is_empty() {
            0.0
        } else {
            total as f64 / eval.duty_counts.len() as f64
        };
        Self {
            series_counts: assignment.series_counts(roster),
            assignment,
            score: eval.score,
            objective: evaluator.objective(eval.score),
            max_duty: eval.max_duty,
            min_duty: eval.min_duty,
            duty_counts: eval.duty_counts,
            average_duty,
        }
    }

    /// Duty spread of the solution.
    pub fn spread(&self) -> usize {
        self.score.spread
    }

    /// Duties held against a declared preference.
    pub fn not_preferred(&self) -> usize {
        self.score.not_preferred
    }

    /// Person indices sorted by duty count, busiest first; ties keep roster order.
    pub fn busiest_first(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.duty_counts.len()).collect();
        order.sort_by(|&a, &b| self.duty_counts[b].cmp(&self.duty_counts[a]));
        order
    }
}

/// Receives each reported solution and decides whether the search goes on.
///
/// The search entry points take reporters that are also `Send`, so one
/// reporter serves both sequential and parallel runs.
pub trait SolutionReporter {
    /// Called once per reported solution, in traversal order.
    fn on_solution(&mut self, solution: &DutySolution) -> ControlFlow<()>;
}

impl<F> SolutionReporter for F
where
    F: FnMut(&DutySolution) -> ControlFlow<()>,
{
    fn on_solution(&mut self, solution: &DutySolution) -> ControlFlow<()> {
        self(solution)
    }
}

/// Reporter that ignores every solution.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl SolutionReporter for NoopReporter {
    fn on_solution(&mut self, _solution: &DutySolution) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Stops the search after a fixed number of solutions.
#[derive(Debug, Clone, Copy)]
pub struct SolutionLimit {
    limit: usize,
    seen: usize,
}

impl SolutionLimit {
    /// Stops after `limit` solutions.
    pub fn new(limit: usize) -> Self {
        Self { limit, seen: 0 }
    }

    /// Solutions seen so far.
    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl SolutionReporter for SolutionLimit {
    fn on_solution(&mut self, _solution: &DutySolution) -> ControlFlow<()> {
        self.seen += 1;
        if self.seen >= self.limit {
            tracing::info!(limit = self.limit, "stop search after solution limit");
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Keeps a copy of every reported solution.
#[derive(Debug, Clone, Default)]
pub struct CollectSolutions {
    /// Every solution received, in report order.
    pub solutions: Vec<DutySolution>,
}

impl CollectSolutions {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SolutionReporter for CollectSolutions {
    fn on_solution(&mut self, solution: &DutySolution) -> ControlFlow<()> {
        self.solutions.push(solution.clone());
        ControlFlow::Continue(())
    }
}
