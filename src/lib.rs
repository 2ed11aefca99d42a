//! Fair race-duty rostering.
//!
//! Assigns the duties of every scheduled event (principal race officer,
//! assistant race officer, safety-boat helm and crew) to a roster of people,
//! subject to eligibility, availability, and optional fairness rules, while
//! minimising workload imbalance and then the number of duties held against
//! a stated preference.
//!
//! - **Model**: people, events, series, crew pairs, and assignments.
//! - **CP**: a small 0/1 constraint system with a forward-checking store.
//! - **Rules**: independent toggles for the optional constraints.
//! - **Builder**: compiles a roster and rule set into the constraint system.
//! - **Eval**: spread and preference terms of the objective.
//! - **Search**: exact branch-and-bound with cooperative cancellation.
//! - **Report**: callback interface receiving every improving solution.
//!
//! # Examples
//!
//! ```
//! use u_duty::model::{Event, Person, Roster};
//! use u_duty::rules::RuleSet;
//! use u_duty::search::{DutySearch, SearchConfig, SolverStatus};
//!
//! let roster = Roster::builder()
//!     .people((0..4).map(|i| Person::new(format!("p{i}")).qualified().experienced()))
//!     .events((0..4).map(|i| Event::new(format!("race{i}"), "spring")))
//!     .build()
//!     .unwrap();
//!
//! let result = DutySearch::solve(&roster, &RuleSet::default(), &SearchConfig::default()).unwrap();
//! assert_eq!(result.status, SolverStatus::Optimal);
//! assert_eq!(result.best.unwrap().spread(), 0);
//! ```
//!
//! # Architecture
//!
//! Loading roster, calendar, and unavailability data, parsing command-line
//! toggles, and rendering results are left to consumers; this crate starts
//! from a validated [`Roster`](model::Roster) and ends at the
//! [`SolutionReporter`](report::SolutionReporter).

pub mod builder;
pub mod cp;
pub mod error;
pub mod eval;
pub mod model;
pub mod report;
pub mod rules;
pub mod search;

pub use error::InvalidDataError;
