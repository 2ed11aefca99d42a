//! Constraint Programming (CP) layer over boolean variables.
//!
//! Provides a small, domain-agnostic model for 0/1 decision problems plus
//! the forward-checking propagation the duty search runs on.
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`]: 0/1 decision variables addressed by [`VarId`]
//! - **Constraints**: [`Constraint`]: ExactlyOne, AtMostOne, EqualSum
//! - **Model**: [`CpModel`]: container for variables, constraints and watch lists
//! - **Propagation**: [`Store`]: current domains, fixpoint propagation, undo trail
//!
//! # Design
//!
//! Variables are dense integer indices, so the search never hashes on its
//! hot path. Domain restrictions (e.g. an ineligible person) are expressed
//! by fixing a variable at modelling time rather than by extra constraints.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"
//! Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//! Constraint Satisfaction Problems"

mod model;
mod propagate;
mod variables;

pub use model::{Constraint, CpModel};
pub use propagate::{Conflict, Store};
pub use variables::{BoolVar, Value, VarId};
