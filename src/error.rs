//! Error types.
//!
//! Only malformed input is an error. Search outcomes such as an infeasible
//! roster or a cancelled run are reported through
//! [`SolverStatus`](crate::search::SolverStatus) instead.

use crate::model::{EventId, PersonId};
use thiserror::Error;

/// Malformed or inconsistent input data.
///
/// Detected while building the [`Roster`](crate::model::Roster) or compiling
/// the constraint system, always before any search starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDataError {
    /// Two people share the same identifier.
    #[error("duplicate person id: {0}")]
    DuplicatePerson(PersonId),

    /// Two events share the same identifier.
    #[error("duplicate event id: {0}")]
    DuplicateEvent(EventId),

    /// A crew pair or unavailability record names a person that does not exist.
    #[error("unknown person: {0}")]
    UnknownPerson(PersonId),

    /// An unavailability record names an event that does not exist.
    #[error("unknown event {event} referenced by {person}")]
    UnknownEvent {
        /// Person whose record holds the reference.
        person: PersonId,
        /// The missing event.
        event: EventId,
    },

    /// A crew pair lists the same person as helm and crew.
    #[error("crew pair pairs {0} with themselves")]
    SelfPair(PersonId),

    /// A person appears in more than one crew pair.
    #[error("{0} appears in more than one crew pair")]
    MultiplePairs(PersonId),

    /// The rule configuration is unusable.
    #[error("invalid rule configuration: {0}")]
    InvalidRules(String),
}
