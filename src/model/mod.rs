//! Domain model.
//!
//! Typed representation of the roster: [`Person`], [`Event`] and
//! [`CrewPair`] inputs validated into a read-only [`Roster`], plus the
//! [`Assignment`] produced by the search.
//!
//! Events are grouped into series by a shared [`SeriesId`]; the series cap
//! and the spacing rule both rely on the roster's event order being
//! chronological.

mod assignment;
mod roster;
mod types;

pub use assignment::Assignment;
pub use roster::{Roster, RosterBuilder};
pub use types::{CrewPair, Duty, Event, EventId, Person, PersonId, SeriesId};
