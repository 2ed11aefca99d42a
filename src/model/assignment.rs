//! Complete duty assignments.

use super::roster::Roster;
use super::types::Duty;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mapping from (person, event) to the duty held, `None` meaning off duty.
///
/// Stored densely, event-major, indexed by the roster's person and event
/// positions. Handed out by the search engine as an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    people: usize,
    events: usize,
    cells: Vec<Option<Duty>>,
}

impl Assignment {
    /// Creates an assignment with everybody off duty.
    pub fn new(people: usize, events: usize) -> Self {
        Self {
            people,
            events,
            cells: vec![None; people * events],
        }
    }

    /// Number of people.
    pub fn people(&self) -> usize {
        self.people
    }

    /// Number of events.
    pub fn events(&self) -> usize {
        self.events
    }

    /// Duty held by `person` at `event`.
    pub fn duty(&self, person: usize, event: usize) -> Option<Duty> {
        self.cells[event * self.people + person]
    }

    pub(crate) fn set(&mut self, person: usize, event: usize, duty: Option<Duty>) {
        self.cells[event * self.people + person] = duty;
    }

    /// Whether `person` holds any duty at `event`.
    pub fn is_on_duty(&self, person: usize, event: usize) -> bool {
        self.duty(person, event).is_some()
    }

    /// The person holding `duty` at `event`, if any.
    pub fn holder(&self, event: usize, duty: Duty) -> Option<usize> {
        let row = &self.cells[event * self.people..(event + 1) * self.people];
        row.iter().position(|&d| d == Some(duty))
    }

    /// Holder of every role at `event`, indexed by [`Duty::index`].
    ///
    /// This is the row written back to a race calendar.
    pub fn calendar_row(&self, event: usize) -> [Option<usize>; 4] {
        Duty::ALL.map(|duty| self.holder(event, duty))
    }

    /// Number of events at which `person` is on duty.
    pub fn duty_count(&self, person: usize) -> usize {
        (0..self.events)
            .filter(|&e| self.is_on_duty(person, e))
            .count()
    }

    /// Duty count of every person.
    pub fn duty_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.people];
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.is_some() {
                counts[i % self.people] += 1;
            }
        }
        counts
    }

    /// Duty counts per person and series: `result[person][series]`.
    pub fn series_counts(&self, roster: &Roster) -> Vec<Vec<usize>> {
        let mut counts = vec![vec![0; roster.series().len()]; self.people];
        for e in 0..self.events {
            let s = roster.series_of(e);
            for (p, row) in counts.iter_mut().enumerate() {
                if self.is_on_duty(p, e) {
                    row[s] += 1;
                }
            }
        }
        counts
    }
}
