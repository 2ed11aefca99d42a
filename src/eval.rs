//! Fairness and preference evaluation.
//!
//! The objective is lexicographic: first minimise the duty spread (busiest
//! minus least busy person), then the number of duties held against a
//! declared preference. [`Score`] orders that way directly; the weighted
//! scalar `weight * spread + not_preferred` with `weight = people * events * 3`
//! is also provided and orders identically whenever a feasible roster exists.

use crate::model::{Assignment, Roster};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Objective value of a complete assignment. Lower is better.
///
/// Field order gives the lexicographic comparison: spread first, then
/// preference violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Score {
    /// Max minus min duty count across people.
    pub spread: usize,
    /// Number of (person, event) pairs held in a non-preferred role.
    pub not_preferred: usize,
}

impl Score {
    /// Creates a score from its two terms.
    pub fn new(spread: usize, not_preferred: usize) -> Self {
        Self {
            spread,
            not_preferred,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spread {} / not preferred {}",
            self.spread, self.not_preferred
        )
    }
}

/// Full evaluation of one assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Lexicographic objective value.
    pub score: Score,
    /// Highest duty count of any person.
    pub max_duty: usize,
    /// Lowest duty count of any person.
    pub min_duty: usize,
    /// Duty count per person, in roster order.
    pub duty_counts: Vec<usize>,
}

/// Computes objective terms for assignments of one roster.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    roster: &'a Roster,
    weight: u64,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator for `roster`.
    pub fn new(roster: &'a Roster) -> Self {
        let weight = (roster.person_count() * roster.event_count() * 3).max(1) as u64;
        Self { roster, weight }
    }

    /// Spread weight of the scalar objective.
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Scalar objective `weight * spread + not_preferred`.
    pub fn objective(&self, score: Score) -> u64 {
        self.weight * score.spread as u64 + score.not_preferred as u64
    }

    /// Evaluates a complete assignment.
    pub fn evaluate(&self, assignment: &Assignment) -> Evaluation {
        let duty_counts = assignment.duty_counts();
        let max_duty = duty_counts.iter().copied().max().unwrap_or(0);
        let min_duty = duty_counts.iter().copied().min().unwrap_or(0);

        let mut not_preferred = 0;
        for e in 0..assignment.events() {
            for (p, person) in self.roster.people().iter().enumerate() {
                if let Some(duty) = assignment.duty(p, e) {
                    if !person.prefers(duty) {
                        not_preferred += 1;
                    }
                }
            }
        }

        Evaluation {
            score: Score::new(max_duty - min_duty, not_preferred),
            max_duty,
            min_duty,
            duty_counts,
        }
    }
}
