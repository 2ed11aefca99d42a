//! Constraint builder.
//!
//! Compiles a [`Roster`] and a [`RuleSet`] into a [`DutyModel`]: one 0/1
//! variable per (person, event, role), laid out densely so that the
//! candidates of one (event, role) slot are contiguous.
//!
//! | Rule | Encoding |
//! |------|----------|
//! | every role filled | `ExactlyOne` per (event, role) |
//! | one duty per event | `AtMostOne` per (person, event) |
//! | qualification, experience, availability | variable fixed to 0 |
//! | `respect_preferences` | variable fixed to 0 |
//! | `paired_duties` | `EqualSum` of both members' indicators per event |
//! | `one_duty_per_series` | `AtMostOne` per (person, series) |
//! | `minimum_spacing` | `AtMostOne` per (person, window of consecutive events) |

use crate::cp::{BoolVar, CpModel, VarId};
use crate::error::InvalidDataError;
use crate::model::{Duty, Roster};
use crate::rules::RuleSet;
use std::ops::Range;

/// The compiled constraint system for one roster and rule set.
///
/// Variable `(person, event, role)` lives at
/// `(event * roles + role) * people + person`, where `role` is the
/// position in [`DutyModel::roles`].
#[derive(Debug, Clone)]
pub struct DutyModel<'a> {
    roster: &'a Roster,
    rules: RuleSet,
    roles: &'static [Duty],
    cp: CpModel,
    not_preferred: Vec<bool>,
}

impl<'a> DutyModel<'a> {
    /// Roster the model was compiled from.
    pub fn roster(&self) -> &'a Roster {
        self.roster
    }

    /// Rules the model was compiled with.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Roles each event must fill, in branching order.
    pub fn roles(&self) -> &'static [Duty] {
        self.roles
    }

    /// Underlying constraint system.
    pub fn cp(&self) -> &CpModel {
        &self.cp
    }

    /// Variable for `person` holding role number `role` at `event`.
    pub fn var(&self, person: usize, event: usize, role: usize) -> VarId {
        (event * self.roles.len() + role) * self.roster.person_count() + person
    }

    /// Decodes a variable into (person, event, duty).
    pub fn decode(&self, var: VarId) -> (usize, usize, Duty) {
        let people = self.roster.person_count();
        let slot = var / people;
        let (event, role) = self.slot(slot);
        (var % people, event, self.roles[role])
    }

    /// Number of (event, role) slots.
    pub fn slot_count(&self) -> usize {
        self.roster.event_count() * self.roles.len()
    }

    /// (event, role position) of a slot. Slots are ordered chronologically,
    /// then by role priority.
    pub fn slot(&self, slot: usize) -> (usize, usize) {
        (slot / self.roles.len(), slot % self.roles.len())
    }

    /// Candidate variables of a slot, in person declaration order.
    pub fn slot_vars(&self, slot: usize) -> Range<VarId> {
        let people = self.roster.person_count();
        slot * people..(slot + 1) * people
    }

    /// Indicators of one person at one event; their sum is the person's load there.
    pub fn load_vars(&self, person: usize, event: usize) -> impl Iterator<Item = VarId> + '_ {
        (0..self.roles.len()).map(move |r| self.var(person, event, r))
    }

    /// Whether holding `var` violates the person's declared preferences.
    pub fn is_not_preferred(&self, var: VarId) -> bool {
        self.not_preferred[var]
    }
}

/// Builds a [`DutyModel`] from a roster and rule set.
///
/// Building is deterministic: the same inputs yield the same variable
/// numbering and constraint order.
///
/// # Examples
///
/// ```
/// use u_duty::builder::ConstraintBuilder;
/// use u_duty::model::{Event, Person, Roster};
/// use u_duty::rules::RuleSet;
///
/// let people = (0..4).map(|i| Person::new(format!("p{i}")).qualified().experienced());
/// let roster = Roster::builder()
///     .people(people)
///     .event(Event::new("r1", "spring"))
///     .build()
///     .unwrap();
/// let model = ConstraintBuilder::new(&roster, &RuleSet::default()).build().unwrap();
/// assert_eq!(model.cp().var_count(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintBuilder<'a, 'b> {
    roster: &'a Roster,
    rules: &'b RuleSet,
}

impl<'a, 'b> ConstraintBuilder<'a, 'b> {
    /// Creates a builder; the compiled model borrows only the roster.
    pub fn new(roster: &'a Roster, rules: &'b RuleSet) -> Self {
        Self { roster, rules }
    }

    /// Compiles the constraint system.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDataError::InvalidRules`] if the rule set fails
    /// validation.
    pub fn build(self) -> Result<DutyModel<'a>, InvalidDataError> {
        self.rules
            .validate()
            .map_err(InvalidDataError::InvalidRules)?;

        let roster = self.roster;
        let rules = self.rules;
        let roles = rules.roles();
        let people = roster.person_count();
        let events = roster.event_count();

        let mut cp = CpModel::new("duty-roster");
        let mut not_preferred = Vec::with_capacity(people * events * roles.len());

        for (e, event) in roster.events().iter().enumerate() {
            for &duty in roles {
                for (p, person) in roster.people().iter().enumerate() {
                    let name = format!("{duty:?}_{}_{}", person.id, event.id);
                    let prefers = person.prefers(duty);
                    let allowed = person.is_eligible(duty)
                        && !roster.is_unavailable(p, e)
                        && (prefers || !rules.respect_preferences);
                    let var = if allowed {
                        BoolVar::new(name)
                    } else {
                        BoolVar::fixed(name, false)
                    };
                    cp.add_bool_var(var);
                    not_preferred.push(!prefers);
                }
            }
        }

        let mut model = DutyModel {
            roster,
            rules: rules.clone(),
            roles,
            cp: CpModel::new("duty-roster"),
            not_preferred,
        };

        for slot in 0..model.slot_count() {
            cp.add_exactly_one(model.slot_vars(slot).collect());
        }

        for e in 0..events {
            for p in 0..people {
                cp.add_at_most_one(model.load_vars(p, e).collect());
            }
        }

        if rules.paired_duties {
            for pair in roster.crew_pairs() {
                let helm = roster
                    .person_index(&pair.helm)
                    .ok_or_else(|| InvalidDataError::UnknownPerson(pair.helm.clone()))?;
                let crew = roster
                    .person_index(&pair.crew)
                    .ok_or_else(|| InvalidDataError::UnknownPerson(pair.crew.clone()))?;
                for e in 0..events {
                    cp.add_equal_sum(
                        model.load_vars(helm, e).collect(),
                        model.load_vars(crew, e).collect(),
                    );
                }
            }
        }

        if rules.one_duty_per_series {
            for s in 0..roster.series().len() {
                let series_events = roster.events_in_series(s);
                if series_events.len() < 2 {
                    continue;
                }
                for p in 0..people {
                    let vars = series_events
                        .iter()
                        .flat_map(|&e| model.load_vars(p, e))
                        .collect();
                    cp.add_at_most_one(vars);
                }
            }
        }

        if rules.minimum_spacing {
            for window in spacing_windows(events, rules.spacing_window) {
                for p in 0..people {
                    let vars = window.clone().flat_map(|e| model.load_vars(p, e)).collect();
                    cp.add_at_most_one(vars);
                }
            }
        }

        debug_assert!(cp.validate().is_ok());
        tracing::debug!(
            vars = cp.var_count(),
            constraints = cp.constraint_count(),
            slots = model.slot_count(),
            "duty model compiled"
        );

        model.cp = cp;
        Ok(model)
    }
}

/// Every window of `window` consecutive events, tail included.
///
/// With fewer events than the window, all events form one window.
fn spacing_windows(events: usize, window: usize) -> Vec<Range<usize>> {
    if events == 0 {
        Vec::new()
    } else if events <= window {
        vec![0..events]
    } else {
        (0..=events - window).map(|s| s..s + window).collect()
    }
}
