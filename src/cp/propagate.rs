//! Forward-checking domain store.
//!
//! Holds the current value of every variable of a [`CpModel`] and
//! propagates decisions to a fixpoint: whenever a variable is fixed, every
//! constraint watching it is revised and may fix further variables. Fixed
//! variables are recorded on a trail so a search can backtrack to any
//! earlier [`mark`](Store::mark).

use super::model::{Constraint, CpModel};
use super::variables::{Value, VarId};
use std::collections::VecDeque;

/// A propagation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    /// The violated constraint, or `None` when the decision itself clashed
    /// with the variable's current value.
    pub constraint: Option<usize>,
}

/// Variable values plus undo trail.
#[derive(Debug, Clone)]
pub struct Store {
    values: Vec<Value>,
    trail: Vec<VarId>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
}

impl Store {
    /// Creates a store from the model's fixed domains and runs root
    /// propagation over every constraint.
    ///
    /// Root-level deductions are permanent: they are not on the trail.
    ///
    /// # Errors
    ///
    /// Returns the first [`Conflict`] if the model is infeasible at the root.
    pub fn new(model: &CpModel) -> Result<Self, Conflict> {
        let mut store = Self {
            values: model
                .vars()
                .iter()
                .map(|v| v.fixed.map_or(Value::Free, Value::from))
                .collect(),
            trail: Vec::new(),
            queue: VecDeque::new(),
            queued: vec![false; model.constraint_count()],
        };
        for c in 0..model.constraint_count() {
            store.enqueue(c);
        }
        store.propagate(model)?;
        store.trail.clear();
        Ok(store)
    }

    /// Current value of `var`.
    pub fn value(&self, var: VarId) -> Value {
        self.values[var]
    }

    /// Current values of all variables.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Whether every variable is fixed.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(|v| !v.is_free())
    }

    /// Current trail position, to pass to [`undo`](Self::undo).
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Frees every variable fixed after `mark`.
    pub fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(var) = self.trail.pop() {
                self.values[var] = Value::Free;
            }
        }
    }

    /// Fixes `var` to `value` and propagates to a fixpoint.
    ///
    /// On failure the store is left partially propagated; callers undo to
    /// their mark.
    ///
    /// # Errors
    ///
    /// Returns the [`Conflict`] that ended propagation.
    pub fn assign(&mut self, model: &CpModel, var: VarId, value: bool) -> Result<(), Conflict> {
        if !self.set(model, var, value) {
            return Err(Conflict { constraint: None });
        }
        self.propagate(model)
    }

    fn set(&mut self, model: &CpModel, var: VarId, value: bool) -> bool {
        match self.values[var] {
            Value::Free => {
                self.values[var] = Value::from(value);
                self.trail.push(var);
                for &c in model.watches(var) {
                    self.enqueue(c);
                }
                true
            }
            current => current == Value::from(value),
        }
    }

    fn enqueue(&mut self, c: usize) {
        if !self.queued[c] {
            self.queued[c] = true;
            self.queue.push_back(c);
        }
    }

    fn propagate(&mut self, model: &CpModel) -> Result<(), Conflict> {
        while let Some(c) = self.queue.pop_front() {
            self.queued[c] = false;
            if let Err(conflict) = self.revise(model, c) {
                for c in self.queue.drain(..) {
                    self.queued[c] = false;
                }
                return Err(conflict);
            }
        }
        Ok(())
    }

    /// (ones, free, last free variable)
    fn count(&self, vars: &[VarId]) -> (usize, usize, Option<VarId>) {
        let mut ones = 0;
        let mut free = 0;
        let mut last = None;
        for &v in vars {
            match self.values[v] {
                Value::True => ones += 1,
                Value::Free => {
                    free += 1;
                    last = Some(v);
                }
                Value::False => {}
            }
        }
        (ones, free, last)
    }

    fn fill(&mut self, model: &CpModel, vars: &[VarId], value: bool) {
        for &v in vars {
            if self.values[v].is_free() {
                self.set(model, v, value);
            }
        }
    }

    fn revise(&mut self, model: &CpModel, c: usize) -> Result<(), Conflict> {
        let conflict = Conflict {
            constraint: Some(c),
        };
        match model.constraint(c) {
            Constraint::ExactlyOne { vars } => {
                let (ones, free, last) = self.count(vars);
                if ones > 1 || (ones == 0 && free == 0) {
                    return Err(conflict);
                }
                if ones == 1 {
                    self.fill(model, vars, false);
                } else if let (1, Some(v)) = (free, last) {
                    self.set(model, v, true);
                }
            }
            Constraint::AtMostOne { vars } => {
                let (ones, free, _) = self.count(vars);
                if ones > 1 {
                    return Err(conflict);
                }
                if ones == 1 && free > 0 {
                    self.fill(model, vars, false);
                }
            }
            Constraint::EqualSum { left, right } => {
                let (l_ones, l_free, _) = self.count(left);
                let (r_ones, r_free, _) = self.count(right);
                let lo = l_ones.max(r_ones);
                let hi = (l_ones + l_free).min(r_ones + r_free);
                if lo > hi {
                    return Err(conflict);
                }
                for (ones, free, vars) in [(l_ones, l_free, left), (r_ones, r_free, right)] {
                    if free == 0 {
                        continue;
                    }
                    if ones == hi {
                        self.fill(model, vars, false);
                    } else if ones + free == lo {
                        self.fill(model, vars, true);
                    }
                }
            }
        }
        Ok(())
    }
}
