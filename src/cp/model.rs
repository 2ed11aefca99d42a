//! CP model definition.

use super::variables::{BoolVar, VarId};

/// A constraint over boolean variables.
///
/// All three kinds are linear constraints on sums of 0/1 variables, which
/// is all the duty roster needs. Each keeps its variable list so the
/// propagator can count fixed and free members directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `sum(vars) == 1`.
    ExactlyOne {
        /// Participating variables.
        vars: Vec<VarId>,
    },

    /// `sum(vars) <= 1`.
    AtMostOne {
        /// Participating variables.
        vars: Vec<VarId>,
    },

    /// `sum(left) == sum(right)`.
    EqualSum {
        /// Left-hand side.
        left: Vec<VarId>,
        /// Right-hand side.
        right: Vec<VarId>,
    },
}

impl Constraint {
    /// Iterates every variable the constraint mentions.
    pub fn vars(&self) -> impl Iterator<Item = VarId> + '_ {
        let (a, b) = match self {
            Constraint::ExactlyOne { vars } | Constraint::AtMostOne { vars } => {
                (vars.as_slice(), &[][..])
            }
            Constraint::EqualSum { left, right } => (left.as_slice(), right.as_slice()),
        };
        a.iter().chain(b.iter()).copied()
    }

    /// Checks the constraint against a complete 0/1 assignment.
    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        let sum = |vars: &[VarId]| vars.iter().filter(|&&v| values[v]).count();
        match self {
            Constraint::ExactlyOne { vars } => sum(vars) == 1,
            Constraint::AtMostOne { vars } => sum(vars) <= 1,
            Constraint::EqualSum { left, right } => sum(left) == sum(right),
        }
    }
}

/// A constraint programming model over boolean variables.
///
/// Variables are addressed by dense [`VarId`]s; each variable keeps a watch
/// list of the constraints that mention it, so propagation after a
/// decision only revisits affected constraints.
///
/// # Examples
///
/// ```
/// use u_duty::cp::{BoolVar, CpModel};
///
/// let mut model = CpModel::new("example");
/// let a = model.add_bool_var(BoolVar::new("a"));
/// let b = model.add_bool_var(BoolVar::new("b"));
/// model.add_exactly_one(vec![a, b]);
/// assert!(model.validate().is_ok());
/// assert_eq!(model.watches(a), &[0]);
/// ```
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    vars: Vec<BoolVar>,
    constraints: Vec<Constraint>,
    watches: Vec<Vec<usize>>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
            watches: Vec::new(),
        }
    }

    /// Adds a boolean variable and returns its id.
    pub fn add_bool_var(&mut self, var: BoolVar) -> VarId {
        self.vars.push(var);
        self.watches.push(Vec::new());
        self.vars.len() - 1
    }

    /// Restricts a variable's domain to a single value.
    pub fn fix(&mut self, var: VarId, value: bool) {
        self.vars[var].fixed = Some(value);
    }

    /// Adds a constraint and registers it on the watch lists.
    ///
    /// Variable ids beyond the current variable count are kept in the
    /// constraint but not watched; [`validate`](Self::validate) reports them.
    pub fn add_constraint(&mut self, constraint: Constraint) -> usize {
        let id = self.constraints.len();
        for var in constraint.vars() {
            if let Some(list) = self.watches.get_mut(var) {
                if list.last() != Some(&id) {
                    list.push(id);
                }
            }
        }
        self.constraints.push(constraint);
        id
    }

    /// Convenience: add an exactly-one constraint.
    pub fn add_exactly_one(&mut self, vars: Vec<VarId>) -> usize {
        self.add_constraint(Constraint::ExactlyOne { vars })
    }

    /// Convenience: add an at-most-one constraint.
    pub fn add_at_most_one(&mut self, vars: Vec<VarId>) -> usize {
        self.add_constraint(Constraint::AtMostOne { vars })
    }

    /// Convenience: add a sum-equality constraint.
    pub fn add_equal_sum(&mut self, left: Vec<VarId>, right: Vec<VarId>) -> usize {
        self.add_constraint(Constraint::EqualSum { left, right })
    }

    /// Variable by id.
    pub fn var(&self, id: VarId) -> &BoolVar {
        &self.vars[id]
    }

    /// All variables in creation order.
    pub fn vars(&self) -> &[BoolVar] {
        &self.vars
    }

    /// Constraint by index.
    pub fn constraint(&self, id: usize) -> &Constraint {
        &self.constraints[id]
    }

    /// All constraints in creation order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraints mentioning `var`.
    pub fn watches(&self, var: VarId) -> &[usize] {
        &self.watches[var]
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable exists.
    pub fn validate(&self) -> Result<(), String> {
        for (i, constraint) in self.constraints.iter().enumerate() {
            if let Some(var) = constraint.vars().find(|&v| v >= self.vars.len()) {
                return Err(format!("constraint {i}: undefined variable {var}"));
            }
        }
        Ok(())
    }

    /// Checks a complete assignment against every constraint and fixed domain.
    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        values.len() == self.vars.len()
            && self
                .vars
                .iter()
                .zip(values)
                .all(|(var, &v)| var.fixed.is_none_or(|f| f == v))
            && self.constraints.iter().all(|c| c.is_satisfied(values))
    }

    /// Returns the number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
