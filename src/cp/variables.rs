//! CP variable types.

/// Dense index of a variable within a [`CpModel`](super::CpModel).
pub type VarId = usize;

/// A boolean (0/1) decision variable.
///
/// The domain starts as `{0, 1}` and can be restricted to a single value
/// at modelling time with [`BoolVar::fixed`].
#[derive(Debug, Clone)]
pub struct BoolVar {
    /// Variable name, used in diagnostics only.
    pub name: String,
    /// Fixed value, if the domain has been restricted.
    pub fixed: Option<bool>,
}

impl BoolVar {
    /// Creates a new unrestricted boolean variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed: None,
        }
    }

    /// Creates a boolean variable fixed to `value`.
    pub fn fixed(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            fixed: Some(value),
        }
    }

    /// Whether this variable is fixed to a single value.
    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    /// Domain size (1 when fixed, 2 otherwise).
    pub fn domain_size(&self) -> usize {
        if self.is_fixed() {
            1
        } else {
            2
        }
    }
}

/// Current value of a variable during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    /// Both values still possible.
    #[default]
    Free,
    /// Fixed to 0.
    False,
    /// Fixed to 1.
    True,
}

impl Value {
    /// Whether the variable is still unassigned.
    pub fn is_free(self) -> bool {
        self == Value::Free
    }

    /// Whether the variable is fixed to 1.
    pub fn is_true(self) -> bool {
        self == Value::True
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b {
            Value::True
        } else {
            Value::False
        }
    }
}
