//! Rule configuration.
//!
//! The hard rules (qualification, experience, one duty per event, every
//! duty filled, nobody on duty when unavailable) are always active. The
//! four optional rules are independent toggles that may be combined
//! freely.

use crate::model::Duty;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default spacing window: at most one duty in any four consecutive events.
pub const DEFAULT_SPACING_WINDOW: usize = 4;

/// Enabled optional rules plus the per-event role set.
///
/// # Examples
///
/// ```
/// use u_duty::rules::RuleSet;
///
/// let rules = RuleSet::default()
///     .with_paired_duties(true)
///     .with_minimum_spacing(true)
///     .with_spacing_window(3);
/// assert!(rules.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuleSet {
    /// Crew pairs share on/off-duty status at every event.
    pub paired_duties: bool,

    /// At most one duty per person per series.
    pub one_duty_per_series: bool,

    /// At most one duty per person in any `spacing_window` consecutive events.
    pub minimum_spacing: bool,

    /// Nobody is given a role they declared no preference for.
    pub respect_preferences: bool,

    /// Window length for `minimum_spacing`. Must be at least 2.
    pub spacing_window: usize,

    /// Whether each event staffs a safety-boat crew seat in addition to the helm.
    pub two_safety_boats: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            paired_duties: false,
            one_duty_per_series: false,
            minimum_spacing: false,
            respect_preferences: false,
            spacing_window: DEFAULT_SPACING_WINDOW,
            two_safety_boats: true,
        }
    }
}

impl RuleSet {
    pub fn with_paired_duties(mut self, on: bool) -> Self {
        self.paired_duties = on;
        self
    }

    pub fn with_one_duty_per_series(mut self, on: bool) -> Self {
        self.one_duty_per_series = on;
        self
    }

    pub fn with_minimum_spacing(mut self, on: bool) -> Self {
        self.minimum_spacing = on;
        self
    }

    pub fn with_respect_preferences(mut self, on: bool) -> Self {
        self.respect_preferences = on;
        self
    }

    pub fn with_spacing_window(mut self, window: usize) -> Self {
        self.spacing_window = window;
        self
    }

    pub fn with_two_safety_boats(mut self, on: bool) -> Self {
        self.two_safety_boats = on;
        self
    }

    /// Roles every event must fill, in branching priority order.
    pub fn roles(&self) -> &'static [Duty] {
        const ONE_BOAT: [Duty; 3] = [Duty::Pro, Duty::Aro, Duty::SafetyHelm];
        if self.two_safety_boats {
            &Duty::ALL
        } else {
            &ONE_BOAT
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.spacing_window == 0 {
            return Err("spacing_window must be at least 1".to_string());
        }
        Ok(())
    }
}
