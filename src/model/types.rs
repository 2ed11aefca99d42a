//! Domain types: people, events, duties and crew pairs.

use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id!(
    /// Unique identifier of a person on the roster.
    PersonId
);
string_id!(
    /// Unique identifier of a scheduled event.
    EventId
);
string_id!(
    /// Grouping key shared by the events of one series.
    SeriesId
);

/// A race-duty role held by one person at one event.
///
/// "No duty" is represented as `Option::<Duty>::None` throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Duty {
    /// Principal race officer.
    Pro,
    /// Assistant race officer.
    Aro,
    /// Safety boat helm.
    SafetyHelm,
    /// Safety boat crew.
    SafetyCrew,
}

impl Duty {
    /// All roles in branching priority order.
    pub const ALL: [Duty; 4] = [Duty::Pro, Duty::Aro, Duty::SafetyHelm, Duty::SafetyCrew];

    /// Position of the role in [`Duty::ALL`].
    pub fn index(self) -> usize {
        match self {
            Duty::Pro => 0,
            Duty::Aro => 1,
            Duty::SafetyHelm => 2,
            Duty::SafetyCrew => 3,
        }
    }

    /// Whether the role is a safety-boat seat.
    pub fn is_safety_boat(self) -> bool {
        matches!(self, Duty::SafetyHelm | Duty::SafetyCrew)
    }

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            Duty::Pro => "PRO",
            Duty::Aro => "ARO",
            Duty::SafetyHelm => "Safety Helm",
            Duty::SafetyCrew => "Safety Crew",
        }
    }
}

impl fmt::Display for Duty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A member of the duty roster.
///
/// Qualification flags default to `false`, preference flags to `true`.
///
/// # Examples
///
/// ```
/// use u_duty::model::{Duty, Person};
///
/// let ann = Person::new("ann").qualified().with_preferences(false, true, true);
/// assert!(ann.is_eligible(Duty::SafetyHelm));
/// assert!(!ann.is_eligible(Duty::Pro));
/// assert!(!ann.prefers(Duty::Pro));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Person {
    /// Unique identifier.
    pub id: PersonId,
    /// May helm or crew the safety boat.
    pub qualified_safety_boat: bool,
    /// May act as principal race officer.
    pub experienced_officer: bool,
    /// Prefers principal race officer duty.
    pub prefers_pro: bool,
    /// Prefers assistant race officer duty.
    pub prefers_aro: bool,
    /// Prefers safety boat duty (either seat).
    pub prefers_safety_boat: bool,
    /// Events the person cannot attend.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unavailable: BTreeSet<EventId>,
}

impl Person {
    /// Creates an unqualified, inexperienced person who prefers every duty.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: PersonId::new(id),
            qualified_safety_boat: false,
            experienced_officer: false,
            prefers_pro: true,
            prefers_aro: true,
            prefers_safety_boat: true,
            unavailable: BTreeSet::new(),
        }
    }

    /// Marks the person as safety-boat qualified.
    pub fn qualified(mut self) -> Self {
        self.qualified_safety_boat = true;
        self
    }

    /// Marks the person as an experienced officer.
    pub fn experienced(mut self) -> Self {
        self.experienced_officer = true;
        self
    }

    /// Sets the three preference flags.
    pub fn with_preferences(mut self, pro: bool, aro: bool, safety_boat: bool) -> Self {
        self.prefers_pro = pro;
        self.prefers_aro = aro;
        self.prefers_safety_boat = safety_boat;
        self
    }

    /// Adds an event the person cannot attend.
    pub fn unavailable_for(mut self, event: impl Into<String>) -> Self {
        self.unavailable.insert(EventId::new(event));
        self
    }

    /// Whether the person's qualifications allow the role.
    pub fn is_eligible(&self, duty: Duty) -> bool {
        match duty {
            Duty::Pro => self.experienced_officer,
            Duty::Aro => true,
            Duty::SafetyHelm | Duty::SafetyCrew => self.qualified_safety_boat,
        }
    }

    /// Whether the person declared a preference for the role.
    pub fn prefers(&self, duty: Duty) -> bool {
        match duty {
            Duty::Pro => self.prefers_pro,
            Duty::Aro => self.prefers_aro,
            Duty::SafetyHelm | Duty::SafetyCrew => self.prefers_safety_boat,
        }
    }

    /// Whether the person is unavailable for the event.
    pub fn is_unavailable(&self, event: &EventId) -> bool {
        self.unavailable.contains(event)
    }
}

/// A scheduled event belonging to exactly one series.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// Series the event belongs to.
    pub series: SeriesId,
}

impl Event {
    /// Creates an event in the named series.
    pub fn new(id: impl Into<String>, series: impl Into<String>) -> Self {
        Self {
            id: EventId::new(id),
            series: SeriesId::new(series),
        }
    }
}

/// A helm and crew who sail together and must share on/off-duty status.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CrewPair {
    /// Helm of the pair.
    pub helm: PersonId,
    /// Crew of the pair.
    pub crew: PersonId,
}

impl CrewPair {
    /// Creates a pair from the two person ids.
    pub fn new(helm: impl Into<String>, crew: impl Into<String>) -> Self {
        Self {
            helm: PersonId::new(helm),
            crew: PersonId::new(crew),
        }
    }
}
