//! The validated, read-only domain model.

use super::types::{CrewPair, Event, EventId, Person, PersonId, SeriesId};
use crate::error::InvalidDataError;
use std::collections::HashMap;

/// People, events, series and crew pairs for one scheduling run.
///
/// Built once through [`RosterBuilder`] (or [`Roster::new`]) and immutable
/// afterwards. People and events keep their declaration order; events are
/// expected to arrive sorted chronologically, which the spacing rule relies
/// on. Series are numbered in order of first appearance.
#[derive(Debug, Clone)]
pub struct Roster {
    people: Vec<Person>,
    events: Vec<Event>,
    crew_pairs: Vec<CrewPair>,
    series: Vec<SeriesId>,
    event_series: Vec<usize>,
    series_events: Vec<Vec<usize>>,
    partners: Vec<Option<usize>>,
    person_index: HashMap<PersonId, usize>,
    event_index: HashMap<EventId, usize>,
}

impl Roster {
    /// Validates and builds a roster from complete lists.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDataError`] on duplicate identifiers, on references
    /// to unknown people or events, and on malformed crew pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_duty::model::{CrewPair, Event, Person, Roster};
    ///
    /// let roster = Roster::new(
    ///     vec![Person::new("ann"), Person::new("bob")],
    ///     vec![Event::new("r1", "spring")],
    ///     vec![CrewPair::new("ann", "bob")],
    /// )
    /// .unwrap();
    /// assert_eq!(roster.partner(0), Some(1));
    /// ```
    pub fn new(
        people: Vec<Person>,
        events: Vec<Event>,
        crew_pairs: Vec<CrewPair>,
    ) -> Result<Self, InvalidDataError> {
        RosterBuilder {
            people,
            events,
            crew_pairs,
            unavailability: Vec::new(),
        }
        .build()
    }

    /// Starts an empty builder.
    pub fn builder() -> RosterBuilder {
        RosterBuilder::default()
    }

    /// People in roster order.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Events in chronological order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Declared crew pairs.
    pub fn crew_pairs(&self) -> &[CrewPair] {
        &self.crew_pairs
    }

    /// Distinct series in order of first appearance.
    pub fn series(&self) -> &[SeriesId] {
        &self.series
    }

    /// Number of people.
    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    /// Number of events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Position of the person with `id`, if present.
    pub fn person_index(&self, id: &PersonId) -> Option<usize> {
        self.person_index.get(id).copied()
    }

    /// Position of the event with `id`, if present.
    pub fn event_index(&self, id: &EventId) -> Option<usize> {
        self.event_index.get(id).copied()
    }

    /// Series index of the event at `event`.
    pub fn series_of(&self, event: usize) -> usize {
        self.event_series[event]
    }

    /// Event indices of one series, chronological.
    pub fn events_in_series(&self, series: usize) -> &[usize] {
        &self.series_events[series]
    }

    /// Index of the person's crew partner, if paired.
    pub fn partner(&self, person: usize) -> Option<usize> {
        self.partners[person]
    }

    /// Whether `person` cannot attend `event` (both by index).
    pub fn is_unavailable(&self, person: usize, event: usize) -> bool {
        self.people[person].is_unavailable(&self.events[event].id)
    }
}

/// Incremental constructor for [`Roster`], fed by the external loaders.
///
/// # Examples
///
/// ```
/// use u_duty::model::{Event, Person, Roster};
///
/// let roster = Roster::builder()
///     .person(Person::new("ann").qualified())
///     .event(Event::new("r1", "spring"))
///     .unavailable("ann", "r1")
///     .build()
///     .unwrap();
/// assert!(roster.is_unavailable(0, 0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterBuilder {
    people: Vec<Person>,
    events: Vec<Event>,
    crew_pairs: Vec<CrewPair>,
    unavailability: Vec<(PersonId, EventId)>,
}

impl RosterBuilder {
    /// Adds one person.
    pub fn person(mut self, person: Person) -> Self {
        self.people.push(person);
        self
    }

    /// Adds several people.
    pub fn people(mut self, people: impl IntoIterator<Item = Person>) -> Self {
        self.people.extend(people);
        self
    }

    /// Appends an event; events must be added in chronological order.
    pub fn event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Adds several events.
    pub fn events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    /// Declares a helm and crew pair.
    pub fn crew_pair(mut self, pair: CrewPair) -> Self {
        self.crew_pairs.push(pair);
        self
    }

    /// Records a (person, event) unavailability pair.
    pub fn unavailable(mut self, person: impl Into<String>, event: impl Into<String>) -> Self {
        self.unavailability
            .push((PersonId::new(person), EventId::new(event)));
        self
    }

    /// Validates the collected data and builds the roster.
    ///
    /// # Errors
    ///
    /// See [`Roster::new`].
    pub fn build(self) -> Result<Roster, InvalidDataError> {
        let RosterBuilder {
            mut people,
            events,
            crew_pairs,
            unavailability,
        } = self;

        let mut person_index = HashMap::with_capacity(people.len());
        for (i, p) in people.iter().enumerate() {
            if person_index.insert(p.id.clone(), i).is_some() {
                return Err(InvalidDataError::DuplicatePerson(p.id.clone()));
            }
        }

        let mut event_index = HashMap::with_capacity(events.len());
        for (i, e) in events.iter().enumerate() {
            if event_index.insert(e.id.clone(), i).is_some() {
                return Err(InvalidDataError::DuplicateEvent(e.id.clone()));
            }
        }

        for (person, event) in unavailability {
            let Some(&i) = person_index.get(&person) else {
                return Err(InvalidDataError::UnknownPerson(person));
            };
            people[i].unavailable.insert(event);
        }

        for p in &people {
            if let Some(event) = p.unavailable.iter().find(|e| !event_index.contains_key(*e)) {
                return Err(InvalidDataError::UnknownEvent {
                    person: p.id.clone(),
                    event: event.clone(),
                });
            }
        }

        let mut partners = vec![None; people.len()];
        for pair in &crew_pairs {
            let helm = *person_index
                .get(&pair.helm)
                .ok_or_else(|| InvalidDataError::UnknownPerson(pair.helm.clone()))?;
            let crew = *person_index
                .get(&pair.crew)
                .ok_or_else(|| InvalidDataError::UnknownPerson(pair.crew.clone()))?;
            if helm == crew {
                return Err(InvalidDataError::SelfPair(pair.helm.clone()));
            }
            for (member, other) in [(helm, crew), (crew, helm)] {
                if partners[member].is_some() {
                    return Err(InvalidDataError::MultiplePairs(people[member].id.clone()));
                }
                partners[member] = Some(other);
            }
        }

        let mut series: Vec<SeriesId> = Vec::new();
        let mut series_events: Vec<Vec<usize>> = Vec::new();
        let mut event_series = Vec::with_capacity(events.len());
        for (i, e) in events.iter().enumerate() {
            let s = match series.iter().position(|id| *id == e.series) {
                Some(s) => s,
                None => {
                    series.push(e.series.clone());
                    series_events.push(Vec::new());
                    series.len() - 1
                }
            };
            series_events[s].push(i);
            event_series.push(s);
        }

        tracing::debug!(
            people = people.len(),
            events = events.len(),
            series = series.len(),
            crew_pairs = crew_pairs.len(),
            "roster built"
        );

        Ok(Roster {
            people,
            events,
            crew_pairs,
            series,
            event_series,
            series_events,
            partners,
            person_index,
            event_index,
        })
    }
}
