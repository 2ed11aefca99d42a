use std::ops::ControlFlow;

use u_duty::builder::ConstraintBuilder;
use u_duty::eval::Score;
use u_duty::model::{CrewPair, Duty, Event, Person, Roster};
use u_duty::report::{CollectSolutions, DutySolution};
use u_duty::rules::RuleSet;
use u_duty::search::{DutySearch, SearchConfig, SolverStatus, ValueOrder};
use u_duty::InvalidDataError;

fn all_round(id: &str) -> Person {
    Person::new(id).qualified().experienced()
}

fn crew(people: usize) -> Vec<Person> {
    (0..people).map(|i| all_round(&format!("p{i}"))).collect()
}

fn races(events: usize) -> Vec<Event> {
    (0..events).map(|i| Event::new(format!("r{i}"), "club")).collect()
}

fn solve(roster: &Roster, rules: &RuleSet) -> u_duty::search::SearchResult {
    DutySearch::solve(roster, rules, &SearchConfig::default()).unwrap()
}

#[test]
fn single_all_rounder_cannot_staff_two_events() {
    let roster = Roster::builder()
        .person(all_round("veteran"))
        .person(Person::new("novice"))
        .person(Person::new("guest"))
        .events(races(2))
        .build()
        .unwrap();

    let result = solve(&roster, &RuleSet::default());
    assert_eq!(result.status, SolverStatus::Infeasible);
    assert!(result.best.is_none());

    // one boat seat: PRO and helm both need the veteran
    let one_boat = RuleSet::default().with_two_safety_boats(false);
    assert_eq!(solve(&roster, &one_boat).status, SolverStatus::Infeasible);
}

#[test]
fn three_people_staff_three_roles() {
    let roster = Roster::builder()
        .person(all_round("veteran"))
        .person(Person::new("helm").qualified())
        .person(Person::new("novice"))
        .events(races(2))
        .build()
        .unwrap();

    let rules = RuleSet::default().with_two_safety_boats(false);
    let result = solve(&roster, &rules);
    assert_eq!(result.status, SolverStatus::Optimal);

    let best = result.best.unwrap();
    assert_eq!(best.score, Score::new(0, 0));
    assert_eq!(best.duty_counts, vec![2, 2, 2]);
    for e in 0..2 {
        assert_eq!(best.assignment.calendar_row(e), [Some(0), Some(2), Some(1), None]);
    }
}

#[test]
fn four_all_rounders_share_evenly() {
    let roster = Roster::new(crew(4), races(4), vec![]).unwrap();
    let mut collect = CollectSolutions::new();
    let model = ConstraintBuilder::new(&roster, &RuleSet::default())
        .build()
        .unwrap();
    let result = DutySearch::run_with_reporter(&model, &SearchConfig::default(), &mut collect);

    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(collect.solutions.len(), 1);

    let best = result.best.unwrap();
    assert_eq!(best.spread(), 0);
    assert_eq!(best.duty_counts, vec![4; 4]);
    assert_eq!(best.assignment.calendar_row(3), [Some(0), Some(1), Some(2), Some(3)]);
}

#[test]
fn spacing_rejects_back_to_back_duties() {
    let rules = RuleSet::default().with_minimum_spacing(true);

    let pair = Roster::new(crew(2), races(6), vec![]).unwrap();
    assert_eq!(solve(&pair, &rules).status, SolverStatus::Infeasible);

    // twelve duties per four-race window, at most six people to hold them
    let six = Roster::new(crew(6), races(6), vec![]).unwrap();
    let one_boat = rules.clone().with_two_safety_boats(false);
    assert_eq!(solve(&six, &one_boat).status, SolverStatus::Infeasible);

    let unspaced = DutySearch::solve(
        &six,
        &RuleSet::default().with_two_safety_boats(false),
        &SearchConfig::default().with_value_order(ValueOrder::LeastLoaded),
    )
    .unwrap();
    assert_eq!(unspaced.status, SolverStatus::Optimal);
    assert_eq!(unspaced.score(), Some(Score::new(0, 0)));
}

#[test]
fn spacing_alternates_crews() {
    let roster = Roster::new(crew(6), races(4), vec![]).unwrap();
    let rules = RuleSet::default()
        .with_two_safety_boats(false)
        .with_minimum_spacing(true)
        .with_spacing_window(2);

    let result = solve(&roster, &rules);
    assert_eq!(result.status, SolverStatus::Optimal);

    let best = result.best.unwrap();
    assert_eq!(best.spread(), 0);
    for p in 0..6 {
        for e in 0..3 {
            assert!(!(best.assignment.is_on_duty(p, e) && best.assignment.is_on_duty(p, e + 1)));
        }
    }
    assert_eq!(best.assignment.calendar_row(1), [Some(3), Some(4), Some(5), None]);
}

#[test]
fn respected_preferences_move_load() {
    let mut people = crew(4);
    people.push(all_round("reluctant").with_preferences(false, false, false));
    let roster = Roster::new(people, races(2), vec![]).unwrap();

    // spread 1 forces the reluctant member onto one duty
    let relaxed = solve(&roster, &RuleSet::default());
    assert_eq!(relaxed.status, SolverStatus::Optimal);
    assert_eq!(relaxed.score(), Some(Score::new(1, 1)));

    let strict = solve(&roster, &RuleSet::default().with_respect_preferences(true));
    assert_eq!(strict.status, SolverStatus::Optimal);
    let best = strict.best.unwrap();
    assert_eq!(best.duty_counts, vec![2, 2, 2, 2, 0]);
    assert_eq!(best.score, Score::new(2, 0));
}

#[test]
fn unavailable_person_stays_off() {
    let roster = Roster::builder()
        .people(crew(5))
        .events(races(2))
        .unavailable("p0", "r0")
        .build()
        .unwrap();

    let result = solve(&roster, &RuleSet::default());
    assert_eq!(result.status, SolverStatus::Optimal);
    let best = result.best.unwrap();
    assert_eq!(best.assignment.duty(0, 0), None);
    assert_eq!(best.spread(), 1);
}

#[test]
fn paired_crew_share_status() {
    let roster = Roster::builder()
        .people(crew(6))
        .events(races(3))
        .crew_pair(CrewPair::new("p4", "p5"))
        .build()
        .unwrap();
    let rules = RuleSet::default().with_paired_duties(true);

    let result = solve(&roster, &rules);
    assert_eq!(result.status, SolverStatus::Optimal);
    let best = result.best.unwrap();
    for e in 0..3 {
        assert_eq!(best.assignment.is_on_duty(4, e), best.assignment.is_on_duty(5, e));
    }
    // the pair sits out one event together
    assert_eq!(best.spread(), 0);
}

#[test]
fn series_cap_limits_each_person() {
    let roster = Roster::builder()
        .people(crew(8))
        .events([Event::new("r0", "spring"), Event::new("r1", "spring")])
        .build()
        .unwrap();
    let rules = RuleSet::default().with_one_duty_per_series(true);

    let result = solve(&roster, &rules);
    assert_eq!(result.status, SolverStatus::Optimal);
    let best = result.best.unwrap();
    assert!(best.series_counts.iter().all(|row| row == &vec![1]));
    assert_eq!(best.assignment.calendar_row(1), [Some(4), Some(5), Some(6), Some(7)]);
}

#[test]
fn repeated_runs_agree() {
    let mut people = crew(5);
    people[3] = Person::new("p3").qualified();
    people.push(Person::new("p5").with_preferences(true, false, true));
    let roster = Roster::new(people, races(3), vec![]).unwrap();
    let rules = RuleSet::default();
    let model = ConstraintBuilder::new(&roster, &rules).build().unwrap();

    let mut first = CollectSolutions::new();
    let mut second = CollectSolutions::new();
    let a = DutySearch::run_with_reporter(&model, &SearchConfig::default(), &mut first);
    let b = DutySearch::run_with_reporter(&model, &SearchConfig::default(), &mut second);

    assert_eq!(a.status, SolverStatus::Optimal);
    assert_eq!(a.score(), b.score());
    assert_eq!(a.best, b.best);
    assert_eq!(first.solutions, second.solutions);
}

#[test]
fn stop_after_first_report() {
    let roster = Roster::new(crew(6), races(2), vec![]).unwrap();
    let model = ConstraintBuilder::new(&roster, &RuleSet::default())
        .build()
        .unwrap();

    let mut first: Option<DutySolution> = None;
    let mut reporter = |s: &DutySolution| {
        first = Some(s.clone());
        ControlFlow::Break(())
    };
    let result = DutySearch::run_with_reporter(&model, &SearchConfig::default(), &mut reporter);

    assert_eq!(result.status, SolverStatus::Cancelled);
    assert_eq!(result.best, first);
}

#[test]
fn invalid_roster_rejected_before_search() {
    let err = Roster::builder()
        .people(crew(3))
        .crew_pair(CrewPair::new("p0", "p1"))
        .crew_pair(CrewPair::new("p1", "p2"))
        .build()
        .unwrap_err();
    assert_eq!(err, InvalidDataError::MultiplePairs("p1".into()));

    let err = Roster::builder()
        .people(crew(1))
        .events(races(1))
        .unavailable("p0", "r9")
        .build()
        .unwrap_err();
    assert!(matches!(err, InvalidDataError::UnknownEvent { .. }));
}

#[test]
fn qualification_holds_in_every_event() {
    let roster = Roster::builder()
        .person(all_round("a"))
        .person(Person::new("b").experienced())
        .person(Person::new("c").qualified())
        .person(Person::new("d").qualified())
        .person(Person::new("e"))
        .events(races(3))
        .build()
        .unwrap();

    let result = solve(&roster, &RuleSet::default());
    assert_eq!(result.status, SolverStatus::Optimal);
    let best = result.best.unwrap();
    for e in 0..3 {
        let pro = best.assignment.holder(e, Duty::Pro).unwrap();
        assert!(roster.people()[pro].experienced_officer);
        for seat in [Duty::SafetyHelm, Duty::SafetyCrew] {
            let p = best.assignment.holder(e, seat).unwrap();
            assert!(roster.people()[p].qualified_safety_boat);
        }
    }
}

#[test]
fn lone_officer_season_is_proven_optimal() {
    // p0 is the only PRO; the other thirteen share 36 duties, 2 or 3 each
    let roster = Roster::builder()
        .person(all_round("p0"))
        .people((1..14).map(|i| Person::new(format!("p{i}")).qualified()))
        .events(races(12))
        .build()
        .unwrap();

    let result = solve(&roster, &RuleSet::default());
    assert_eq!(result.status, SolverStatus::Optimal);
    assert_eq!(result.score(), Some(Score::new(10, 0)));
    let best = result.best.unwrap();
    assert!(best.duty_counts[1..].iter().all(|&c| (2..=3).contains(&c)));
}
