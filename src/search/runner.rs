//! Branch-and-bound execution loop.

use super::bound::lower_bound;
use super::config::{SearchConfig, ValueOrder};
use super::types::{SearchStats, SolverStatus};
use crate::builder::{ConstraintBuilder, DutyModel};
use crate::cp::{Store, VarId};
use crate::error::InvalidDataError;
use crate::eval::{Evaluator, Score};
use crate::model::{Assignment, Roster};
use crate::report::{DutySolution, NoopReporter, SolutionReporter};
use crate::rules::RuleSet;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Result of a duty search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// How the search ended.
    pub status: SolverStatus,

    /// The best solution found, if any. With tie enumeration this is the
    /// first solution reported at the final score.
    pub best: Option<DutySolution>,

    /// Number of solutions handed to the reporter.
    pub solutions: usize,

    /// Tree statistics.
    pub stats: SearchStats,
}

impl SearchResult {
    /// Score of the best solution.
    pub fn score(&self) -> Option<Score> {
        self.best.as_ref().map(|s| s.score)
    }
}

/// Executes the duty search.
///
/// Slots are filled chronologically, then in role order, each from the
/// candidates its constraints still allow. Every decision is propagated to
/// a fixpoint; a node whose lower bound cannot beat the incumbent is pruned.
/// Improving leaves are reported in traversal order.
pub struct DutySearch;

impl DutySearch {
    /// Builds the model for `roster` under `rules` and searches it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDataError`] if the rule set is invalid.
    pub fn solve(
        roster: &Roster,
        rules: &RuleSet,
        config: &SearchConfig,
    ) -> Result<SearchResult, InvalidDataError> {
        let model = ConstraintBuilder::new(roster, rules).build()?;
        Ok(Self::run(&model, config))
    }

    /// Searches without a reporter.
    pub fn run(model: &DutyModel<'_>, config: &SearchConfig) -> SearchResult {
        Self::run_with_reporter(model, config, &mut NoopReporter)
    }

    /// Searches, handing every improving solution to `reporter`.
    pub fn run_with_reporter<R: SolutionReporter + Send>(
        model: &DutyModel<'_>,
        config: &SearchConfig,
        reporter: &mut R,
    ) -> SearchResult {
        Self::run_with_cancel(model, config, reporter, None)
    }

    /// Searches with an optional cancellation token.
    ///
    /// The token is polled once per node; raising it ends the search with
    /// [`SolverStatus::Cancelled`] and the best solution found so far.
    pub fn run_with_cancel<R: SolutionReporter + Send>(
        model: &DutyModel<'_>,
        config: &SearchConfig,
        reporter: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SearchResult {
        if let Err(reason) = config.validate() {
            tracing::warn!(%reason, "running sequentially");
        }

        let roster = model.roster();
        tracing::info!(
            people = roster.person_count(),
            events = roster.event_count(),
            vars = model.cp().var_count(),
            constraints = model.cp().constraint_count(),
            "duty search started"
        );

        let mut store = match Store::new(model.cp()) {
            Ok(store) => store,
            Err(conflict) => {
                tracing::info!(constraint = ?conflict.constraint, "infeasible at root");
                return SearchResult {
                    status: SolverStatus::Infeasible,
                    best: None,
                    solutions: 0,
                    stats: SearchStats {
                        nodes: 1,
                        ..SearchStats::default()
                    },
                };
            }
        };

        let evaluator = Evaluator::new(roster);
        let shared = Shared::new(reporter);
        let cancel = cancel.as_deref();

        let (flow, stats) = if config.parallel {
            run_parallel(model, evaluator, config, cancel, &shared, store)
        } else {
            let mut worker = Worker::new(model, evaluator, config, cancel, &shared);
            let flow = worker.dfs(&mut store, 0, 0);
            (flow, worker.stats)
        };

        let incumbent = shared.into_incumbent();
        let status = match incumbent.halt {
            Some(status) => status,
            None if flow.is_break() => SolverStatus::Cancelled,
            None if incumbent.best.is_some() => SolverStatus::Optimal,
            None => SolverStatus::Infeasible,
        };

        tracing::info!(
            %status,
            solutions = incumbent.reported,
            nodes = stats.nodes,
            failures = stats.failures,
            pruned = stats.pruned_by_bound,
            "duty search finished"
        );

        SearchResult {
            status,
            best: incumbent.best,
            solutions: incumbent.reported,
            stats,
        }
    }
}

#[cfg(feature = "parallel")]
fn run_parallel<R: SolutionReporter + Send>(
    model: &DutyModel<'_>,
    evaluator: Evaluator<'_>,
    config: &SearchConfig,
    cancel: Option<&AtomicBool>,
    shared: &Shared<'_, R>,
    store: Store,
) -> (ControlFlow<()>, SearchStats) {
    super::parallel::search(model, evaluator, config, cancel, shared, store)
}

#[cfg(not(feature = "parallel"))]
fn run_parallel<R: SolutionReporter + Send>(
    model: &DutyModel<'_>,
    evaluator: Evaluator<'_>,
    config: &SearchConfig,
    cancel: Option<&AtomicBool>,
    shared: &Shared<'_, R>,
    mut store: Store,
) -> (ControlFlow<()>, SearchStats) {
    let mut worker = Worker::new(model, evaluator, config, cancel, shared);
    let flow = worker.dfs(&mut store, 0, 0);
    (flow, worker.stats)
}

/// Incumbent and reporter, guarded together so a report and the incumbent
/// update it announces are never interleaved with another worker's.
pub(crate) struct Incumbent<'r, R> {
    reporter: &'r mut R,
    best: Option<DutySolution>,
    reported: usize,
    /// Set once the reporter stops the search or the solution limit is hit.
    halt: Option<SolverStatus>,
}

/// State shared by every worker of one search.
pub(crate) struct Shared<'r, R> {
    incumbent: Mutex<Incumbent<'r, R>>,
    /// Objective of the incumbent, `u64::MAX` while there is none. Read
    /// without the lock for pruning; only lowered under it.
    bound: AtomicU64,
    stop: AtomicBool,
}

impl<'r, R: SolutionReporter> Shared<'r, R> {
    fn new(reporter: &'r mut R) -> Self {
        Self {
            incumbent: Mutex::new(Incumbent {
                reporter,
                best: None,
                reported: 0,
                halt: None,
            }),
            bound: AtomicU64::new(u64::MAX),
            stop: AtomicBool::new(false),
        }
    }

    fn into_incumbent(self) -> Incumbent<'r, R> {
        self.incumbent
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a node bounded below by `objective` can still be reported.
    fn admits(&self, objective: u64, ties: bool) -> bool {
        let best = self.bound.load(Ordering::Acquire);
        objective < best || (ties && objective == best)
    }

    /// Offers a complete solution. Reports it if it still beats (or, with
    /// ties, matches) the incumbent once the lock is held.
    fn offer(&self, solution: DutySolution, config: &SearchConfig) -> ControlFlow<()> {
        let mut guard = self.incumbent.lock().unwrap_or_else(PoisonError::into_inner);
        let incumbent = &mut *guard;
        if incumbent.halt.is_some() {
            return ControlFlow::Break(());
        }

        let improves = match &incumbent.best {
            None => true,
            Some(best) => {
                solution.score < best.score || (config.enumerate_ties && solution.score == best.score)
            }
        };
        if !improves {
            return ControlFlow::Continue(());
        }

        self.bound.fetch_min(solution.objective, Ordering::AcqRel);
        incumbent.reported += 1;
        tracing::debug!(
            score = %solution.score,
            objective = solution.objective,
            reported = incumbent.reported,
            "new incumbent"
        );

        let flow = incumbent.reporter.on_solution(&solution);
        if incumbent
            .best
            .as_ref()
            .is_none_or(|best| solution.score < best.score)
        {
            incumbent.best = Some(solution);
        }

        if flow.is_break() {
            incumbent.halt = Some(SolverStatus::Cancelled);
        } else if config.solution_limit > 0 && incumbent.reported >= config.solution_limit {
            incumbent.halt = Some(SolverStatus::Feasible);
        }

        if incumbent.halt.is_some() {
            self.stop.store(true, Ordering::Release);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// What to do at a node after bounding.
pub(crate) enum Node {
    Pruned,
    Leaf,
    Branch { slot: usize, candidates: Vec<VarId> },
}

/// Depth-first explorer of one subtree.
pub(crate) struct Worker<'s, 'r, R> {
    model: &'s DutyModel<'s>,
    evaluator: Evaluator<'s>,
    config: &'s SearchConfig,
    cancel: Option<&'s AtomicBool>,
    shared: &'s Shared<'r, R>,
    pub(crate) stats: SearchStats,
}

impl<'s, 'r, R: SolutionReporter> Worker<'s, 'r, R> {
    pub(crate) fn new(
        model: &'s DutyModel<'s>,
        evaluator: Evaluator<'s>,
        config: &'s SearchConfig,
        cancel: Option<&'s AtomicBool>,
        shared: &'s Shared<'r, R>,
    ) -> Self {
        Self {
            model,
            evaluator,
            config,
            cancel,
            shared,
            stats: SearchStats::default(),
        }
    }

    fn interrupted(&self) -> bool {
        self.shared.stop.load(Ordering::Acquire)
            || self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Enters a node: polls for cancellation, bounds, and picks the next
    /// open slot at or after `from`.
    pub(crate) fn expand(&mut self, store: &Store, from: usize, depth: usize) -> ControlFlow<(), Node> {
        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        if self.interrupted() {
            return ControlFlow::Break(());
        }

        let bound = lower_bound(self.model, store);
        let objective = self.evaluator.objective(bound.score);
        if !self.shared.admits(objective, self.config.enumerate_ties) {
            self.stats.pruned_by_bound += 1;
            tracing::trace!(depth, bound = %bound.score, "pruned");
            return ControlFlow::Continue(Node::Pruned);
        }

        let Some(slot) = self.next_open_slot(store, from) else {
            return ControlFlow::Continue(Node::Leaf);
        };

        let range = self.model.slot_vars(slot);
        let first = range.start;
        let mut candidates: Vec<VarId> = range.filter(|&v| store.value(v).is_free()).collect();
        if self.config.value_order == ValueOrder::LeastLoaded {
            candidates.sort_by_key(|&v| bound.committed[v - first]);
        }
        ControlFlow::Continue(Node::Branch { slot, candidates })
    }

    /// Explores the subtree under the current store.
    pub(crate) fn dfs(&mut self, store: &mut Store, from: usize, depth: usize) -> ControlFlow<()> {
        let (slot, candidates) = match self.expand(store, from, depth) {
            ControlFlow::Break(()) => return ControlFlow::Break(()),
            ControlFlow::Continue(Node::Pruned) => return ControlFlow::Continue(()),
            ControlFlow::Continue(Node::Leaf) => return self.leaf(store),
            ControlFlow::Continue(Node::Branch { slot, candidates }) => (slot, candidates),
        };

        for var in candidates {
            let flow = self.branch(store, var, slot, depth);
            if flow.is_break() {
                return flow;
            }
        }
        ControlFlow::Continue(())
    }

    /// Gives `slot` to the holder of `var`, explores, and backtracks.
    pub(crate) fn branch(
        &mut self,
        store: &mut Store,
        var: VarId,
        slot: usize,
        depth: usize,
    ) -> ControlFlow<()> {
        let mark = store.mark();
        let flow = match store.assign(self.model.cp(), var, true) {
            Ok(()) => self.dfs(store, slot + 1, depth + 1),
            Err(_) => {
                self.stats.failures += 1;
                ControlFlow::Continue(())
            }
        };
        store.undo(mark);
        flow
    }

    pub(crate) fn leaf(&mut self, store: &Store) -> ControlFlow<()> {
        self.stats.leaves += 1;
        let roster = self.model.roster();
        let mut assignment = Assignment::new(roster.person_count(), roster.event_count());
        for (var, value) in store.values().iter().enumerate() {
            if value.is_true() {
                let (person, event, duty) = self.model.decode(var);
                assignment.set(person, event, Some(duty));
            }
        }
        let solution = DutySolution::new(roster, &self.evaluator, assignment);
        self.shared.offer(solution, self.config)
    }

    /// First slot at or after `from` without a holder. Slots before `from`
    /// are filled; later ones may have been filled by propagation.
    fn next_open_slot(&self, store: &Store, from: usize) -> Option<usize> {
        (from..self.model.slot_count())
            .find(|&slot| !self.model.slot_vars(slot).any(|v| store.value(v).is_true()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Duty, Event, Person};
    use crate::report::CollectSolutions;

    fn crew(people: usize, events: usize) -> Roster {
        Roster::builder()
            .people((0..people).map(|i| Person::new(format!("p{i}")).qualified().experienced()))
            .events((0..events).map(|i| Event::new(format!("e{i}"), "s")))
            .build()
            .unwrap()
    }

    fn model(roster: &Roster) -> DutyModel<'_> {
        ConstraintBuilder::new(roster, &RuleSet::default())
            .build()
            .unwrap()
    }

    #[test]
    fn test_exact_fit() {
        let roster = crew(4, 1);
        let result = DutySearch::run(&model(&roster), &SearchConfig::default());
        assert_eq!(result.status, SolverStatus::Optimal);
        assert_eq!(result.solutions, 1);

        let best = result.best.unwrap();
        assert_eq!(best.score, Score::new(0, 0));
        assert_eq!(best.assignment.calendar_row(0), [Some(0), Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_infeasible() {
        let roster = crew(3, 1);
        let result = DutySearch::run(&model(&roster), &SearchConfig::default());
        assert_eq!(result.status, SolverStatus::Infeasible);
        assert!(result.best.is_none());
        assert_eq!(result.solutions, 0);
        assert!(result.stats.failures > 0);
    }

    #[test]
    fn test_no_people() {
        let roster = crew(0, 2);
        let result = DutySearch::run(&model(&roster), &SearchConfig::default());
        assert_eq!(result.status, SolverStatus::Infeasible);
        assert_eq!(result.stats.nodes, 1);
    }

    #[test]
    fn test_no_events() {
        let roster = crew(2, 0);
        let result = DutySearch::run(&model(&roster), &SearchConfig::default());
        assert_eq!(result.status, SolverStatus::Optimal);
        let best = result.best.unwrap();
        assert_eq!(best.score, Score::new(0, 0));
        assert_eq!(best.duty_counts, vec![0, 0]);
    }

    #[test]
    fn test_reports_improve() {
        // 8 slots over 6 people: the first leaf loads p0..p3 twice
        let roster = crew(6, 2);
        let mut collect = CollectSolutions::new();
        let result =
            DutySearch::run_with_reporter(&model(&roster), &SearchConfig::default(), &mut collect);

        assert_eq!(result.status, SolverStatus::Optimal);
        assert_eq!(result.score(), Some(Score::new(1, 0)));
        assert_eq!(collect.solutions.first().map(|s| s.score), Some(Score::new(2, 0)));
        assert_eq!(collect.solutions.len(), result.solutions);
        for pair in collect.solutions.windows(2) {
            assert!(pair[1].score < pair[0].score);
        }
        assert_eq!(collect.solutions.last().map(|s| s.score), result.score());
    }

    #[test]
    fn test_least_loaded_first_leaf_optimal() {
        let roster = crew(6, 2);
        let config = SearchConfig::default().with_value_order(ValueOrder::LeastLoaded);
        let result = DutySearch::run(&model(&roster), &config);

        assert_eq!(result.status, SolverStatus::Optimal);
        assert_eq!(result.solutions, 1);
        let best = result.best.unwrap();
        assert_eq!(best.score, Score::new(1, 0));
        assert_eq!(best.assignment.calendar_row(1), [Some(4), Some(5), Some(0), Some(1)]);
    }

    #[test]
    fn test_enumerate_ties() {
        // one event, five people: every staffing leaves someone idle
        let roster = crew(5, 1);
        let config = SearchConfig::default().with_enumerate_ties(true);
        let result = DutySearch::run(&model(&roster), &config);
        assert_eq!(result.status, SolverStatus::Optimal);
        assert_eq!(result.solutions, 5 * 4 * 3 * 2);

        let best = result.best.unwrap();
        assert_eq!(best.assignment.calendar_row(0), [Some(0), Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_solution_limit() {
        let roster = crew(5, 1);
        let config = SearchConfig::default()
            .with_enumerate_ties(true)
            .with_solution_limit(10);
        let result = DutySearch::run(&model(&roster), &config);
        assert_eq!(result.status, SolverStatus::Feasible);
        assert_eq!(result.solutions, 10);
        assert!(result.best.is_some());
    }

    #[test]
    fn test_reporter_stop() {
        let roster = crew(6, 2);
        let mut calls = 0;
        let mut stop_first = |_: &DutySolution| {
            calls += 1;
            ControlFlow::Break(())
        };
        let result =
            DutySearch::run_with_reporter(&model(&roster), &SearchConfig::default(), &mut stop_first);
        assert_eq!(calls, 1);
        assert_eq!(result.status, SolverStatus::Cancelled);
        assert_eq!(result.solutions, 1);
        assert_eq!(result.score(), Some(Score::new(2, 0)));
    }

    #[test]
    fn test_cancel_flag() {
        let roster = crew(6, 2);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = DutySearch::run_with_cancel(
            &model(&roster),
            &SearchConfig::default(),
            &mut NoopReporter,
            Some(cancel),
        );
        assert_eq!(result.status, SolverStatus::Cancelled);
        assert!(result.best.is_none());
        assert_eq!(result.stats.nodes, 1);
    }

    #[test]
    fn test_deterministic() {
        let roster = crew(6, 2);
        let m = model(&roster);
        let mut first = CollectSolutions::new();
        let mut second = CollectSolutions::new();
        DutySearch::run_with_reporter(&m, &SearchConfig::default(), &mut first);
        DutySearch::run_with_reporter(&m, &SearchConfig::default(), &mut second);
        assert_eq!(first.solutions, second.solutions);
    }

    #[test]
    fn test_qualifications_respected() {
        let roster = Roster::builder()
            .person(Person::new("officer").experienced())
            .person(Person::new("helper"))
            .person(Person::new("helm").qualified())
            .person(Person::new("crew").qualified())
            .event(Event::new("e0", "s"))
            .build()
            .unwrap();
        let result = DutySearch::run(&model(&roster), &SearchConfig::default());
        let best = result.best.unwrap();
        assert_eq!(best.assignment.duty(0, 0), Some(Duty::Pro));
        assert_eq!(best.assignment.duty(1, 0), Some(Duty::Aro));
        assert!(best.assignment.duty(2, 0).is_some_and(Duty::is_safety_boat));
        assert!(best.assignment.duty(3, 0).is_some_and(Duty::is_safety_boat));
    }

    #[test]
    fn test_solve() {
        let roster = crew(4, 4);
        let result = DutySearch::solve(&roster, &RuleSet::default(), &SearchConfig::default()).unwrap();
        assert_eq!(result.status, SolverStatus::Optimal);
        assert_eq!(result.score(), Some(Score::new(0, 0)));

        let bad = RuleSet::default().with_spacing_window(0);
        assert!(DutySearch::solve(&roster, &bad, &SearchConfig::default()).is_err());
    }

    #[test]
    fn test_lone_officer_proven_optimal() {
        // p0 holds every PRO; the other seven share 18 duties, 2 or 3 each
        let roster = Roster::builder()
            .person(Person::new("p0").qualified().experienced())
            .people((1..8).map(|i| Person::new(format!("p{i}")).qualified()))
            .events((0..6).map(|i| Event::new(format!("e{i}"), "s")))
            .build()
            .unwrap();

        for order in [ValueOrder::Declaration, ValueOrder::LeastLoaded] {
            let config = SearchConfig::default().with_value_order(order);
            let result = DutySearch::run(&model(&roster), &config);
            assert_eq!(result.status, SolverStatus::Optimal);
            assert_eq!(result.score(), Some(Score::new(4, 0)));
            assert_eq!(result.best.unwrap().duty_counts[0], 6);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let roster = crew(6, 3);
        let m = model(&roster);
        let sequential = DutySearch::run(&m, &SearchConfig::default());
        let parallel = DutySearch::run(&m, &SearchConfig::default().with_parallel(true));
        assert_eq!(parallel.status, SolverStatus::Optimal);
        assert_eq!(parallel.score(), sequential.score());
    }
}
