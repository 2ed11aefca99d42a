//! Parallel subtree search.
//!
//! The candidates of the first open slot are the roots of disjoint
//! subtrees; each is explored by its own worker on a private copy of the
//! store. Workers share the incumbent bound, so a solution found in one
//! subtree prunes all others immediately. A leaf is re-checked against the
//! incumbent under the reporter lock before it is reported, so no reported
//! solution is ever worse than one reported earlier, but the order in which
//! equally good or improving solutions arrive depends on scheduling.

use super::config::SearchConfig;
use super::runner::{Node, Shared, Worker};
use super::types::SearchStats;
use crate::builder::DutyModel;
use crate::cp::Store;
use crate::eval::Evaluator;
use crate::report::SolutionReporter;
use rayon::prelude::*;
use std::ops::ControlFlow;
use std::sync::atomic::AtomicBool;

pub(crate) fn search<R: SolutionReporter + Send>(
    model: &DutyModel<'_>,
    evaluator: Evaluator<'_>,
    config: &SearchConfig,
    cancel: Option<&AtomicBool>,
    shared: &Shared<'_, R>,
    root: Store,
) -> (ControlFlow<()>, SearchStats) {
    let mut root_worker = Worker::new(model, evaluator, config, cancel, shared);
    let (slot, candidates) = match root_worker.expand(&root, 0, 0) {
        ControlFlow::Break(()) => return (ControlFlow::Break(()), root_worker.stats),
        ControlFlow::Continue(Node::Pruned) => {
            return (ControlFlow::Continue(()), root_worker.stats)
        }
        ControlFlow::Continue(Node::Leaf) => {
            let flow = root_worker.leaf(&root);
            return (flow, root_worker.stats);
        }
        ControlFlow::Continue(Node::Branch { slot, candidates }) => (slot, candidates),
    };
    tracing::debug!(slot, subtrees = candidates.len(), "splitting search");

    let mut stats = root_worker.stats;
    let results: Vec<(ControlFlow<()>, SearchStats)> = candidates
        .into_par_iter()
        .map(|var| {
            let mut store = root.clone();
            let mut worker = Worker::new(model, evaluator, config, cancel, shared);
            let flow = worker.branch(&mut store, var, slot, 0);
            (flow, worker.stats)
        })
        .collect();

    let mut flow = ControlFlow::Continue(());
    for (sub_flow, sub_stats) in results {
        stats += sub_stats;
        if sub_flow.is_break() {
            flow = ControlFlow::Break(());
        }
    }
    (flow, stats)
}
