//! Lower bound on the objective of any completion of a partial assignment.

use crate::builder::DutyModel;
use crate::cp::{Store, Value};
use crate::eval::Score;

/// Bound plus the per-person loads it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeBound {
    /// Lower bound on the objective.
    pub score: Score,
    /// Duties already committed per person.
    pub committed: Vec<usize>,
}

/// Computes a lexicographic lower bound for the current node.
///
/// With `c[p]` the duties already committed to person `p`, `u[p]` the
/// events where `p` could still take a duty, and `T` the total number of
/// slots over `n` people, every completion satisfies
///
/// - `max >= max(max_p c[p], ceil(T / n))`
/// - `min <= min(min_p (c[p] + u[p]), floor(T' / n'))`
///
/// where `T'` and `n'` are what remains after setting aside, heaviest
/// first, every person whose committed load already exceeds the average of
/// the rest. Those people finish with at least `c[p]`, so the others share
/// at most `T - sum c[p]` slots. Then `spread >= max - min` of those.
/// Committed non-preferred duties can only grow, so they bound the second
/// term.
pub(crate) fn lower_bound(model: &DutyModel<'_>, store: &Store) -> NodeBound {
    let roster = model.roster();
    let people = roster.person_count();
    let roles = model.roles().len();

    let mut committed = vec![0usize; people];
    let mut open = vec![0usize; people];
    let mut not_preferred = 0usize;

    for e in 0..roster.event_count() {
        for (p, (c, u)) in committed.iter_mut().zip(open.iter_mut()).enumerate() {
            let mut any_free = false;
            for r in 0..roles {
                let var = model.var(p, e, r);
                match store.value(var) {
                    Value::True => {
                        *c += 1;
                        if model.is_not_preferred(var) {
                            not_preferred += 1;
                        }
                    }
                    Value::Free => any_free = true,
                    Value::False => {}
                }
            }
            if any_free {
                *u += 1;
            }
        }
    }

    if people == 0 {
        return NodeBound {
            score: Score::new(0, not_preferred),
            committed,
        };
    }

    let total = model.slot_count();
    let ceil_avg = total.div_ceil(people);

    let max_lb = committed.iter().copied().max().unwrap_or(0).max(ceil_avg);
    let min_ub = committed
        .iter()
        .zip(&open)
        .map(|(c, u)| c + u)
        .min()
        .unwrap_or(0)
        .min(residual_average(&committed, total));

    NodeBound {
        score: Score::new(max_lb.saturating_sub(min_ub), not_preferred),
        committed,
    }
}

/// Floor of the average load left for the people not already above it.
fn residual_average(committed: &[usize], total: usize) -> usize {
    let mut loads = committed.to_vec();
    loads.sort_unstable_by(|a, b| b.cmp(a));

    let mut rest_total = total;
    let mut rest_people = loads.len();
    for c in loads {
        if c * rest_people <= rest_total {
            break;
        }
        rest_total -= c;
        rest_people -= 1;
    }
    if rest_people == 0 {
        usize::MAX
    } else {
        rest_total / rest_people
    }
}
