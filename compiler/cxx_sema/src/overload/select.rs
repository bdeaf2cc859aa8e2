//! Best-candidate selection.

use super::{Candidate, Ranker};

/// Outcome of selecting among candidates. Indices refer to the slice
/// passed to [`Ranker::select_best`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Selection {
    Best(usize),
    /// The viable candidates that no other candidate beats.
    Ambiguous(Vec<usize>),
    NoViable,
}

impl Ranker<'_> {
    /// Eliminate every viable candidate that some other candidate beats.
    ///
    /// If the survivors mix ellipsis and non-ellipsis candidates, the
    /// ellipsis ones drop. A single survivor is the best candidate.
    pub fn select_best(&self, candidates: &[Candidate]) -> Selection {
        let viable: Vec<usize> = (0..candidates.len())
            .filter(|&i| candidates[i].is_viable())
            .collect();
        if viable.is_empty() {
            return Selection::NoViable;
        }

        let mut survivors: Vec<usize> = viable
            .iter()
            .copied()
            .filter(|&i| {
                !viable
                    .iter()
                    .any(|&j| j != i && self.beats(&candidates[j], &candidates[i]))
            })
            .collect();

        let mixed = survivors.iter().any(|&i| candidates[i].uses_ellipsis)
            && survivors.iter().any(|&i| !candidates[i].uses_ellipsis);
        if mixed {
            survivors.retain(|&i| !candidates[i].uses_ellipsis);
        }

        match survivors.as_slice() {
            [best] => Selection::Best(*best),
            [] => Selection::Ambiguous(viable),
            _ => {
                tracing::trace!(tied = survivors.len(), "ambiguous selection");
                Selection::Ambiguous(survivors)
            }
        }
    }
}
