//! Pairwise comparison of conversion sequences and candidates.
//!
//! Every comparison returns an [`Ordering`] where `Less` means the left
//! operand is better. `Equal` covers both "equally good" and
//! "indistinguishable".

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use super::Candidate;
use crate::conversion::{ConvKind, ConversionSeq, RefBinding, SeqClass};
use crate::{RefKind, SymbolId, SymbolTable, TargetInfo};

/// Compares conversion sequences and candidates for one call.
pub struct Ranker<'a> {
    symbols: &'a SymbolTable,
    prefer_weak: bool,
    /// `(a, b)`: template `a` is more specialized than template `b`.
    more_specialized: FxHashSet<(SymbolId, SymbolId)>,
}

impl<'a> Ranker<'a> {
    pub fn new(symbols: &'a SymbolTable, target: &TargetInfo) -> Self {
        Ranker {
            symbols,
            prefer_weak: target.prefer_same_width_integral,
            more_specialized: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn with_partial_order(mut self, more_specialized: FxHashSet<(SymbolId, SymbolId)>) -> Self {
        self.more_specialized = more_specialized;
        self
    }

    /// Compare two sequences converting the same argument.
    pub fn compare_conversions(&self, a: &ConversionSeq, b: &ConversionSeq) -> Ordering {
        let by_class = a.class().cmp(&b.class());
        if by_class != Ordering::Equal {
            return by_class;
        }
        match a.class() {
            SeqClass::Ellipsis => Ordering::Equal,
            SeqClass::User => match (&a.user, &b.user) {
                (Some(ua), Some(ub)) if ua.function == ub.function => {
                    self.compare_standard(&ua.second, &ub.second)
                }
                _ => Ordering::Equal,
            },
            SeqClass::Standard => self.compare_standard(a, b),
        }
    }

    fn compare_standard(&self, a: &ConversionSeq, b: &ConversionSeq) -> Ordering {
        let (sa, sb) = (a.significant_steps(), b.significant_steps());
        if is_proper_subsequence(&sa, &sb) {
            return Ordering::Less;
        }
        if is_proper_subsequence(&sb, &sa) {
            return Ordering::Greater;
        }

        let by_rank = a.rank().cmp(&b.rank());
        if by_rank != Ordering::Equal {
            return by_rank;
        }

        let by_binding = self.compare_bindings(a, b);
        if by_binding != Ordering::Equal {
            return by_binding;
        }

        if let (Some(qa), Some(qb)) = (a.qual_step, b.qual_step) {
            if qa.similar == qb.similar && qa.quals != qb.quals {
                if qa.quals.fewer_than(qb.quals) {
                    return Ordering::Less;
                }
                if qb.quals.fewer_than(qa.quals) {
                    return Ordering::Greater;
                }
            }
        }

        let by_class_step = self.compare_class_steps(a, b);
        if by_class_step != Ordering::Equal {
            return by_class_step;
        }

        if self.prefer_weak {
            let weak = |s: &ConversionSeq| s.contains(ConvKind::IntegralConversionWeak);
            let plain = |s: &ConversionSeq| s.contains(ConvKind::IntegralConversion);
            if weak(a) && plain(b) && !weak(b) {
                return Ordering::Less;
            }
            if weak(b) && plain(a) && !weak(a) {
                return Ordering::Greater;
            }
        }

        sa.len().cmp(&sb.len())
    }

    fn compare_bindings(&self, a: &ConversionSeq, b: &ConversionSeq) -> Ordering {
        let (Some(ra), Some(rb)) = (a.binding, b.binding) else {
            return Ordering::Equal;
        };
        if !ra.implicit_object && !rb.implicit_object {
            let rvalue_to_rvalue = |r: &RefBinding| r.kind == RefKind::Rvalue && r.binds_rvalue;
            if rvalue_to_rvalue(&ra) && rb.kind == RefKind::Lvalue && rb.binds_rvalue {
                return Ordering::Less;
            }
            if rvalue_to_rvalue(&rb) && ra.kind == RefKind::Lvalue && ra.binds_rvalue {
                return Ordering::Greater;
            }
        }
        if ra.referee == rb.referee {
            if ra.referee_quals.fewer_than(rb.referee_quals) {
                return Ordering::Less;
            }
            if rb.referee_quals.fewer_than(ra.referee_quals) {
                return Ordering::Greater;
            }
        }
        Ordering::Equal
    }

    /// Pointer-to-void against pointer-to-base, then class distance.
    fn compare_class_steps(&self, a: &ConversionSeq, b: &ConversionSeq) -> Ordering {
        let (Some(ca), Some(cb)) = (a.class_step, b.class_step) else {
            return Ordering::Equal;
        };
        match (ca.to, cb.to) {
            // D* -> B* beats D* -> void*.
            (Some(_), None) if ca.from == cb.from => Ordering::Less,
            (None, Some(_)) if ca.from == cb.from => Ordering::Greater,
            // B* -> void* beats D* -> void* when B is a base of D.
            (None, None) => {
                if self.symbols.is_base_of(ca.from, cb.from) {
                    Ordering::Less
                } else if self.symbols.is_base_of(cb.from, ca.from) {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            }
            (Some(ta), Some(tb)) if ca.from == cb.from || ta == tb => ca.distance.cmp(&cb.distance),
            _ => Ordering::Equal,
        }
    }

    /// Compare two candidates over all arguments, then by tie-breakers.
    ///
    /// `Less` when `a` is better, `Greater` when `b` is, `Equal` when
    /// neither is better.
    pub fn compare_candidates(&self, a: &Candidate, b: &Candidate) -> Ordering {
        let mut a_better = false;
        let mut b_better = false;
        let objects = match (&a.object, &b.object) {
            (Some(oa), Some(ob)) => Some((oa, ob)),
            _ => None,
        };
        for (ca, cb) in a.convs.iter().zip(&b.convs).chain(objects) {
            match self.compare_conversions(ca, cb) {
                Ordering::Less => a_better = true,
                Ordering::Greater => b_better = true,
                Ordering::Equal => {}
            }
        }
        match (a_better, b_better) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => Ordering::Equal,
            (false, false) => self.tie_break(a, b),
        }
    }

    /// `a` is strictly better than `b`.
    #[inline]
    pub fn beats(&self, a: &Candidate, b: &Candidate) -> bool {
        self.compare_candidates(a, b) == Ordering::Less
    }

    fn tie_break(&self, a: &Candidate, b: &Candidate) -> Ordering {
        match (a.template_origin, b.template_origin) {
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(ta), Some(tb)) => {
                if self.more_specialized.contains(&(ta, tb)) {
                    return Ordering::Less;
                }
                if self.more_specialized.contains(&(tb, ta)) {
                    return Ordering::Greater;
                }
                a.template_param_count
                    .cmp(&b.template_param_count)
                    .then(a.residuals.cmp(&b.residuals))
            }
            (None, None) => Ordering::Equal,
        }
    }
}

/// `short` is a proper subsequence of `long`.
fn is_proper_subsequence(short: &[ConvKind], long: &[ConvKind]) -> bool {
    if short.len() >= long.len() {
        return false;
    }
    let mut rest = long.iter();
    short.iter().all(|k| rest.any(|l| l == k))
}
