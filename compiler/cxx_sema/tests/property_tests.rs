//! Property-based tests for conversion ranking and candidate selection.
//!
//! Candidates here take one argument converted by a single standard step,
//! so "better than" is a strict weak order and selection must agree with
//! pairwise comparison.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use std::cmp::Ordering;

use cxx_sema::{
    arithmetic_conversion, Candidate, ConvKind, ConversionSeq, Idx, Pool, Ranker, Selection, SymbolId, SymbolTable,
    TargetInfo,
};
use proptest::prelude::*;

const STANDARD_STEPS: &[ConvKind] = &[
    ConvKind::Identity,
    ConvKind::LvalueToRvalue,
    ConvKind::ArrayToPointer,
    ConvKind::Qualification,
    ConvKind::IntegralPromotion,
    ConvKind::FloatingPromotion,
    ConvKind::IntegralConversion,
    ConvKind::FloatingConversion,
    ConvKind::FloatingIntegral,
    ConvKind::PointerToVoid,
    ConvKind::Boolean,
];

const ARITHMETIC: &[Idx] = &[
    Idx::BOOL,
    Idx::CHAR,
    Idx::SCHAR,
    Idx::UCHAR,
    Idx::SHORT,
    Idx::USHORT,
    Idx::INT,
    Idx::UINT,
    Idx::LONG,
    Idx::ULONG,
    Idx::LLONG,
    Idx::ULLONG,
    Idx::FLOAT,
    Idx::DOUBLE,
    Idx::LDOUBLE,
];

// -- Strategies --

fn step_strategy() -> impl Strategy<Value = ConvKind> {
    prop::sample::select(STANDARD_STEPS)
}

fn arithmetic_strategy() -> impl Strategy<Value = Idx> {
    prop::sample::select(ARITHMETIC)
}

/// A one-argument candidate whose argument converts by `step`.
fn candidate(index: usize, step: ConvKind) -> Candidate {
    #[allow(clippy::cast_possible_truncation, reason = "a handful of candidates")]
    let function = SymbolId::from_raw(index as u32 + 1);
    Candidate::with_convs(function, [ConversionSeq::single(step)])
}

fn candidates(steps: &[ConvKind]) -> Vec<Candidate> {
    steps.iter().enumerate().map(|(i, &s)| candidate(i, s)).collect()
}

// -- Properties --

proptest! {
    #[test]
    fn beats_is_irreflexive(step in step_strategy()) {
        let symbols = SymbolTable::new();
        let ranker = Ranker::new(&symbols, &TargetInfo::default());
        let a = candidate(0, step);
        prop_assert!(!ranker.beats(&a, &a));
    }

    #[test]
    fn comparison_is_antisymmetric(x in step_strategy(), y in step_strategy()) {
        let symbols = SymbolTable::new();
        let ranker = Ranker::new(&symbols, &TargetInfo::default());
        let (a, b) = (ConversionSeq::single(x), ConversionSeq::single(y));
        prop_assert_eq!(
            ranker.compare_conversions(&a, &b),
            ranker.compare_conversions(&b, &a).reverse()
        );
    }

    #[test]
    fn beats_is_transitive(x in step_strategy(), y in step_strategy(), z in step_strategy()) {
        let symbols = SymbolTable::new();
        let ranker = Ranker::new(&symbols, &TargetInfo::default());
        let (a, b, c) = (candidate(0, x), candidate(1, y), candidate(2, z));
        if ranker.beats(&a, &b) && ranker.beats(&b, &c) {
            prop_assert!(ranker.beats(&a, &c));
        }
    }

    #[test]
    fn best_candidate_beats_every_other(steps in prop::collection::vec(step_strategy(), 1..6)) {
        let symbols = SymbolTable::new();
        let ranker = Ranker::new(&symbols, &TargetInfo::default());
        let set = candidates(&steps);
        match ranker.select_best(&set) {
            Selection::Best(best) => {
                for (i, other) in set.iter().enumerate() {
                    if i != best {
                        prop_assert!(ranker.beats(&set[best], other));
                    }
                }
            }
            Selection::Ambiguous(tied) => {
                prop_assert!(tied.len() > 1);
                for &i in &tied {
                    for &j in &tied {
                        prop_assert_eq!(ranker.compare_candidates(&set[i], &set[j]), Ordering::Equal);
                    }
                }
            }
            Selection::NoViable => prop_assert!(false, "every candidate is viable"),
        }
    }

    #[test]
    fn beats_is_asymmetric_over_several_arguments(
        x in prop::collection::vec(step_strategy(), 1..=3),
        y in prop::collection::vec(step_strategy(), 1..=3),
    ) {
        let symbols = SymbolTable::new();
        let ranker = Ranker::new(&symbols, &TargetInfo::default());
        let n = x.len().min(y.len());
        let a = Candidate::with_convs(SymbolId::from_raw(1), x[..n].iter().map(|&s| ConversionSeq::single(s)));
        let b = Candidate::with_convs(SymbolId::from_raw(2), y[..n].iter().map(|&s| ConversionSeq::single(s)));
        prop_assert!(!(ranker.beats(&a, &b) && ranker.beats(&b, &a)));
        prop_assert_eq!(ranker.compare_candidates(&a, &b), ranker.compare_candidates(&b, &a).reverse());
    }

    #[test]
    fn selection_is_idempotent(steps in prop::collection::vec(step_strategy(), 1..=5)) {
        let symbols = SymbolTable::new();
        let ranker = Ranker::new(&symbols, &TargetInfo::default());
        let set = candidates(&steps);
        let first = ranker.select_best(&set);
        prop_assert_eq!(ranker.select_best(&set), first.clone());

        // Selecting again among the survivors keeps all of them.
        let survivors: Vec<usize> = match first {
            Selection::Best(i) => vec![i],
            Selection::Ambiguous(tied) => tied,
            Selection::NoViable => Vec::new(),
        };
        let narrowed: Vec<Candidate> = survivors.iter().map(|&i| set[i].clone()).collect();
        let again = ranker.select_best(&narrowed);
        match survivors.len() {
            1 => prop_assert_eq!(again, Selection::Best(0)),
            n => prop_assert_eq!(again, Selection::Ambiguous((0..n).collect())),
        }
    }

    #[test]
    fn selection_ignores_candidate_order(steps in prop::collection::vec(step_strategy(), 1..6)) {
        let symbols = SymbolTable::new();
        let ranker = Ranker::new(&symbols, &TargetInfo::default());
        let forward = candidates(&steps);
        let mut backward = forward.clone();
        backward.reverse();
        let winner = |set: &[Candidate], selection: Selection| match selection {
            Selection::Best(i) => Some(set[i].function),
            Selection::Ambiguous(_) | Selection::NoViable => None,
        };
        let a = winner(&forward, ranker.select_best(&forward));
        let b = winner(&backward, ranker.select_best(&backward));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn invalid_sequences_are_never_selected(steps in prop::collection::vec(step_strategy(), 0..4)) {
        let symbols = SymbolTable::new();
        let ranker = Ranker::new(&symbols, &TargetInfo::default());
        let mut set = candidates(&steps);
        set.push(Candidate::with_convs(SymbolId::from_raw(99), [ConversionSeq::invalid()]));
        let invalid = set.len() - 1;
        match ranker.select_best(&set) {
            Selection::Best(i) => prop_assert_ne!(i, invalid),
            Selection::Ambiguous(tied) => prop_assert!(!tied.contains(&invalid)),
            Selection::NoViable => prop_assert!(steps.is_empty()),
        }
    }

    #[test]
    fn standard_beats_user_beats_ellipsis(step in step_strategy()) {
        let symbols = SymbolTable::new();
        let ranker = Ranker::new(&symbols, &TargetInfo::default());
        let standard = ConversionSeq::single(step);
        let user = ConversionSeq::user_defined(&ConversionSeq::identity(), None, ConversionSeq::single(step));
        let ellipsis = ConversionSeq::ellipsis();
        prop_assert_eq!(ranker.compare_conversions(&standard, &user), Ordering::Less);
        prop_assert_eq!(ranker.compare_conversions(&user, &ellipsis), Ordering::Less);
        prop_assert_eq!(ranker.compare_conversions(&standard, &ellipsis), Ordering::Less);
    }

    #[test]
    fn arithmetic_conversion_is_total(from in arithmetic_strategy(), to in arithmetic_strategy()) {
        let pool = Pool::new();
        let symbols = SymbolTable::new();
        let kind = arithmetic_conversion(&pool, &symbols, &TargetInfo::default(), from, to);
        prop_assert!(kind.is_some());
        prop_assert_eq!(kind == Some(ConvKind::Identity), from == to);
        if to == Idx::BOOL && from != Idx::BOOL {
            prop_assert_eq!(kind, Some(ConvKind::Boolean));
        }
    }
}
