//! User-defined conversions.
//!
//! A user-defined conversion calls exactly one converting constructor of
//! the target class or one conversion function of the source class. Each
//! candidate has two legs computed with standard conversions only: the
//! argument (or implicit object) leg into the function, and the result leg
//! from the function's result to the target. The ranker picks the unique
//! best candidate over both legs.

use rustc_hash::FxHashSet;

use crate::context::Guard;
use crate::conversion::{ConvContext, ConversionSeq};
use crate::expr::Arg;
use crate::overload::{Candidate, Selection};
use crate::{Idx, Sema, SymbolFlags, SymbolId, UserConvFlags};

/// Outcome of a user-defined conversion search.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum UserConversion {
    Found(UserConvResult),
    /// Several conversions are equally good; no conversion applies.
    Ambiguous(Vec<SymbolId>),
    None,
}

/// The selected conversion and its two standard legs.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct UserConvResult {
    pub function: SymbolId,
    /// Argument to the constructor parameter, or argument to the implicit
    /// object parameter of the conversion function.
    pub first: ConversionSeq,
    /// Function result to the target type.
    pub second: ConversionSeq,
}

impl Sema<'_> {
    /// Find the user-defined conversion from `arg` to `target`.
    ///
    /// `hint` restricts the search to one known function. Fails closed
    /// (`None`) when nested too deeply.
    #[tracing::instrument(level = "debug", skip_all, fields(target = ?target, source = ?arg.ty))]
    pub fn find_user_conversion(
        &mut self,
        flags: UserConvFlags,
        target: Idx,
        arg: &Arg,
        hint: Option<SymbolId>,
    ) -> UserConversion {
        self.guarded(Guard::UserConversion, |this| {
            this.search_user_conversions(flags, target, arg, hint)
        })
        .unwrap_or(UserConversion::None)
    }

    fn search_user_conversions(
        &mut self,
        flags: UserConvFlags,
        target: Idx,
        arg: &Arg,
        hint: Option<SymbolId>,
    ) -> UserConversion {
        let mut candidates = Vec::new();
        if flags.contains(UserConvFlags::CONSTRUCTORS) {
            let target_class = self.pool.class_of(self.pool.non_reference(target));
            if let Some(class) = target_class {
                self.constructor_candidates(class, flags, target, arg, hint, &mut candidates);
            }
        }
        if flags.contains(UserConvFlags::CONVERSION_FUNCTIONS) {
            if let Some(class) = self.pool.class_of(arg.ty) {
                self.conversion_function_candidates(class, flags, target, arg, hint, &mut candidates);
            }
        }

        match self.ranker().select_best(&candidates) {
            Selection::Best(best) => {
                let mut winner = candidates.swap_remove(best);
                let second = winner.convs.pop().unwrap_or_else(ConversionSeq::invalid);
                let first = winner.convs.pop().unwrap_or_else(ConversionSeq::invalid);
                tracing::trace!(function = ?winner.function, %first, %second, "user conversion");
                UserConversion::Found(UserConvResult {
                    function: winner.function,
                    first,
                    second,
                })
            }
            Selection::Ambiguous(tied) => {
                UserConversion::Ambiguous(tied.iter().map(|&i| candidates[i].function).collect())
            }
            Selection::NoViable => UserConversion::None,
        }
    }

    fn constructor_candidates(
        &mut self,
        class: SymbolId,
        flags: UserConvFlags,
        target: Idx,
        arg: &Arg,
        hint: Option<SymbolId>,
        out: &mut Vec<Candidate>,
    ) {
        self.ensure_complete(class);
        let class_ty = self.symbols.class(class).map_or(Idx::ERROR, |info| info.ty);
        for ctor in self.symbols.constructors(class) {
            if hint.is_some_and(|h| h != ctor) || !self.may_convert(ctor, flags) {
                continue;
            }
            let Some(info) = self.symbols.function(ctor) else {
                continue;
            };
            if info.is_template() || info.params.is_empty() || !info.accepts_arity(1) {
                continue;
            }
            let param = info.params[0].ty;
            let first = self.compute_conversion(param, arg, ConvContext::standard_only());
            if !first.is_valid() {
                continue;
            }
            let second = self.compute_conversion(target, &Arg::prvalue(class_ty), ConvContext::standard_only());
            if !second.is_valid() {
                continue;
            }
            out.push(self.conversion_candidate(ctor, first, second));
        }
    }

    fn conversion_function_candidates(
        &mut self,
        class: SymbolId,
        flags: UserConvFlags,
        target: Idx,
        arg: &Arg,
        hint: Option<SymbolId>,
        out: &mut Vec<Candidate>,
    ) {
        for function in self.visible_conversion_functions(class) {
            if hint.is_some_and(|h| h != function) || !self.may_convert(function, flags) {
                continue;
            }
            let Some(ret) = self
                .symbols
                .function(function)
                .filter(|info| !info.is_template())
                .map(|info| info.ret)
            else {
                continue;
            };
            let result = Arg::call_result(self.pool, ret);
            if flags.contains(UserConvFlags::LVALUE_RESULT) && !result.category.is_lvalue() {
                continue;
            }
            let first = self.implicit_object_conversion(function, arg);
            if !first.is_valid() {
                continue;
            }
            let second = self.compute_conversion(target, &result, ConvContext::standard_only());
            if !second.is_valid() {
                continue;
            }
            out.push(self.conversion_candidate(function, first, second));
        }
    }

    fn may_convert(&self, function: SymbolId, flags: UserConvFlags) -> bool {
        let symbol_flags = self.symbols.get(function).flags;
        !symbol_flags.contains(SymbolFlags::EXPLICIT) || flags.contains(UserConvFlags::DIRECT_INIT)
    }

    fn conversion_candidate(&self, function: SymbolId, first: ConversionSeq, second: ConversionSeq) -> Candidate {
        let mut candidate = Candidate::new(function);
        candidate.convs.push(first);
        candidate.convs.push(second);
        candidate.deleted = self.symbols.get(function).flags.is_deleted();
        candidate
    }

    /// Conversion functions of `class` and its bases. A conversion function
    /// hides base conversion functions with the same result type.
    pub fn visible_conversion_functions(&self, class: SymbolId) -> Vec<SymbolId> {
        let mut out = Vec::new();
        self.collect_conversion_functions(class, &FxHashSet::default(), &mut out);
        out
    }

    fn collect_conversion_functions(
        &self,
        class: SymbolId,
        hidden: &FxHashSet<Idx>,
        out: &mut Vec<SymbolId>,
    ) {
        let own = self.symbols.conversion_functions(class);
        let mut hidden_below = hidden.clone();
        for &function in &own {
            let Some(ret) = self.symbols.function(function).map(|info| info.ret) else {
                continue;
            };
            if !hidden.contains(&ret) && !out.contains(&function) {
                out.push(function);
            }
            hidden_below.insert(ret);
        }
        for base in self.symbols.direct_bases(class) {
            self.collect_conversion_functions(base.class, &hidden_below, out);
        }
    }
}

#[cfg(test)]
mod tests;
