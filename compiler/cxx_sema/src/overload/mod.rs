//! Overload resolution.
//!
//! Resolution of one call runs in three phases:
//!
//! 1. Gather: ordinary lookup plus argument-dependent lookup
//!    (`gather.rs`), template argument deduction (`deduce.rs`).
//! 2. Build candidates: arity and defaults, one conversion sequence per
//!    argument, plus the implicit object conversion for member functions.
//!    A candidate with an invalid sequence is dropped here.
//! 3. Select (`rank.rs`, `select.rs`): eliminate every candidate beaten by
//!    another, then check the winner for deletion and access.
//!
//! Failures produce a [`ResolveError`]; unless the call is a probe it is
//! also reported to the diagnostic queue.

mod deduce;
mod gather;
mod rank;
mod select;

pub use gather::{Gathered, LookupContext};
pub use rank::Ranker;
pub use select::Selection;

use cxx_ir::Name;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::conversion::{ConvContext, ConversionSeq};
use crate::error::ResolveError;
use crate::expr::{Arg, CallDescriptor};
use crate::{CallFlags, Idx, Sema, SeqClass, SymbolFlags, SymbolId};

/// One function considered for one call.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Candidate {
    pub function: SymbolId,
    /// One sequence per argument.
    pub convs: SmallVec<[ConversionSeq; 4]>,
    /// Implicit object conversion of a non-static member function.
    pub object: Option<ConversionSeq>,
    /// Template the function was deduced from.
    pub template_origin: Option<SymbolId>,
    pub uses_ellipsis: bool,
    pub defaults_used: usize,
    pub deleted: bool,
    pub template_param_count: usize,
    /// Parameters of the template signature that depended on template
    /// parameters.
    pub residuals: usize,
}

impl Candidate {
    pub fn new(function: SymbolId) -> Self {
        Candidate {
            function,
            convs: SmallVec::new(),
            object: None,
            template_origin: None,
            uses_ellipsis: false,
            defaults_used: 0,
            deleted: false,
            template_param_count: 0,
            residuals: 0,
        }
    }

    /// A non-template candidate with the given argument sequences.
    pub fn with_convs(function: SymbolId, convs: impl IntoIterator<Item = ConversionSeq>) -> Self {
        let mut candidate = Self::new(function);
        candidate.convs = convs.into_iter().collect();
        candidate.uses_ellipsis = candidate.convs.iter().any(|c| c.class() == SeqClass::Ellipsis);
        candidate
    }

    pub fn is_viable(&self) -> bool {
        self.convs.iter().all(ConversionSeq::is_valid)
            && self.object.as_ref().map_or(true, ConversionSeq::is_valid)
    }

    #[inline]
    pub fn is_template(&self) -> bool {
        self.template_origin.is_some()
    }
}

/// The selected function of a call.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ResolvedCall {
    pub function: SymbolId,
    /// One sequence per argument.
    pub conversions: Vec<ConversionSeq>,
    pub object: Option<ConversionSeq>,
    pub uses_ellipsis: bool,
    pub defaults_used: usize,
}

impl From<Candidate> for ResolvedCall {
    fn from(candidate: Candidate) -> Self {
        ResolvedCall {
            function: candidate.function,
            conversions: candidate.convs.into_vec(),
            object: candidate.object,
            uses_ellipsis: candidate.uses_ellipsis,
            defaults_used: candidate.defaults_used,
        }
    }
}

impl Sema<'_> {
    /// Resolve a call of `name` looked up in `lookup`.
    #[tracing::instrument(level = "debug", skip_all, fields(name = ?name, args = call.args.len()))]
    pub fn resolve_call(
        &mut self,
        name: Name,
        lookup: LookupContext,
        call: &CallDescriptor,
    ) -> Result<ResolvedCall, ResolveError> {
        let functions: Vec<SymbolId> = self
            .gather_candidates(name, lookup, call)
            .into_iter()
            .map(|g| g.function)
            .collect();
        self.resolve_named(name, &functions, call)
    }

    /// Resolve a call among an explicit set of functions (constructors,
    /// a known overload set).
    pub fn resolve_among(
        &mut self,
        functions: &[SymbolId],
        call: &CallDescriptor,
    ) -> Result<ResolvedCall, ResolveError> {
        let name = functions
            .first()
            .map_or(Name::EMPTY, |&f| self.symbols.get(f).name);
        self.resolve_named(name, functions, call)
    }

    fn resolve_named(
        &mut self,
        name: Name,
        functions: &[SymbolId],
        call: &CallDescriptor,
    ) -> Result<ResolvedCall, ResolveError> {
        let result = self.select_call(name, functions, call);
        if let Err(err) = &result {
            tracing::debug!(%err, probe = call.is_probe(), "resolution failed");
            if !call.is_probe() {
                let diagnostic = err.to_diagnostic(call.span, &self.printer());
                self.report(diagnostic);
            }
        }
        result
    }

    fn select_call(
        &mut self,
        name: Name,
        functions: &[SymbolId],
        call: &CallDescriptor,
    ) -> Result<ResolvedCall, ResolveError> {
        let candidates: Vec<Candidate> = functions
            .iter()
            .filter_map(|&f| self.build_candidate(f, call))
            .collect();
        tracing::trace!(gathered = functions.len(), viable = candidates.len(), "candidates built");

        let no_match = || ResolveError::NoMatch {
            name,
            args: call.args.iter().map(|a| a.ty).collect(),
            candidates: functions.to_vec(),
        };

        let partial_order = self.partial_order(&candidates, call.args.len());
        let selection = self
            .ranker()
            .with_partial_order(partial_order.clone())
            .select_best(&candidates);
        let best = match selection {
            Selection::Best(best) => best,
            Selection::Ambiguous(tied) => {
                return Err(ResolveError::Ambiguous {
                    name,
                    candidates: tied.iter().map(|&i| candidates[i].function).collect(),
                })
            }
            Selection::NoViable => return Err(no_match()),
        };

        let mut winner = candidates[best].clone();
        if winner.deleted {
            let fallback = call.flags.contains(CallFlags::MOVE_RESOLUTION) && self.options.deleted_move_fallback;
            if !fallback {
                return Err(ResolveError::Deleted {
                    function: winner.function,
                });
            }
            let rest: Vec<Candidate> = candidates.iter().filter(|c| !c.deleted).cloned().collect();
            tracing::trace!(deleted = ?winner.function, remaining = rest.len(), "move resolution fallback");
            match self.ranker().with_partial_order(partial_order).select_best(&rest) {
                Selection::Best(i) => winner = rest[i].clone(),
                Selection::Ambiguous(tied) => {
                    return Err(ResolveError::Ambiguous {
                        name,
                        candidates: tied.iter().map(|&i| rest[i].function).collect(),
                    })
                }
                Selection::NoViable => {
                    return Err(ResolveError::Deleted {
                        function: winner.function,
                    })
                }
            }
        }

        if !self.symbols.is_accessible(winner.function, call.access_from) {
            return Err(ResolveError::Inaccessible {
                function: winner.function,
                access: self.symbols.get(winner.function).access,
            });
        }
        Ok(winner.into())
    }

    /// Check arity, deduce templates and compute every conversion. `None`
    /// when the function is not viable.
    fn build_candidate(&mut self, function: SymbolId, call: &CallDescriptor) -> Option<Candidate> {
        let info = self.symbols.function(function)?;
        if info.is_template() {
            let instance = self.deduce_template(function, call)?;
            let mut candidate = self.build_candidate(instance, call)?;
            let template = self.symbols.function(function)?;
            candidate.template_origin = Some(function);
            candidate.template_param_count = template.template_params.len();
            candidate.residuals = template
                .params
                .iter()
                .filter(|p| self.pool.is_dependent(p.ty))
                .count();
            return Some(candidate);
        }
        if call.flags.contains(CallFlags::EXPLICIT_TEMPLATE) && info.template_origin.is_none() {
            return None;
        }
        if !info.accepts_arity(call.args.len()) {
            return None;
        }
        let flags = self.symbols.get(function).flags;
        let converts = flags.intersects(SymbolFlags::CONSTRUCTOR | SymbolFlags::CONVERSION);
        if converts && flags.contains(SymbolFlags::EXPLICIT) && !call.flags.contains(CallFlags::DIRECT_INIT) {
            return None;
        }

        let params: Vec<Idx> = info.params.iter().map(|p| p.ty).collect();
        let mut candidate = Candidate::new(function);
        candidate.deleted = flags.is_deleted();
        candidate.defaults_used = params.len().saturating_sub(call.args.len());

        if self.symbols.has_implicit_object(function) {
            if let Some(object) = &call.object {
                let seq = self.implicit_object_conversion(function, object);
                if !seq.is_valid() {
                    return None;
                }
                candidate.object = Some(seq);
            }
        }

        let cx = ConvContext {
            allow_user: !call.flags.contains(CallFlags::NO_USER_CONV),
            ..ConvContext::copy_init()
        }
        .from_class(call.access_from);
        for (i, arg) in call.args.iter().enumerate() {
            let seq = match params.get(i) {
                Some(&param) => self.compute_conversion(param, arg, cx),
                None => {
                    candidate.uses_ellipsis = true;
                    ConversionSeq::ellipsis()
                }
            };
            if !seq.is_valid() {
                tracing::trace!(?function, arg = i, "argument does not convert");
                return None;
            }
            candidate.convs.push(seq);
        }
        Some(candidate)
    }

    /// Conversion of `object` to the implicit object parameter of a member
    /// function: `cv X&` without a ref-qualifier (binding rvalues too),
    /// `cv X&` or `cv X&&` with one.
    pub fn implicit_object_conversion(&mut self, function: SymbolId, object: &Arg) -> ConversionSeq {
        let Some(info) = self.symbols.function(function) else {
            return ConversionSeq::invalid();
        };
        let (this_quals, ref_qual) = (info.this_quals, info.ref_qual);
        let class_ty = self
            .symbols
            .get(function)
            .parent
            .and_then(|parent| self.symbols.class(parent))
            .map_or(Idx::ERROR, |class| class.ty);
        let referee = self.pool.qualified(class_ty, this_quals);
        match ref_qual {
            None => {
                let param = self.pool.lvalue_ref(referee);
                let cx = ConvContext {
                    implicit_object: true,
                    ..ConvContext::standard_only()
                };
                self.compute_conversion(param, object, cx)
            }
            Some(kind) => {
                let param = self.pool.reference(referee, kind);
                self.compute_conversion(param, object, ConvContext::standard_only())
            }
        }
    }

    /// Which template candidates are more specialized than which.
    fn partial_order(&mut self, candidates: &[Candidate], nargs: usize) -> FxHashSet<(SymbolId, SymbolId)> {
        let mut order = FxHashSet::default();
        let templates: Vec<SymbolId> = candidates.iter().filter_map(|c| c.template_origin).collect();
        for (i, &a) in templates.iter().enumerate() {
            for &b in &templates[i + 1..] {
                if a == b {
                    continue;
                }
                let a_over_b = self.at_least_as_specialized(a, b, nargs);
                let b_over_a = self.at_least_as_specialized(b, a, nargs);
                if a_over_b && !b_over_a {
                    order.insert((a, b));
                } else if b_over_a && !a_over_b {
                    order.insert((b, a));
                }
            }
        }
        order
    }
}
