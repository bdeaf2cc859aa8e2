//! Template argument deduction, substitution and partial ordering.
//!
//! Function templates carry their parameters as depth-0
//! [`TypeData::TemplateParam`] types. Deduction matches each parameter
//! type `P` against the adjusted argument type `A`, substitution builds
//! the instantiated signature, and failures at either stage silently drop
//! the candidate.

use crate::context::Guard;
use crate::expr::{Arg, CallDescriptor};
use crate::{
    FunctionInfo, Idx, Param, Pool, RefKind, Sema, Symbol, SymbolFlags, SymbolId, SymbolKind, TypeData,
};

impl Sema<'_> {
    /// Deduce and instantiate `template` for `call`. `None` on deduction or
    /// substitution failure.
    pub(crate) fn deduce_template(&mut self, template: SymbolId, call: &CallDescriptor) -> Option<SymbolId> {
        self.guarded(Guard::Deduction, |this| this.deduce_and_instantiate(template, call))
            .flatten()
    }

    fn deduce_and_instantiate(&mut self, template: SymbolId, call: &CallDescriptor) -> Option<SymbolId> {
        let info = self.symbols.function(template)?.clone();
        let count = info.template_params.len();
        if call.explicit_template_args.len() > count {
            tracing::trace!(?template, "too many explicit template arguments");
            return None;
        }

        let explicit = call.explicit_template_args.len();
        let mut deduced: Vec<Option<Idx>> = vec![None; count];
        for (slot, &arg) in deduced.iter_mut().zip(&call.explicit_template_args) {
            *slot = Some(arg);
        }

        for (param, arg) in info.params.iter().zip(&call.args) {
            if arg.is_init_list() || !self.pool.is_dependent(param.ty) {
                continue;
            }
            let (p, a) = self.adjust_for_deduction(param.ty, arg);
            // Explicitly specified parameters are not deduced; the argument
            // converts to the substituted parameter instead.
            let mut scratch = deduced.clone();
            for slot in scratch.iter_mut().take(explicit) {
                *slot = None;
            }
            if !deduce_match(self.pool, p, a, &mut scratch) {
                tracing::trace!(?template, param = ?param.ty, arg = ?arg.ty, "deduction failed");
                return None;
            }
            for (slot, value) in deduced.iter_mut().zip(scratch).skip(explicit) {
                *slot = value;
            }
        }

        for i in 0..count {
            if deduced[i].is_some() {
                continue;
            }
            let Some(default) = info.template_params[i].default else {
                tracing::trace!(?template, index = i, "template parameter not deduced");
                return None;
            };
            let known: Vec<Idx> = deduced.iter().map(|d| d.unwrap_or(Idx::ERROR)).collect();
            deduced[i] = Some(self.substitute(default, &known)?);
        }

        let args: Vec<Idx> = deduced.into_iter().collect::<Option<_>>()?;
        self.instantiate(template, &args)
    }

    /// P/A adjustment.
    ///
    /// A reference `P` is replaced by its referee; `T&&` with an lvalue
    /// argument deduces `T` as an lvalue reference. Otherwise arrays and
    /// functions decay and top-level cv is dropped from both sides.
    fn adjust_for_deduction(&mut self, param: Idx, arg: &Arg) -> (Idx, Idx) {
        if let Some((referee, kind)) = self.pool.as_reference(param) {
            let forwarding = kind == RefKind::Rvalue
                && matches!(self.pool.data(referee), TypeData::TemplateParam { depth: 0, .. });
            if forwarding && arg.category.is_lvalue() {
                return (referee, self.pool.lvalue_ref(arg.ty));
            }
            return (referee, arg.ty);
        }
        let a = if let Some((elem, _)) = self.pool.as_array(arg.ty) {
            self.pool.pointer(elem)
        } else if self.pool.is_function(arg.ty) {
            self.pool.pointer(arg.ty)
        } else {
            self.pool.unqualified(arg.ty)
        };
        (self.pool.unqualified(param), a)
    }

    /// Replace depth-0 template parameters with `args`.
    ///
    /// Fails on forming a reference to `void`, a pointer to a reference,
    /// an array of references or functions, or on a dependent member type
    /// that the substituted class does not declare.
    pub(crate) fn substitute(&mut self, ty: Idx, args: &[Idx]) -> Option<Idx> {
        match self.pool.data(ty).clone() {
            TypeData::TemplateParam { depth: 0, index, .. } => {
                args.get(index as usize).copied().filter(|a| !a.is_error())
            }
            TypeData::Qualified { inner, quals } => {
                let inner = self.substitute(inner, args)?;
                Some(self.pool.qualified(inner, quals))
            }
            TypeData::Pointer(pointee) => {
                let pointee = self.substitute(pointee, args)?;
                if self.pool.is_reference(pointee) {
                    return None;
                }
                Some(self.pool.pointer(pointee))
            }
            TypeData::Reference { referee, kind } => {
                let referee = self.substitute(referee, args)?;
                if self.pool.is_void(referee) {
                    return None;
                }
                Some(self.pool.reference(referee, kind))
            }
            TypeData::Array { elem, len } => {
                let elem = self.substitute(elem, args)?;
                if !self.pool.is_object(elem) {
                    return None;
                }
                Some(self.pool.array(elem, len))
            }
            TypeData::Function { params, ret, variadic } => {
                let ret = self.substitute(ret, args)?;
                let params = params
                    .iter()
                    .map(|&p| self.substitute(p, args))
                    .collect::<Option<Vec<_>>>()?;
                Some(self.pool.function(&params, ret, variadic))
            }
            TypeData::MemberPointer { class, pointee } => {
                let class = self.substitute(class, args)?;
                self.pool.class_of(class)?;
                let pointee = self.substitute(pointee, args)?;
                Some(self.pool.member_pointer(class, pointee))
            }
            TypeData::TemplateSelector { scope, name } => {
                let scope = self.substitute(scope, args)?;
                let class = self.pool.class_of(scope)?;
                let member = self.symbols.lookup_in(class, name)?;
                match &self.symbols.get(member).kind {
                    SymbolKind::Typedef { ty } => Some(*ty),
                    SymbolKind::Class(info) => Some(info.ty),
                    SymbolKind::Enum(info) => Some(info.ty),
                    _ => None,
                }
            }
            TypeData::TemplateParam { .. }
            | TypeData::Fundamental(_)
            | TypeData::Enum(_)
            | TypeData::Class(_)
            | TypeData::Error => Some(ty),
        }
    }

    /// The specialization of `template` for `args`, created on first use.
    fn instantiate(&mut self, template: SymbolId, args: &[Idx]) -> Option<SymbolId> {
        if let Some(existing) = self.symbols.instantiation(template, args) {
            return Some(existing);
        }
        let symbol = self.symbols.get(template).clone();
        let SymbolKind::Function(info) = &symbol.kind else {
            return None;
        };
        let params = info
            .params
            .iter()
            .map(|p| {
                Some(Param {
                    ty: self.substitute(p.ty, args)?,
                    ..p.clone()
                })
            })
            .collect::<Option<Vec<_>>>();
        let Some(params) = params else {
            tracing::trace!(?template, ?args, "substitution failure in parameters");
            return None;
        };
        let Some(ret) = self.substitute(info.ret, args) else {
            tracing::trace!(?template, ?args, "substitution failure in return type");
            return None;
        };

        let instance_info = FunctionInfo {
            params,
            ret,
            template_params: Vec::new(),
            template_origin: Some(template),
            template_args: args.to_vec(),
            ..info.clone()
        };
        let instance = Symbol {
            kind: SymbolKind::Function(instance_info),
            flags: symbol.flags | SymbolFlags::INSTANTIATED,
            ..symbol
        };
        let id = self.symbols.add(instance);
        self.symbols.record_instantiation(template, args.to_vec(), id);
        tracing::trace!(?template, ?args, instance = ?id, "instantiated");
        Some(id)
    }

    /// `first` is at least as specialized as `second`: the parameter types
    /// of `first` (its own template parameters standing for unique types)
    /// deduce the template parameters of `second`.
    pub(crate) fn at_least_as_specialized(&mut self, first: SymbolId, second: SymbolId, nargs: usize) -> bool {
        let (Some(a), Some(p)) = (self.symbols.function(first), self.symbols.function(second)) else {
            return false;
        };
        let count = p.template_params.len();
        let pairs: Vec<(Idx, Idx)> = p
            .params
            .iter()
            .zip(&a.params)
            .take(nargs)
            .map(|(p, a)| (p.ty, a.ty))
            .collect();

        let mut deduced = vec![None; count];
        pairs.into_iter().all(|(p, a)| {
            let p = self.pool.unqualified(self.pool.non_reference(p));
            let a = self.pool.unqualified(self.pool.non_reference(a));
            deduce_match(self.pool, p, a, &mut deduced)
        })
    }
}

/// Match parameter type `p` against argument type `a`, recording template
/// parameters in `deduced`. Inconsistent deductions fail.
///
/// A template parameter in `p` is bound before any equality test, so
/// identical template parameter types on both sides still count as a
/// deduction.
pub(crate) fn deduce_match(pool: &mut Pool, p: Idx, a: Idx, deduced: &mut [Option<Idx>]) -> bool {
    if a.is_error() {
        return true;
    }
    let p_data = pool.data(p).clone();
    if let TypeData::TemplateParam { depth: 0, index, .. } = p_data {
        let Some(slot) = deduced.get_mut(index as usize) else {
            return false;
        };
        return match *slot {
            Some(prev) => prev == a,
            None => {
                *slot = Some(a);
                true
            }
        };
    }
    if p == a {
        return true;
    }
    if !pool.is_dependent(p) {
        return false;
    }
    let a_data = pool.data(a).clone();
    match (p_data, a_data) {
        // Lenient: `const T` also matches a less qualified `A`, which then
        // converts by a qualification adjustment.
        (TypeData::Qualified { inner, quals }, _) => {
            let (a_inner, a_quals) = pool.split_quals(a);
            let rest = pool.qualified(a_inner, a_quals - quals);
            deduce_match(pool, inner, rest, deduced)
        }
        (TypeData::Pointer(p_inner), TypeData::Pointer(a_inner)) => deduce_match(pool, p_inner, a_inner, deduced),
        (
            TypeData::Reference { referee: pr, kind: pk },
            TypeData::Reference { referee: ar, kind: ak },
        ) if pk == ak => deduce_match(pool, pr, ar, deduced),
        (TypeData::Array { elem: pe, len: pl }, TypeData::Array { elem: ae, len: al }) if pl == al || pl.is_none() => {
            deduce_match(pool, pe, ae, deduced)
        }
        (
            TypeData::Function { params: pp, ret: pr, variadic: pv },
            TypeData::Function { params: ap, ret: ar, variadic: av },
        ) if pp.len() == ap.len() && pv == av => {
            deduce_match(pool, pr, ar, deduced)
                && pp.iter().zip(ap.iter()).all(|(&p, &a)| deduce_match(pool, p, a, deduced))
        }
        (
            TypeData::MemberPointer { class: pc, pointee: pp },
            TypeData::MemberPointer { class: ac, pointee: ap },
        ) => deduce_match(pool, pc, ac, deduced) && deduce_match(pool, pp, ap, deduced),
        // Non-deduced context.
        (TypeData::TemplateSelector { .. }, _) => true,
        _ => false,
    }
}
