//! Conversions from braced initializer lists.

use super::arith::is_narrowing;
use super::{ConvContext, ConversionSeq, RefBinding};
use crate::expr::{Arg, CallDescriptor};
use crate::{CallFlags, Idx, Quals, RefKind, Sema, SymbolId};

impl Sema<'_> {
    pub(crate) fn init_list_conversion(&mut self, target: Idx, elems: &[Arg], cx: ConvContext) -> ConversionSeq {
        if let Some((referee, kind)) = self.pool.as_reference(target) {
            let (to, quals) = self.pool.split_quals(referee);
            if kind == RefKind::Lvalue && quals != Quals::CONST {
                return ConversionSeq::invalid();
            }
            let inner = self.init_list_conversion(to, elems, cx);
            if !inner.is_valid() {
                return inner;
            }
            return inner.with_binding(RefBinding {
                kind,
                binds_rvalue: true,
                referee: to,
                referee_quals: quals,
                implicit_object: false,
            });
        }

        let to = self.pool.unqualified(target);
        if let Some(class) = self.pool.class_of(to) {
            return self.init_list_to_class(class, to, elems, cx);
        }
        match elems {
            [] => ConversionSeq::identity(),
            [single] if !single.is_init_list() => {
                if self.narrows(single.ty, to) {
                    return ConversionSeq::invalid();
                }
                self.compute_conversion(to, single, cx)
            }
            _ => ConversionSeq::invalid(),
        }
    }

    fn init_list_to_class(&mut self, class: SymbolId, to: Idx, elems: &[Arg], cx: ConvContext) -> ConversionSeq {
        if let [single] = elems {
            let same_or_derived = self
                .pool
                .class_of(single.ty)
                .is_some_and(|src| src == class || self.symbols.is_base_of(class, src));
            if same_or_derived {
                return self.compute_conversion(to, single, cx);
            }
        }
        if !cx.allow_user {
            return ConversionSeq::invalid();
        }

        self.ensure_complete(class);
        if self.symbols.is_aggregate(class) {
            return self.aggregate_conversion(class, elems, cx);
        }

        let constructors = self.symbols.constructors(class);
        let mut call = CallDescriptor::new(elems.to_vec())
            .without_flags(CallFlags::ORDINARY)
            .with_flags(CallFlags::PROBE);
        if cx.direct_init {
            call = call.with_flags(CallFlags::DIRECT_INIT);
        }
        call.access_from = cx.access_from;
        match self.resolve_among(&constructors, &call) {
            Ok(resolved) => ConversionSeq::user_defined(
                &ConversionSeq::identity(),
                Some(resolved.function),
                ConversionSeq::identity(),
            ),
            Err(_) => ConversionSeq::invalid(),
        }
    }

    /// Element-wise initialization of the leading fields of an aggregate.
    fn aggregate_conversion(&mut self, class: SymbolId, elems: &[Arg], cx: ConvContext) -> ConversionSeq {
        let fields: Vec<Idx> = self
            .symbols
            .class(class)
            .map(|info| info.fields.iter().map(|f| f.ty).collect())
            .unwrap_or_default();
        if elems.len() > fields.len() {
            return ConversionSeq::invalid();
        }
        for (&field, elem) in fields.iter().zip(elems) {
            if !elem.is_init_list() && self.narrows(elem.ty, field) {
                return ConversionSeq::invalid();
            }
            if !self.compute_conversion(field, elem, cx).is_valid() {
                return ConversionSeq::invalid();
            }
        }
        ConversionSeq::user_defined(&ConversionSeq::identity(), None, ConversionSeq::identity())
    }

    fn narrows(&self, from: Idx, to: Idx) -> bool {
        let to = self.pool.non_reference(to);
        match (self.pool.fundamental(from), self.pool.fundamental(to)) {
            (Some(f), Some(t)) if f.is_arithmetic() && t.is_arithmetic() => {
                is_narrowing(&self.options.target, f, t)
            }
            _ => false,
        }
    }
}
