//! Reference binding.
//!
//! A reference binds directly when the argument is reference-compatible
//! with the referee and has the right value category; otherwise a `const`
//! lvalue reference or an rvalue reference may bind to a temporary
//! materialized by copy-initialization from the argument.

use super::{ClassStep, ConvContext, ConvKind, ConversionSeq, RefBinding};
use crate::expr::Arg;
use crate::hierarchy::BaseLookup;
use crate::user_conv::UserConversion;
use crate::{Idx, Quals, RefKind, Sema, UserConvFlags};

/// How the argument type relates to the referee type.
enum Relation {
    /// Same type or unique accessible base; carries the binding steps.
    Related(ConversionSeq),
    /// A base reached ambiguously or without access.
    Ill,
    Unrelated,
}

impl Sema<'_> {
    pub(crate) fn reference_conversion(
        &mut self,
        referee: Idx,
        kind: RefKind,
        arg: &Arg,
        cx: ConvContext,
    ) -> ConversionSeq {
        let (to, to_quals) = self.pool.split_quals(referee);
        let (from, from_quals) = self.pool.split_quals(arg.ty);
        let binding = |binds_rvalue| RefBinding {
            kind,
            binds_rvalue,
            referee: to,
            referee_quals: to_quals,
            implicit_object: cx.implicit_object,
        };
        let binds_temporary = kind == RefKind::Rvalue || to_quals == Quals::CONST;

        match self.reference_relation(to, from, cx) {
            Relation::Ill => ConversionSeq::invalid(),
            Relation::Related(seq) => {
                if !to_quals.at_least(from_quals) {
                    return ConversionSeq::invalid();
                }
                let direct = match kind {
                    RefKind::Lvalue => {
                        arg.category.is_lvalue() || binds_temporary || cx.implicit_object
                    }
                    RefKind::Rvalue => arg.category.is_rvalue() || self.pool.is_function(to),
                };
                if !direct {
                    return ConversionSeq::invalid();
                }
                seq.with_binding(binding(arg.category.is_rvalue()))
            }
            Relation::Unrelated if !binds_temporary => {
                self.lvalue_result_conversion(referee, arg, cx)
            }
            Relation::Unrelated => {
                let inner = self.compute_conversion(
                    to,
                    arg,
                    ConvContext {
                        implicit_object: false,
                        ..cx
                    },
                );
                if !inner.is_valid() {
                    return inner;
                }
                inner.with_binding(binding(true))
            }
        }
    }

    fn reference_relation(&self, to: Idx, from: Idx, cx: ConvContext) -> Relation {
        if to == from {
            return Relation::Related(ConversionSeq::identity());
        }
        let (Some(base), Some(derived)) = (self.pool.class_of(to), self.pool.class_of(from)) else {
            return Relation::Unrelated;
        };
        match self.symbols.lookup_base(derived, base) {
            BaseLookup::NotBase => Relation::Unrelated,
            BaseLookup::Ambiguous => Relation::Ill,
            BaseLookup::Unique(_) => match self.accessible_base(derived, base, cx.access_from) {
                Some(distance) => {
                    let mut seq = ConversionSeq::single(ConvKind::DerivedToBase);
                    seq.class_step = Some(ClassStep {
                        from: derived,
                        to: Some(base),
                        distance,
                    });
                    Relation::Related(seq)
                }
                None => Relation::Ill,
            },
        }
    }

    /// A non-const lvalue reference to an unrelated type binds only to the
    /// lvalue result of a conversion function.
    fn lvalue_result_conversion(&mut self, referee: Idx, arg: &Arg, cx: ConvContext) -> ConversionSeq {
        if !cx.allow_user || self.pool.class_of(arg.ty).is_none() {
            return ConversionSeq::invalid();
        }
        let mut flags = UserConvFlags::CONVERSION_FUNCTIONS | UserConvFlags::LVALUE_RESULT;
        if cx.direct_init {
            flags |= UserConvFlags::DIRECT_INIT;
        }
        let target = self.pool.lvalue_ref(referee);
        match self.find_user_conversion(flags, target, arg, None) {
            UserConversion::Found(found) => {
                ConversionSeq::user_defined(&found.first, Some(found.function), found.second)
            }
            UserConversion::Ambiguous(_) | UserConversion::None => ConversionSeq::invalid(),
        }
    }
}
