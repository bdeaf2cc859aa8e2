//! Conversion dispatch and the standard conversions on non-reference
//! targets: lvalue transformations, pointer and member-pointer
//! conversions, derived-to-base, arithmetic.

use smallvec::SmallVec;

use super::{arithmetic_conversion, ClassStep, ConvContext, ConvKind, ConversionSeq, QualStep};
use crate::expr::{Arg, ArgShape};
use crate::hierarchy::BaseLookup;
use crate::user_conv::UserConversion;
use crate::{Fundamental, Idx, Pool, Quals, Sema, SymbolId, UserConvFlags};

/// The part of a standard sequence after the lvalue transformation.
#[derive(Default)]
struct Tail {
    steps: SmallVec<[ConvKind; 4]>,
    class_step: Option<ClassStep>,
    qual_step: Option<QualStep>,
}

impl Tail {
    fn of(kind: ConvKind) -> Self {
        let mut tail = Tail::default();
        tail.steps.push(kind);
        tail
    }
}

impl Sema<'_> {
    /// Compute the implicit conversion sequence from `arg` to a parameter
    /// of type `target`.
    #[tracing::instrument(level = "trace", skip_all, fields(target = ?target, arg = ?arg.ty))]
    pub fn compute_conversion(&mut self, target: Idx, arg: &Arg, cx: ConvContext) -> ConversionSeq {
        if target.is_error() || arg.ty.is_error() {
            return ConversionSeq::identity();
        }
        if let ArgShape::InitList(elems) = &arg.shape {
            return self.init_list_conversion(target, elems, cx);
        }
        if let Some((referee, kind)) = self.pool.as_reference(target) {
            return self.reference_conversion(referee, kind, arg, cx);
        }
        self.value_conversion(target, arg, cx)
    }

    /// Copy-initialization of a non-reference `target` from `arg`.
    pub(crate) fn value_conversion(&mut self, target: Idx, arg: &Arg, cx: ConvContext) -> ConversionSeq {
        let to = self.pool.unqualified(target);
        let from = self.pool.unqualified(arg.ty);

        if let Some(to_class) = self.pool.class_of(to) {
            return self.class_conversion(to_class, target, arg, cx);
        }
        if self.pool.class_of(from).is_some() {
            return self.user_defined_conversion(target, arg, cx);
        }
        if from == to {
            return ConversionSeq::identity();
        }

        let (decayed, transform) = self.decay(from, arg);
        let Some(tail) = self.scalar_conversion(decayed, to, arg, cx) else {
            return ConversionSeq::invalid();
        };

        let mut steps: SmallVec<[ConvKind; 4]> = SmallVec::new();
        match transform {
            Some(ConvKind::LvalueToRvalue) if tail.steps.is_empty() => {}
            Some(kind) => steps.push(kind),
            None => {}
        }
        steps.extend(tail.steps);
        let mut seq = ConversionSeq::from_steps(&steps);
        seq.class_step = tail.class_step;
        seq.qual_step = tail.qual_step;
        seq
    }

    /// Array-to-pointer, function-to-pointer, or lvalue-to-rvalue.
    fn decay(&mut self, from: Idx, arg: &Arg) -> (Idx, Option<ConvKind>) {
        if let Some((elem, _)) = self.pool.as_array(from) {
            return (self.pool.pointer(elem), Some(ConvKind::ArrayToPointer));
        }
        if self.pool.is_function(from) {
            return (self.pool.pointer(from), Some(ConvKind::FunctionToPointer));
        }
        if arg.category.is_lvalue() {
            return (from, Some(ConvKind::LvalueToRvalue));
        }
        (from, None)
    }

    fn scalar_conversion(&mut self, from: Idx, to: Idx, arg: &Arg, cx: ConvContext) -> Option<Tail> {
        if from == to {
            return Some(Tail::default());
        }
        let to_is_pointer_like = self.pool.is_pointer(to) || self.pool.as_member_pointer(to).is_some();
        // Any `std::nullptr_t` value converts, not just the literal.
        if to_is_pointer_like && (arg.is_null_pointer_constant() || from == Idx::NULLPTR) {
            return Some(Tail::of(ConvKind::NullPointer));
        }
        if self.pool.is_pointer(from) && self.pool.is_pointer(to) {
            return self.pointer_conversion(from, to, arg, cx);
        }
        if self.pool.as_member_pointer(from).is_some() && self.pool.as_member_pointer(to).is_some() {
            return self.member_pointer_conversion(from, to, cx);
        }
        if to == Idx::BOOL {
            if self.pool.is_pointer(from) || self.pool.as_member_pointer(from).is_some() {
                return Some(Tail::of(ConvKind::Boolean));
            }
            if from == Idx::NULLPTR {
                return cx.direct_init.then(|| Tail::of(ConvKind::Boolean));
            }
        }
        arithmetic_conversion(self.pool, self.symbols, &self.options.target, from, to).map(Tail::of)
    }

    fn pointer_conversion(&mut self, from: Idx, to: Idx, arg: &Arg, cx: ConvContext) -> Option<Tail> {
        let (from_pointee, to_pointee) = (self.pool.pointee(from)?, self.pool.pointee(to)?);
        let (fu, fq) = self.pool.split_quals(from_pointee);
        let (tu, tq) = self.pool.split_quals(to_pointee);

        if let Some(changed) = qualification_adjustment(self.pool, from, to) {
            if !changed {
                return Some(Tail::default());
            }
            let mut tail = Tail::of(ConvKind::Qualification);
            tail.qual_step = Some(QualStep {
                similar: self.pool.pointer(tu),
                quals: tq,
            });
            return Some(tail);
        }
        if fu == tu {
            let deprecated_literal = arg.shape == ArgShape::StringLiteral
                && fq == Quals::CONST
                && tq.is_empty()
                && self.pool.fundamental(fu).is_some_and(is_character);
            return deprecated_literal.then(|| Tail::of(ConvKind::DeprecatedStringQualification));
        }
        if !tq.at_least(fq) {
            return None;
        }

        let mut tail = if self.pool.is_void(tu) && self.pool.is_object(fu) {
            let mut tail = Tail::of(ConvKind::PointerToVoid);
            tail.class_step = self.pool.class_of(fu).map(|class| ClassStep {
                from: class,
                to: None,
                distance: 0,
            });
            tail
        } else {
            let (derived, base) = (self.pool.class_of(fu)?, self.pool.class_of(tu)?);
            let distance = self.accessible_base(derived, base, cx.access_from)?;
            let mut tail = Tail::of(ConvKind::PointerConversion);
            tail.class_step = Some(ClassStep {
                from: derived,
                to: Some(base),
                distance,
            });
            tail
        };
        if tq != fq {
            tail.steps.push(ConvKind::Qualification);
            tail.qual_step = Some(QualStep {
                similar: self.pool.pointer(tu),
                quals: tq,
            });
        }
        Some(tail)
    }

    /// `T B::*` to `T D::*` where `D` derives non-virtually from `B`.
    fn member_pointer_conversion(&mut self, from: Idx, to: Idx, cx: ConvContext) -> Option<Tail> {
        let (from_class, from_pointee) = self.pool.as_member_pointer(from)?;
        let (to_class, to_pointee) = self.pool.as_member_pointer(to)?;

        if from_class == to_class {
            let changed = qualification_adjustment(self.pool, from, to)?;
            return Some(if changed {
                Tail::of(ConvKind::Qualification)
            } else {
                Tail::default()
            });
        }
        if from_pointee != to_pointee {
            return None;
        }
        let (base, derived) = (self.pool.class_of(from_class)?, self.pool.class_of(to_class)?);
        let BaseLookup::Unique(path) = self.symbols.lookup_base(derived, base) else {
            return None;
        };
        if path.through_virtual || !self.symbols.base_accessible(derived, base, cx.access_from) {
            return None;
        }
        let mut tail = Tail::of(ConvKind::MemberPointer);
        tail.class_step = Some(ClassStep {
            from: base,
            to: Some(derived),
            distance: path.distance,
        });
        Some(tail)
    }

    /// Initialization of a class object from `arg`: identity for the same
    /// class, derived-to-base for a derived class, otherwise a user-defined
    /// conversion.
    fn class_conversion(&mut self, to_class: SymbolId, target: Idx, arg: &Arg, cx: ConvContext) -> ConversionSeq {
        if let Some(from_class) = self.pool.class_of(arg.ty) {
            if from_class == to_class {
                return ConversionSeq::identity();
            }
            match self.symbols.lookup_base(from_class, to_class) {
                BaseLookup::Unique(_) => {
                    let Some(distance) = self.accessible_base(from_class, to_class, cx.access_from) else {
                        return ConversionSeq::invalid();
                    };
                    let mut seq = ConversionSeq::single(ConvKind::DerivedToBase);
                    seq.class_step = Some(ClassStep {
                        from: from_class,
                        to: Some(to_class),
                        distance,
                    });
                    return seq;
                }
                BaseLookup::Ambiguous => return ConversionSeq::invalid(),
                BaseLookup::NotBase => {}
            }
        }
        self.user_defined_conversion(target, arg, cx)
    }

    /// Distance to a unique base subobject reachable from `from`.
    pub(crate) fn accessible_base(
        &self,
        derived: SymbolId,
        base: SymbolId,
        from: Option<SymbolId>,
    ) -> Option<u32> {
        match self.symbols.lookup_base(derived, base) {
            BaseLookup::Unique(path) if self.symbols.base_accessible(derived, base, from) => {
                Some(path.distance)
            }
            _ => None,
        }
    }

    pub(crate) fn user_defined_conversion(&mut self, target: Idx, arg: &Arg, cx: ConvContext) -> ConversionSeq {
        if !cx.allow_user {
            return ConversionSeq::invalid();
        }
        let mut flags = UserConvFlags::ALL_KINDS;
        if cx.direct_init {
            flags |= UserConvFlags::DIRECT_INIT;
        }
        match self.find_user_conversion(flags, target, arg, None) {
            UserConversion::Found(found) => {
                ConversionSeq::user_defined(&found.first, Some(found.function), found.second)
            }
            UserConversion::Ambiguous(functions) => {
                tracing::trace!(?functions, "ambiguous user-defined conversion");
                ConversionSeq::invalid()
            }
            UserConversion::None => ConversionSeq::invalid(),
        }
    }
}

fn is_character(f: Fundamental) -> bool {
    matches!(
        f,
        Fundamental::Char | Fundamental::WChar | Fundamental::Char16 | Fundamental::Char32
    )
}

/// Qualification conversion between similar pointer or member-pointer
/// types.
///
/// `Some(false)` when the types are identical, `Some(true)` when
/// qualifiers are added legally, `None` when the types are not similar or
/// qualifiers would be dropped. Adding cv at some level requires `const`
/// at every level above it.
pub(crate) fn qualification_adjustment(pool: &Pool, from: Idx, to: Idx) -> Option<bool> {
    let (mut from, mut to) = (pool.unqualified(from), pool.unqualified(to));
    let mut const_so_far = true;
    let mut changed = false;
    loop {
        let (from_next, to_next) = match (pool.pointee(from), pool.pointee(to)) {
            (Some(f), Some(t)) => (f, t),
            _ => match (pool.as_member_pointer(from), pool.as_member_pointer(to)) {
                (Some((fc, fp)), Some((tc, tp))) if fc == tc => (fp, tp),
                _ => return None,
            },
        };
        let (fu, fq) = pool.split_quals(from_next);
        let (tu, tq) = pool.split_quals(to_next);
        if !tq.at_least(fq) {
            return None;
        }
        if tq != fq {
            if !const_so_far {
                return None;
            }
            changed = true;
        }
        const_so_far &= tq.contains(Quals::CONST);
        if fu == tu {
            return Some(changed);
        }
        from = fu;
        to = tu;
    }
}
