//! Properties of implicit special members derived from the selected
//! sub-object counterparts.

use super::classify::param_form;
use super::deleted::Counterpart;
use super::{ParamForm, SpecialKind};
use crate::{Sema, SymbolFlags, SymbolId};

impl Sema<'_> {
    /// An implicit or defaulted member is trivial.
    ///
    /// Destructors: not virtual, every counterpart trivial. Everything
    /// else: no virtual functions, no virtual bases, no default member
    /// initializers for the default constructor, every counterpart trivial.
    pub(crate) fn is_trivial_special(
        &self,
        class: SymbolId,
        kind: SpecialKind,
        counterparts: &[Counterpart],
        is_virtual: bool,
    ) -> bool {
        let all_trivial = counterparts.iter().all(|c| self.counterpart_has(c, SymbolFlags::TRIVIAL));
        if kind == SpecialKind::Destructor {
            return !is_virtual && all_trivial;
        }
        if self.symbols.is_polymorphic(class) || self.symbols.has_virtual_bases(class) {
            return false;
        }
        if kind == SpecialKind::DefaultCtor {
            let initializers = self
                .symbols
                .class(class)
                .is_some_and(|info| info.fields.iter().any(|f| f.has_initializer));
            if initializers {
                return false;
            }
        }
        all_trivial
    }

    /// Every counterpart is `noexcept`.
    pub(crate) fn is_noexcept_special(&self, counterparts: &[Counterpart]) -> bool {
        counterparts.iter().all(|c| {
            c.function.map_or(true, |f| {
                let flags = self.symbols.get(f).flags;
                flags.intersects(SymbolFlags::NOEXCEPT | SymbolFlags::TRIVIAL)
                    || (flags.contains(SymbolFlags::DESTRUCTOR) && !flags.is_deleted())
            })
        })
    }

    /// The member may be used in constant evaluation: no virtual bases and
    /// every counterpart constexpr or trivial. A destructor only when
    /// trivial.
    pub(crate) fn is_constexpr_special(
        &self,
        class: SymbolId,
        kind: SpecialKind,
        counterparts: &[Counterpart],
        trivial: bool,
    ) -> bool {
        if kind == SpecialKind::Destructor {
            return trivial;
        }
        !self.symbols.has_virtual_bases(class)
            && counterparts
                .iter()
                .all(|c| self.counterpart_has(c, SymbolFlags::CONSTEXPR | SymbolFlags::TRIVIAL))
    }

    /// Parameter of the implicit copy operation: `const X&` unless some
    /// class-type sub-object only offers a `Y&` counterpart.
    pub(crate) fn copy_param_form(&mut self, class: SymbolId, kind: SpecialKind) -> ParamForm {
        let mut subclasses: Vec<SymbolId> = self.symbols.direct_bases(class).iter().map(|b| b.class).collect();
        subclasses.extend(self.symbols.virtual_bases(class));
        let field_types: Vec<_> = self
            .symbols
            .class(class)
            .map(|info| info.fields.iter().map(|f| f.ty).collect())
            .unwrap_or_default();
        for ty in field_types {
            if self.pool.is_reference(ty) {
                continue;
            }
            let element = self.pool.unqualified(self.pool.strip_arrays(ty));
            if let Some(sub) = self.pool.class_of(element) {
                subclasses.push(sub);
            }
        }

        for sub in subclasses {
            self.ensure_complete(sub);
            let copies: Vec<SymbolId> = self
                .symbols
                .member_functions(sub)
                .filter(|&f| self.classify_special(f) == Some(kind))
                .collect();
            let takes_const = copies
                .iter()
                .any(|&f| param_form(self.symbols, self.pool, f) == ParamForm::ConstRef);
            if !copies.is_empty() && !takes_const {
                return ParamForm::MutableRef;
            }
        }
        ParamForm::ConstRef
    }

    fn counterpart_has(&self, counterpart: &Counterpart, flags: SymbolFlags) -> bool {
        counterpart
            .function
            .map_or(true, |f| self.symbols.get(f).flags.intersects(flags))
    }
}
