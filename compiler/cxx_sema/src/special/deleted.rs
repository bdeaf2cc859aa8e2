//! Deletion of implicit and defaulted special members.
//!
//! The walk visits direct non-virtual bases, then virtual bases, then
//! non-static data members, and stops at the first sub-object that makes
//! the member deleted. For each class-type sub-object it selects the
//! counterpart operation by overload resolution, exactly as the
//! synthesized body would call it, so the selected counterparts double as
//! the input for triviality and body synthesis.

use std::fmt;

use cxx_ir::Name;

use super::{ParamForm, SpecialKind};
use crate::context::Guard;
use crate::error::ResolveError;
use crate::expr::{Arg, CallDescriptor};
use crate::{CallFlags, Idx, Quals, RefKind, Sema, SymbolFlags, SymbolId};

/// A base or member sub-object of a class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Subobject {
    Base(SymbolId),
    VirtualBase(SymbolId),
    /// Index into the class's field list.
    Field(usize),
}

/// Why a special member is deleted. Only the first violation is kept.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeletionReason {
    /// The counterpart selected for the sub-object is not accessible.
    Inaccessible { subobject: Subobject, function: SymbolId },
    /// Several counterparts are equally good.
    Ambiguous { subobject: Subobject },
    /// The counterpart selected for the sub-object is deleted.
    Deleted { subobject: Subobject, function: SymbolId },
    /// No counterpart accepts the argument.
    NoCounterpart { subobject: Subobject },
    ReferenceMember { field: Name },
    ConstMember { field: Name },
    RvalueReferenceMember { field: Name },
    /// A union member whose counterpart is not trivial.
    VariantMember { field: Name },
    /// The sub-object cannot be destroyed.
    DestructorUnusable { subobject: Subobject },
    /// A move operation is user-declared.
    UserDeclaredMove { function: SymbolId },
}

impl fmt::Display for DeletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionReason::Inaccessible { subobject, .. } => {
                write!(f, "the operation selected for {subobject} is inaccessible")
            }
            DeletionReason::Ambiguous { subobject } => {
                write!(f, "the operation for {subobject} is ambiguous")
            }
            DeletionReason::Deleted { subobject, .. } => {
                write!(f, "the operation selected for {subobject} is deleted")
            }
            DeletionReason::NoCounterpart { subobject } => {
                write!(f, "{subobject} has no usable counterpart")
            }
            DeletionReason::ReferenceMember { .. } => f.write_str("a reference member cannot be default-initialized or reseated"),
            DeletionReason::ConstMember { .. } => f.write_str("a const member cannot be default-initialized or assigned"),
            DeletionReason::RvalueReferenceMember { .. } => f.write_str("an rvalue reference member cannot be copied"),
            DeletionReason::VariantMember { .. } => f.write_str("a union member has a non-trivial counterpart"),
            DeletionReason::DestructorUnusable { subobject } => {
                write!(f, "the destructor of {subobject} is deleted or inaccessible")
            }
            DeletionReason::UserDeclaredMove { .. } => f.write_str("a move operation is user-declared"),
        }
    }
}

impl fmt::Display for Subobject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subobject::Base(_) => f.write_str("a base class"),
            Subobject::VirtualBase(_) => f.write_str("a virtual base class"),
            Subobject::Field(i) => write!(f, "member #{i}"),
        }
    }
}

/// The operation a sub-object contributes to a special member.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct Counterpart {
    pub subobject: Subobject,
    /// Class of the sub-object, `None` for non-class members.
    pub class: Option<SymbolId>,
    /// Selected operation, `None` for non-class members and members
    /// initialized by their in-class initializer.
    pub function: Option<SymbolId>,
}

/// Result of the deletion walk.
#[derive(Clone, Debug, Default)]
pub(crate) struct Evaluation {
    pub deletion: Option<DeletionReason>,
    pub counterparts: Vec<Counterpart>,
}

impl Sema<'_> {
    /// Walk the sub-objects of `class` for special member `kind`.
    ///
    /// `form` is the parameter form of the copy operation being evaluated;
    /// it decides whether sub-objects are copied from const lvalues.
    pub(crate) fn evaluate_special(&mut self, class: SymbolId, kind: SpecialKind, form: ParamForm) -> Evaluation {
        let mut eval = Evaluation::default();
        let Some(info) = self.symbols.class(class).cloned() else {
            return eval;
        };
        let is_union = info.is_union();

        let mut subobjects: Vec<(Subobject, Option<SymbolId>)> = info
            .bases
            .iter()
            .filter(|b| !b.is_virtual)
            .map(|b| (Subobject::Base(b.class), Some(b.class)))
            .collect();
        subobjects.extend(
            self.symbols
                .virtual_bases(class)
                .into_iter()
                .map(|b| (Subobject::VirtualBase(b), Some(b))),
        );
        for (i, field) in info.fields.iter().enumerate() {
            let element = self.pool.strip_arrays(self.pool.non_reference(field.ty));
            let field_class = (!self.pool.is_reference(field.ty))
                .then(|| self.pool.class_of(self.pool.unqualified(element)))
                .flatten();
            subobjects.push((Subobject::Field(i), field_class));
        }

        for (subobject, sub_class) in subobjects {
            let field = match subobject {
                Subobject::Field(i) => info.fields.get(i),
                Subobject::Base(_) | Subobject::VirtualBase(_) => None,
            };
            if let Some(field) = field {
                if let Some(reason) = self.field_rule(field.name, field.ty, field.has_initializer, sub_class, kind) {
                    eval.deletion = Some(reason);
                    return eval;
                }
            }
            let Some(sub_class) = sub_class else {
                eval.counterparts.push(Counterpart {
                    subobject,
                    class: None,
                    function: None,
                });
                continue;
            };

            if kind.is_constructor() {
                if let Err(reason) = self.usable_destructor(subobject, sub_class, class) {
                    eval.deletion = Some(reason);
                    return eval;
                }
            }
            if kind == SpecialKind::DefaultCtor && field.is_some_and(|f| f.has_initializer) {
                eval.counterparts.push(Counterpart {
                    subobject,
                    class: Some(sub_class),
                    function: None,
                });
                continue;
            }

            match self.select_counterpart(subobject, sub_class, class, kind, form) {
                Ok(function) => {
                    if is_union && !self.symbols.get(function).flags.contains(SymbolFlags::TRIVIAL) {
                        let name = field.map_or(Name::EMPTY, |f| f.name);
                        eval.deletion = Some(DeletionReason::VariantMember { field: name });
                        return eval;
                    }
                    eval.counterparts.push(Counterpart {
                        subobject,
                        class: Some(sub_class),
                        function: Some(function),
                    });
                }
                Err(reason) => {
                    eval.deletion = Some(reason);
                    return eval;
                }
            }
        }
        eval
    }

    /// Member rules that do not depend on overload resolution.
    fn field_rule(
        &self,
        name: Name,
        ty: Idx,
        has_initializer: bool,
        class: Option<SymbolId>,
        kind: SpecialKind,
    ) -> Option<DeletionReason> {
        let reference = self.pool.as_reference(ty);
        let is_const = reference.is_none()
            && self
                .pool
                .quals(self.pool.strip_arrays(ty))
                .contains(Quals::CONST);
        match kind {
            SpecialKind::DefaultCtor if !has_initializer => {
                if reference.is_some() {
                    return Some(DeletionReason::ReferenceMember { field: name });
                }
                let user_default = class.is_some_and(|c| self.has_user_provided_default(c));
                if is_const && !user_default {
                    return Some(DeletionReason::ConstMember { field: name });
                }
                None
            }
            SpecialKind::CopyAssign | SpecialKind::MoveAssign => {
                if reference.is_some() {
                    return Some(DeletionReason::ReferenceMember { field: name });
                }
                is_const.then_some(DeletionReason::ConstMember { field: name })
            }
            SpecialKind::CopyCtor => matches!(reference, Some((_, RefKind::Rvalue)))
                .then_some(DeletionReason::RvalueReferenceMember { field: name }),
            _ => None,
        }
    }

    fn has_user_provided_default(&self, class: SymbolId) -> bool {
        self.symbols.constructors(class).into_iter().any(|c| {
            self.symbols.get(c).flags.contains(SymbolFlags::USER_PROVIDED)
                && self.symbols.function(c).is_some_and(|f| f.required_params() == 0)
        })
    }

    /// The destructor of `sub_class` exists, is not deleted and is
    /// accessible from `class`.
    fn usable_destructor(&self, subobject: Subobject, sub_class: SymbolId, class: SymbolId) -> Result<(), DeletionReason> {
        let usable = self.symbols.destructor(sub_class).is_some_and(|dtor| {
            !self.symbols.get(dtor).flags.is_deleted() && self.symbols.is_accessible(dtor, Some(class))
        });
        if usable {
            Ok(())
        } else {
            Err(DeletionReason::DestructorUnusable { subobject })
        }
    }

    /// Select the operation of `sub_class` that `kind` invokes on the
    /// sub-object.
    fn select_counterpart(
        &mut self,
        subobject: Subobject,
        sub_class: SymbolId,
        class: SymbolId,
        kind: SpecialKind,
        form: ParamForm,
    ) -> Result<SymbolId, DeletionReason> {
        if kind == SpecialKind::Destructor {
            let Some(dtor) = self.symbols.destructor(sub_class) else {
                return Err(DeletionReason::NoCounterpart { subobject });
            };
            if self.symbols.get(dtor).flags.is_deleted() {
                return Err(DeletionReason::Deleted { subobject, function: dtor });
            }
            if !self.symbols.is_accessible(dtor, Some(class)) {
                return Err(DeletionReason::Inaccessible { subobject, function: dtor });
            }
            return Ok(dtor);
        }

        let Some(sub_ty) = self.symbols.class(sub_class).map(|c| c.ty) else {
            return Err(DeletionReason::NoCounterpart { subobject });
        };
        let source = match kind {
            SpecialKind::CopyCtor | SpecialKind::CopyAssign => {
                let ty = if form == ParamForm::MutableRef {
                    sub_ty
                } else {
                    self.pool.const_of(sub_ty)
                };
                Some(Arg::lvalue(ty))
            }
            SpecialKind::MoveCtor | SpecialKind::MoveAssign => Some(Arg::xvalue(sub_ty)),
            SpecialKind::DefaultCtor | SpecialKind::Destructor => None,
        };

        let mut flags = CallFlags::PROBE;
        if kind.is_constructor() {
            flags |= CallFlags::DIRECT_INIT;
        }
        if kind.is_move() {
            flags |= CallFlags::MOVE_RESOLUTION;
        }
        let mut call = CallDescriptor::new(source.into_iter().collect())
            .without_flags(CallFlags::ORDINARY)
            .with_flags(flags)
            .from_class(class);

        let functions = if kind.is_constructor() {
            self.ensure_complete(sub_class);
            self.symbols.constructors(sub_class)
        } else {
            call = call.with_object(Arg::lvalue(sub_ty));
            let op = self.interner.intern("operator=");
            self.symbols.member_lookup(sub_class, op).unwrap_or_default()
        };

        let outcome = self.guarded(Guard::Probe, |this| this.resolve_among(&functions, &call));
        match outcome {
            Some(Ok(resolved)) => Ok(resolved.function),
            Some(Err(ResolveError::Deleted { function })) => Err(DeletionReason::Deleted { subobject, function }),
            Some(Err(ResolveError::Inaccessible { function, .. })) => {
                Err(DeletionReason::Inaccessible { subobject, function })
            }
            Some(Err(ResolveError::Ambiguous { .. })) => Err(DeletionReason::Ambiguous { subobject }),
            Some(Err(ResolveError::NoMatch { .. })) | None => Err(DeletionReason::NoCounterpart { subobject }),
        }
    }
}
