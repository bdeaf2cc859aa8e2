//! Special-member synthesis.
//!
//! When a class is completed, the engine declares the special members the
//! user did not declare, decides which of them (and which explicitly
//! defaulted ones) are deleted, computes their triviality, `noexcept` and
//! constexpr eligibility, and stores a body for every non-trivial,
//! non-deleted one.
//!
//! Implicit declaration follows a fixed order: destructor, default
//! constructor, copy constructor, copy assignment, then the two move
//! operations, which are only declared when no destructor, copy operation
//! or move operation is user-declared.
//!
//! - `classify.rs`: recognizing user-declared special members
//! - `deleted.rs`: the deletion walk and counterpart selection
//! - `trivial.rs`: triviality, `noexcept`, constexpr, copy parameter form
//! - `body.rs`: statement bodies and user constructor prologues

mod body;
mod classify;
mod deleted;
mod trivial;

pub use body::{Init, InitTarget, MemberInitializer, Stmt};
pub use deleted::{DeletionReason, Subobject};

use std::fmt;

use cxx_diagnostic::{Diagnostic, ErrorCode};

use crate::context::Guard;
use crate::error::SemaError;
use crate::{
    FunctionInfo, Idx, Param, Sema, StorageClass, Symbol, SymbolFlags, SymbolId, SymbolKind,
};

/// The six special member functions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum SpecialKind {
    Destructor,
    DefaultCtor,
    CopyCtor,
    CopyAssign,
    MoveCtor,
    MoveAssign,
}

impl SpecialKind {
    /// Declaration order.
    pub const ALL: [SpecialKind; 6] = [
        SpecialKind::Destructor,
        SpecialKind::DefaultCtor,
        SpecialKind::CopyCtor,
        SpecialKind::CopyAssign,
        SpecialKind::MoveCtor,
        SpecialKind::MoveAssign,
    ];

    #[inline]
    pub const fn is_constructor(self) -> bool {
        matches!(
            self,
            SpecialKind::DefaultCtor | SpecialKind::CopyCtor | SpecialKind::MoveCtor
        )
    }

    #[inline]
    pub const fn is_assignment(self) -> bool {
        matches!(self, SpecialKind::CopyAssign | SpecialKind::MoveAssign)
    }

    #[inline]
    pub const fn is_move(self) -> bool {
        matches!(self, SpecialKind::MoveCtor | SpecialKind::MoveAssign)
    }

    pub const fn name(self) -> &'static str {
        match self {
            SpecialKind::Destructor => "destructor",
            SpecialKind::DefaultCtor => "default constructor",
            SpecialKind::CopyCtor => "copy constructor",
            SpecialKind::CopyAssign => "copy assignment operator",
            SpecialKind::MoveCtor => "move constructor",
            SpecialKind::MoveAssign => "move assignment operator",
        }
    }
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a copy or move operation takes its source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParamForm {
    /// Destructors and default constructors.
    None,
    /// `const X&` (or `X` by value for assignment).
    ConstRef,
    /// `X&`.
    MutableRef,
    /// `X&&`.
    RvalueRef,
}

/// One special member of a completed class.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SpecialMember {
    pub kind: SpecialKind,
    pub symbol: SymbolId,
    pub implicit: bool,
    pub deleted: bool,
    pub trivial: bool,
    pub noexcept: bool,
    pub constexpr: bool,
    pub deprecated: bool,
    pub deletion: Option<DeletionReason>,
    pub param_form: ParamForm,
}

/// Special members of one class in declaration order.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SpecialMembers {
    pub class: SymbolId,
    pub members: Vec<SpecialMember>,
}

impl SpecialMembers {
    /// The first member of `kind`.
    pub fn get(&self, kind: SpecialKind) -> Option<&SpecialMember> {
        self.members.iter().find(|m| m.kind == kind)
    }

    pub fn has(&self, kind: SpecialKind) -> bool {
        self.get(kind).is_some()
    }
}

/// Outcome of evaluating one implicit or defaulted member.
struct Synthesized {
    deletion: Option<DeletionReason>,
    flags: SymbolFlags,
    body: Option<Vec<Stmt>>,
}

impl Sema<'_> {
    /// Declare and evaluate the special members of `class`.
    ///
    /// Idempotent: a completed class is only reported. Bases and class-type
    /// members are completed first.
    #[tracing::instrument(level = "debug", skip_all, fields(class = ?class))]
    pub fn complete_class(&mut self, class: SymbolId) -> Result<SpecialMembers, SemaError> {
        let complete = self
            .symbols
            .class(class)
            .ok_or(SemaError::NotAClass(class))?
            .complete;
        if !complete {
            self.guarded(Guard::ClassCompletion, |this| this.synthesize_specials(class))
                .ok_or(SemaError::CompletionDepth(class))??;
        }
        Ok(self.special_members(class))
    }

    /// Complete `class` if needed, reporting failures instead of returning
    /// them.
    pub(crate) fn ensure_complete(&mut self, class: SymbolId) {
        if self.symbols.class(class).map_or(true, |c| c.complete) {
            return;
        }
        if let Err(err) = self.complete_class(class) {
            tracing::debug!(%err, ?class, "class completion failed");
            let diagnostic = err.to_diagnostic(self.symbols.get(class).span);
            self.report(diagnostic);
        }
    }

    /// The special members currently declared in `class`.
    pub fn special_members(&self, class: SymbolId) -> SpecialMembers {
        let mut members: Vec<SpecialMember> = self
            .symbols
            .member_functions(class)
            .filter_map(|function| {
                let kind = self.classify_special(function)?;
                let flags = self.symbols.get(function).flags;
                Some(SpecialMember {
                    kind,
                    symbol: function,
                    implicit: flags.is_implicit(),
                    deleted: flags.is_deleted(),
                    trivial: flags.contains(SymbolFlags::TRIVIAL),
                    noexcept: flags.contains(SymbolFlags::NOEXCEPT),
                    constexpr: flags.contains(SymbolFlags::CONSTEXPR),
                    deprecated: flags.contains(SymbolFlags::DEPRECATED_IMPLICIT),
                    deletion: self.symbols.deletion_reason(function).cloned(),
                    param_form: classify::param_form(self.symbols, self.pool, function),
                })
            })
            .collect();
        members.sort_by_key(|m| m.kind);
        SpecialMembers { class, members }
    }

    fn synthesize_specials(&mut self, class: SymbolId) -> Result<(), SemaError> {
        if let Some(info) = self.symbols.class_mut(class) {
            info.complete = true;
        }
        self.complete_subobjects(class)?;

        let declared = self.declared_specials(class);
        let has_virtual_bases = self.symbols.has_virtual_bases(class);
        let implicit_move = !declared.blocks_implicit_move();

        for kind in SpecialKind::ALL {
            if !declared.of(kind).is_empty() {
                continue;
            }
            let declare = match kind {
                SpecialKind::Destructor | SpecialKind::CopyCtor | SpecialKind::CopyAssign => true,
                SpecialKind::DefaultCtor => !declared.any_ctor,
                SpecialKind::MoveCtor | SpecialKind::MoveAssign => implicit_move,
            };
            if !declare {
                continue;
            }

            let form = match kind {
                SpecialKind::CopyCtor | SpecialKind::CopyAssign => self.copy_param_form(class, kind),
                SpecialKind::MoveCtor | SpecialKind::MoveAssign => ParamForm::RvalueRef,
                SpecialKind::Destructor | SpecialKind::DefaultCtor => ParamForm::None,
            };
            let virtual_dtor = kind == SpecialKind::Destructor && self.base_destructor_is_virtual(class);

            let mut result = match (kind, declared.first_move()) {
                (SpecialKind::CopyCtor | SpecialKind::CopyAssign, Some(function)) => Synthesized {
                    deletion: Some(DeletionReason::UserDeclaredMove { function }),
                    flags: SymbolFlags::DELETED,
                    body: None,
                },
                _ => self.synthesize_member(class, kind, form, virtual_dtor),
            };
            if declared.deprecates_copy(kind) {
                result.flags |= SymbolFlags::DEPRECATED_IMPLICIT;
            }
            if virtual_dtor {
                result.flags |= SymbolFlags::VIRTUAL;
            }
            if has_virtual_bases && (kind == SpecialKind::Destructor || kind.is_constructor()) {
                result.flags |= SymbolFlags::MOST_DERIVED_PARAM;
            }

            let symbol = self.implicit_symbol(class, kind, form, result.flags | SymbolFlags::IMPLICIT);
            let id = self.symbols.declare(class, symbol);
            self.record(id, result);
            tracing::trace!(?class, %kind, symbol = ?id, "declared implicit member");
        }

        for kind in SpecialKind::ALL {
            for &function in declared.of(kind) {
                let flags = self.symbols.get(function).flags;
                if !flags.contains(SymbolFlags::DEFAULTED) || flags.is_deleted() {
                    continue;
                }
                let form = classify::param_form(self.symbols, self.pool, function);
                let result = self.synthesize_member(class, kind, form, flags.contains(SymbolFlags::VIRTUAL));
                if let Some(reason) = &result.deletion {
                    let diagnostic = Diagnostic::warning(ErrorCode::E3001)
                        .with_message(format!(
                            "explicitly defaulted {kind} of `{}` is implicitly deleted",
                            self.symbols.qualified_name(class, self.interner)
                        ))
                        .with_label(self.symbols.get(function).span, "defaulted here")
                        .with_note(format!("implicitly deleted because {reason}"));
                    self.report(diagnostic);
                }
                self.symbols.get_mut(function).flags |= result.flags;
                self.record(function, result);
            }
        }
        Ok(())
    }

    /// Complete every base and every class-type member.
    fn complete_subobjects(&mut self, class: SymbolId) -> Result<(), SemaError> {
        let mut subclasses: Vec<SymbolId> = self.symbols.direct_bases(class).iter().map(|b| b.class).collect();
        let field_types: Vec<Idx> = self
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
            if sub != class {
                self.complete_class(sub)?;
            }
        }
        Ok(())
    }

    fn synthesize_member(&mut self, class: SymbolId, kind: SpecialKind, form: ParamForm, is_virtual: bool) -> Synthesized {
        let eval = self.evaluate_special(class, kind, form);
        if let Some(reason) = eval.deletion {
            tracing::trace!(?class, %kind, %reason, "implicitly deleted");
            return Synthesized {
                deletion: Some(reason),
                flags: SymbolFlags::DELETED,
                body: None,
            };
        }

        let trivial = self.is_trivial_special(class, kind, &eval.counterparts, is_virtual);
        let mut flags = SymbolFlags::empty();
        if trivial {
            flags |= SymbolFlags::TRIVIAL;
        }
        if self.is_noexcept_special(&eval.counterparts) {
            flags |= SymbolFlags::NOEXCEPT;
        }
        if self.is_constexpr_special(class, kind, &eval.counterparts, trivial) {
            flags |= SymbolFlags::CONSTEXPR;
        }
        let body = (!trivial).then(|| self.synthesize_body(class, kind, &eval.counterparts));
        Synthesized {
            deletion: None,
            flags,
            body,
        }
    }

    fn record(&mut self, function: SymbolId, result: Synthesized) {
        if let Some(reason) = result.deletion {
            self.symbols.set_deletion_reason(function, reason);
        }
        if let Some(body) = result.body {
            self.symbols.set_body(function, body);
        }
    }

    fn base_destructor_is_virtual(&self, class: SymbolId) -> bool {
        self.symbols.direct_bases(class).iter().any(|b| {
            self.symbols
                .destructor(b.class)
                .is_some_and(|d| self.symbols.get(d).flags.contains(SymbolFlags::VIRTUAL))
        })
    }

    /// The declaration of an implicit member.
    fn implicit_symbol(&mut self, class: SymbolId, kind: SpecialKind, form: ParamForm, flags: SymbolFlags) -> Symbol {
        let class_symbol = self.symbols.get(class);
        let (class_name, span) = (class_symbol.name, class_symbol.span);
        let class_ty = self.symbols.class(class).map_or(Idx::ERROR, |c| c.ty);

        let source = match form {
            ParamForm::None => None,
            ParamForm::ConstRef => {
                let referee = self.pool.const_of(class_ty);
                Some(self.pool.lvalue_ref(referee))
            }
            ParamForm::MutableRef => Some(self.pool.lvalue_ref(class_ty)),
            ParamForm::RvalueRef => Some(self.pool.rvalue_ref(class_ty)),
        };
        let params: Vec<Param> = source.into_iter().map(Param::new).collect();

        let (name, ret, role) = match kind {
            SpecialKind::Destructor => (class_name, Idx::VOID, SymbolFlags::DESTRUCTOR),
            SpecialKind::DefaultCtor | SpecialKind::CopyCtor | SpecialKind::MoveCtor => {
                (class_name, Idx::VOID, SymbolFlags::CONSTRUCTOR)
            }
            SpecialKind::CopyAssign | SpecialKind::MoveAssign => (
                self.interner.intern("operator="),
                self.pool.lvalue_ref(class_ty),
                SymbolFlags::empty(),
            ),
        };
        Symbol::new(name, SymbolKind::Function(FunctionInfo::new(params, ret)))
            .with_flags(flags | role)
            .with_storage(StorageClass::Member)
            .at(span)
    }
}
