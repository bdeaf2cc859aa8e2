//! Statement form of synthesized special-member bodies and of user
//! constructor prologues.

use cxx_ir::{Name, Span};

use super::deleted::{Counterpart, Subobject};
use super::SpecialKind;
use crate::error::SemaError;
use crate::expr::{Arg, CallDescriptor};
use crate::{CallFlags, Sema, SymbolId};

/// One statement of a synthesized body.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Stmt {
    /// Store the class's vtable pointer into `*this`.
    InstallVptr { class: SymbolId },
    ConstructBase { base: SymbolId, is_virtual: bool, init: Init },
    /// `field` indexes the class's field list.
    ConstructMember { field: usize, init: Init },
    AssignBase { base: SymbolId, operator: SymbolId },
    /// `operator` is `None` for bitwise assignment of non-class members.
    AssignMember { field: usize, operator: Option<SymbolId> },
    DestroyMember { field: usize, destructor: SymbolId },
    DestroyBase { base: SymbolId, is_virtual: bool, destructor: SymbolId },
    /// Runs only when the hidden most-derived flag is set.
    IfMostDerived(Vec<Stmt>),
    ReturnThis,
}

/// How a constructed sub-object is initialized.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Init {
    /// Default-initialized: non-class members are left indeterminate.
    Default,
    /// The default member initializer.
    InClass,
    /// A selected constructor. The arguments are the source sub-object for
    /// copy and move, the written arguments for user initializers.
    Call(SymbolId),
    /// Bitwise copy from the corresponding source member.
    CopyBits,
    /// A non-class member initialized from written arguments.
    FromArgs(Vec<Arg>),
}

/// What a member initializer names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum InitTarget {
    Base(SymbolId),
    Field(Name),
}

/// One entry of a user constructor's member-initializer list.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MemberInitializer {
    pub target: InitTarget,
    pub args: Vec<Arg>,
    pub span: Span,
}

impl MemberInitializer {
    pub fn base(base: SymbolId, args: Vec<Arg>) -> Self {
        MemberInitializer {
            target: InitTarget::Base(base),
            args,
            span: Span::DUMMY,
        }
    }

    pub fn field(name: Name, args: Vec<Arg>) -> Self {
        MemberInitializer {
            target: InitTarget::Field(name),
            args,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

impl Sema<'_> {
    /// Body of an implicit member from the counterparts selected for it.
    pub(crate) fn synthesize_body(&self, class: SymbolId, kind: SpecialKind, counterparts: &[Counterpart]) -> Vec<Stmt> {
        match kind {
            SpecialKind::Destructor => self.destructor_body(counterparts),
            SpecialKind::CopyAssign | SpecialKind::MoveAssign => assignment_body(counterparts),
            SpecialKind::DefaultCtor | SpecialKind::CopyCtor | SpecialKind::MoveCtor => {
                let inits = counterparts.iter().map(|c| {
                    let init = match (c.function, c.subobject) {
                        (Some(ctor), _) => Init::Call(ctor),
                        (None, Subobject::Field(i)) if kind == SpecialKind::DefaultCtor => {
                            if self.field_has_initializer(class, i) {
                                Init::InClass
                            } else {
                                Init::Default
                            }
                        }
                        (None, _) if kind == SpecialKind::DefaultCtor => Init::Default,
                        (None, _) => Init::CopyBits,
                    };
                    (c.subobject, init)
                });
                self.constructor_body(class, inits.collect())
            }
        }
    }

    /// Lay out a constructor: non-virtual bases in declaration order, virtual
    /// bases under the most-derived guard, the vtable pointer, then members.
    fn constructor_body(&self, class: SymbolId, inits: Vec<(Subobject, Init)>) -> Vec<Stmt> {
        let mut virtual_bases = Vec::new();
        let mut bases = Vec::new();
        let mut members = Vec::new();
        for (subobject, init) in inits {
            match subobject {
                Subobject::VirtualBase(base) => virtual_bases.push(Stmt::ConstructBase {
                    base,
                    is_virtual: true,
                    init,
                }),
                Subobject::Base(base) => bases.push(Stmt::ConstructBase {
                    base,
                    is_virtual: false,
                    init,
                }),
                Subobject::Field(field) => members.push(Stmt::ConstructMember { field, init }),
            }
        }

        let mut body = bases;
        body.reserve(members.len() + 2);
        if !virtual_bases.is_empty() {
            body.push(Stmt::IfMostDerived(virtual_bases));
        }
        if self.symbols.needs_vptr(class) {
            body.push(Stmt::InstallVptr { class });
        }
        body.extend(members);
        body
    }

    /// Members in reverse, non-virtual bases in reverse, then virtual bases
    /// in reverse under the most-derived guard.
    fn destructor_body(&self, counterparts: &[Counterpart]) -> Vec<Stmt> {
        let mut body = Vec::new();
        let mut virtual_bases = Vec::new();
        let mut bases = Vec::new();
        for c in counterparts.iter().rev() {
            let Some(destructor) = c.function else {
                continue;
            };
            match c.subobject {
                Subobject::Field(field) => body.push(Stmt::DestroyMember { field, destructor }),
                Subobject::Base(base) => bases.push(Stmt::DestroyBase {
                    base,
                    is_virtual: false,
                    destructor,
                }),
                Subobject::VirtualBase(base) => virtual_bases.push(Stmt::DestroyBase {
                    base,
                    is_virtual: true,
                    destructor,
                }),
            }
        }
        body.extend(bases);
        if !virtual_bases.is_empty() {
            body.push(Stmt::IfMostDerived(virtual_bases));
        }
        body
    }

    fn field_has_initializer(&self, class: SymbolId, field: usize) -> bool {
        self.symbols
            .class(class)
            .and_then(|info| info.fields.get(field))
            .is_some_and(|f| f.has_initializer)
    }

    /// Merge a user constructor's member initializers with the default
    /// initialization of every other sub-object.
    ///
    /// Class-type sub-objects named by an initializer are constructed by
    /// overload resolution over the written arguments; the rest use their
    /// default member initializer or default construction.
    #[tracing::instrument(level = "debug", skip_all, fields(ctor = ?ctor, inits = inits.len()))]
    pub fn build_constructor_body(&mut self, ctor: SymbolId, inits: &[MemberInitializer]) -> Result<Vec<Stmt>, SemaError> {
        let class = self
            .symbols
            .get(ctor)
            .parent
            .filter(|&p| self.symbols.class(p).is_some())
            .ok_or(SemaError::NotAClass(ctor))?;
        let Some(info) = self.symbols.class(class).cloned() else {
            return Err(SemaError::NotAClass(class));
        };
        let virtual_bases = self.symbols.virtual_bases(class);

        for init in inits {
            let known = match init.target {
                InitTarget::Base(base) => {
                    info.bases.iter().any(|b| b.class == base) || virtual_bases.contains(&base)
                }
                InitTarget::Field(name) => info.field_index(name).is_some(),
            };
            if !known {
                return Err(SemaError::UnknownInitializer {
                    ctor,
                    target: init.target,
                });
            }
        }

        let mut subobjects: Vec<Subobject> = info
            .bases
            .iter()
            .filter(|b| !b.is_virtual)
            .map(|b| Subobject::Base(b.class))
            .collect();
        subobjects.extend(virtual_bases.into_iter().map(Subobject::VirtualBase));
        subobjects.extend((0..info.fields.len()).map(Subobject::Field));

        let mut planned = Vec::with_capacity(subobjects.len());
        for subobject in subobjects {
            let (written, sub_ty, has_initializer) = match subobject {
                Subobject::Base(base) | Subobject::VirtualBase(base) => (
                    inits.iter().find(|i| i.target == InitTarget::Base(base)),
                    self.symbols.class(base).map(|c| c.ty),
                    false,
                ),
                Subobject::Field(i) => {
                    let field = &info.fields[i];
                    (
                        inits.iter().find(|init| init.target == InitTarget::Field(field.name)),
                        Some(self.pool.unqualified(self.pool.strip_arrays(field.ty))),
                        field.has_initializer,
                    )
                }
            };
            let sub_class = sub_ty.and_then(|ty| self.pool.class_of(ty));

            let init = match (written, sub_class) {
                (Some(written), Some(sub_class)) => {
                    let call = CallDescriptor::construct(written.args.clone())
                        .at(written.span)
                        .from_class(class);
                    Init::Call(self.construct_subobject(sub_class, &call)?)
                }
                (Some(written), None) => Init::FromArgs(written.args.clone()),
                (None, _) if has_initializer => Init::InClass,
                (None, Some(sub_class)) => {
                    let call = CallDescriptor::construct(Vec::new()).from_class(class);
                    Init::Call(self.construct_subobject(sub_class, &call)?)
                }
                (None, None) => Init::Default,
            };
            planned.push((subobject, init));
        }
        Ok(self.constructor_body(class, planned))
    }

    fn construct_subobject(&mut self, sub_class: SymbolId, call: &CallDescriptor) -> Result<SymbolId, SemaError> {
        self.ensure_complete(sub_class);
        let constructors = self.symbols.constructors(sub_class);
        let call = call.clone().without_flags(CallFlags::ORDINARY);
        let resolved = self.resolve_among(&constructors, &call)?;
        Ok(resolved.function)
    }
}

/// Bases and members in declaration order, then `return *this`.
fn assignment_body(counterparts: &[Counterpart]) -> Vec<Stmt> {
    let mut body: Vec<Stmt> = counterparts
        .iter()
        .filter_map(|c| match c.subobject {
            Subobject::Base(base) | Subobject::VirtualBase(base) => c.function.map(|operator| Stmt::AssignBase { base, operator }),
            Subobject::Field(field) => Some(Stmt::AssignMember {
                field,
                operator: c.function,
            }),
        })
        .collect();
    body.push(Stmt::ReturnThis);
    body
}
