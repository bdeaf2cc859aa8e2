//! Recognizing declared special members.

use super::{ParamForm, SpecialKind};
use crate::{Idx, Pool, Quals, RefKind, Sema, SymbolFlags, SymbolId, SymbolTable};

/// User-declared special members of one class, by kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct Declared {
    pub destructor: Vec<SymbolId>,
    pub default_ctor: Vec<SymbolId>,
    pub copy_ctor: Vec<SymbolId>,
    pub copy_assign: Vec<SymbolId>,
    pub move_ctor: Vec<SymbolId>,
    pub move_assign: Vec<SymbolId>,
    /// Any user-declared constructor, special or not.
    pub any_ctor: bool,
}

impl Declared {
    pub fn of(&self, kind: SpecialKind) -> &[SymbolId] {
        match kind {
            SpecialKind::Destructor => &self.destructor,
            SpecialKind::DefaultCtor => &self.default_ctor,
            SpecialKind::CopyCtor => &self.copy_ctor,
            SpecialKind::CopyAssign => &self.copy_assign,
            SpecialKind::MoveCtor => &self.move_ctor,
            SpecialKind::MoveAssign => &self.move_assign,
        }
    }

    fn push(&mut self, kind: SpecialKind, function: SymbolId) {
        let list = match kind {
            SpecialKind::Destructor => &mut self.destructor,
            SpecialKind::DefaultCtor => &mut self.default_ctor,
            SpecialKind::CopyCtor => &mut self.copy_ctor,
            SpecialKind::CopyAssign => &mut self.copy_assign,
            SpecialKind::MoveCtor => &mut self.move_ctor,
            SpecialKind::MoveAssign => &mut self.move_assign,
        };
        list.push(function);
    }

    /// A destructor, copy operation or move operation is user-declared.
    pub fn blocks_implicit_move(&self) -> bool {
        !(self.destructor.is_empty()
            && self.copy_ctor.is_empty()
            && self.copy_assign.is_empty()
            && self.move_ctor.is_empty()
            && self.move_assign.is_empty())
    }

    /// The implicit copy operation `kind` is deprecated: a destructor or
    /// the sibling copy operation is user-declared.
    pub fn deprecates_copy(&self, kind: SpecialKind) -> bool {
        match kind {
            SpecialKind::CopyCtor => !self.destructor.is_empty() || !self.copy_assign.is_empty(),
            SpecialKind::CopyAssign => !self.destructor.is_empty() || !self.copy_ctor.is_empty(),
            _ => false,
        }
    }

    /// The first user-declared move operation.
    pub fn first_move(&self) -> Option<SymbolId> {
        self.move_ctor.first().or(self.move_assign.first()).copied()
    }
}

impl Sema<'_> {
    /// Which special member `function` is, if any.
    ///
    /// Copy and move operations take a reference to their own class as the
    /// only required parameter; a copy assignment may also take the class
    /// by value. Templates are never copy or move operations.
    pub fn classify_special(&self, function: SymbolId) -> Option<SpecialKind> {
        let symbol = self.symbols.get(function);
        let info = self.symbols.function(function)?;
        let class_ty = symbol.parent.and_then(|p| self.symbols.class(p)).map(|c| c.ty)?;

        if symbol.flags.contains(SymbolFlags::DESTRUCTOR) {
            return Some(SpecialKind::Destructor);
        }
        let is_ctor = symbol.flags.contains(SymbolFlags::CONSTRUCTOR);
        let is_assign = !is_ctor && symbol.name == self.interner.intern("operator=");
        if !is_ctor && !is_assign {
            return None;
        }

        let rest_defaulted = info.params.iter().skip(1).all(|p| p.has_default);
        let form = match info.params.first() {
            Some(first) if !info.is_template() && rest_defaulted => {
                own_class_param(self.pool, first.ty, class_ty)
            }
            _ => None,
        };
        if is_ctor {
            let by_reference = info.params.first().is_some_and(|p| self.pool.is_reference(p.ty));
            return match form {
                Some(ParamForm::RvalueRef) => Some(SpecialKind::MoveCtor),
                Some(ParamForm::ConstRef | ParamForm::MutableRef) if by_reference => Some(SpecialKind::CopyCtor),
                _ if info.required_params() == 0 => Some(SpecialKind::DefaultCtor),
                _ => None,
            };
        }
        match form? {
            ParamForm::RvalueRef => Some(SpecialKind::MoveAssign),
            ParamForm::ConstRef | ParamForm::MutableRef => Some(SpecialKind::CopyAssign),
            ParamForm::None => None,
        }
    }

    /// Sort the user-declared special members of `class`.
    pub(crate) fn declared_specials(&self, class: SymbolId) -> Declared {
        let mut declared = Declared::default();
        let functions: Vec<SymbolId> = self.symbols.member_functions(class).collect();
        for function in functions {
            let flags = self.symbols.get(function).flags;
            if flags.is_implicit() {
                continue;
            }
            if flags.contains(SymbolFlags::CONSTRUCTOR) {
                declared.any_ctor = true;
            }
            if let Some(kind) = self.classify_special(function) {
                declared.push(kind, function);
            }
        }
        declared
    }
}

/// Form of a parameter naming the class itself: `X&`, `const X&`, `X&&`,
/// or `X` by value (reported as `ConstRef`, it accepts const lvalues).
pub(crate) fn own_class_param(pool: &Pool, param: Idx, class_ty: Idx) -> Option<ParamForm> {
    match pool.as_reference(param) {
        Some((referee, kind)) => {
            let (inner, quals) = pool.split_quals(referee);
            if inner != class_ty {
                return None;
            }
            Some(match kind {
                RefKind::Rvalue => ParamForm::RvalueRef,
                RefKind::Lvalue if quals.contains(Quals::CONST) => ParamForm::ConstRef,
                RefKind::Lvalue => ParamForm::MutableRef,
            })
        }
        None => (pool.unqualified(param) == class_ty).then_some(ParamForm::ConstRef),
    }
}

/// Parameter form of a copy or move operation.
pub(crate) fn param_form(symbols: &SymbolTable, pool: &Pool, function: SymbolId) -> ParamForm {
    let Some(info) = symbols.function(function) else {
        return ParamForm::None;
    };
    let class_ty = symbols
        .get(function)
        .parent
        .and_then(|p| symbols.class(p))
        .map_or(Idx::ERROR, |c| c.ty);
    info.params
        .first()
        .and_then(|p| own_class_param(pool, p.ty, class_ty))
        .unwrap_or(ParamForm::None)
}
