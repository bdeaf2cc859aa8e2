//! Declaration builder for tests and embedders without a parser.
//!
//! [`TestDb`] owns a type pool, a symbol table and an interner and declares
//! namespaces, classes, members and functions the way a front end would
//! after parsing. Functions declared here are user-provided unless marked
//! otherwise with [`TestDb::delete`] or [`TestDb::default_member`].
//!
//! ```text
//! let mut db = TestDb::new();
//! let b = db.class("B");
//! let d = db.class("D");
//! db.base(d, b);
//! let members = db.complete(d)?;
//! ```

use cxx_diagnostic::{Diagnostic, DiagnosticConfig};
use cxx_ir::{Name, SharedInterner, Span};

use crate::error::SemaError;
use crate::{
    Access, BaseSpec, ClassInfo, ClassKey, EnumInfo, FieldDecl, FunctionInfo, Idx, Param, Pool, Quals, Scope,
    Sema, SemaOptions, SpecialMembers, StorageClass, Symbol, SymbolFlags, SymbolId, SymbolKind, SymbolTable,
    TemplateParamDecl, TypePrinter,
};

/// A translation unit assembled by hand.
pub struct TestDb {
    pub pool: Pool,
    pub symbols: SymbolTable,
    pub interner: SharedInterner,
    pub options: SemaOptions,
    next_offset: u32,
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDb {
    /// Default options with an unlimited, unfiltered diagnostic queue.
    pub fn new() -> Self {
        Self::with_options(SemaOptions::default().with_diagnostics(DiagnosticConfig::unlimited()))
    }

    pub fn with_options(options: SemaOptions) -> Self {
        TestDb {
            pool: Pool::new(),
            symbols: SymbolTable::new(),
            interner: SharedInterner::new(),
            options,
            next_offset: 1,
        }
    }

    /// An engine over this translation unit.
    pub fn sema(&mut self) -> Sema<'_> {
        Sema::new(&mut self.pool, &mut self.symbols, &self.interner, &self.options)
    }

    pub fn printer(&self) -> TypePrinter<'_> {
        TypePrinter::new(&self.pool, &self.symbols, &self.interner)
    }

    pub fn name(&self, spelling: &str) -> Name {
        self.interner.intern(spelling)
    }

    /// A fresh one-byte span, so diagnostics sort in declaration order.
    pub fn next_span(&mut self) -> Span {
        let span = Span::new(self.next_offset, self.next_offset + 1);
        self.next_offset += 2;
        span
    }

    fn declare(&mut self, scope: SymbolId, symbol: Symbol) -> SymbolId {
        let span = self.next_span();
        self.symbols.declare(scope, symbol.at(span))
    }

    // === Scopes and types ===

    pub fn namespace(&mut self, parent: SymbolId, name: &str) -> SymbolId {
        let symbol = Symbol::new(self.name(name), SymbolKind::Namespace(Scope::default()));
        self.declare(parent, symbol)
    }

    /// A `struct` in the global namespace.
    pub fn class(&mut self, name: &str) -> SymbolId {
        self.class_in(SymbolId::GLOBAL, ClassKey::Struct, name)
    }

    pub fn union(&mut self, name: &str) -> SymbolId {
        self.class_in(SymbolId::GLOBAL, ClassKey::Union, name)
    }

    pub fn class_in(&mut self, scope: SymbolId, key: ClassKey, name: &str) -> SymbolId {
        let symbol = Symbol::new(self.name(name), SymbolKind::Class(ClassInfo::new(key, Idx::ERROR)));
        let id = self.declare(scope, symbol);
        let ty = self.pool.class_type(id);
        if let Some(info) = self.symbols.class_mut(id) {
            info.ty = ty;
        }
        id
    }

    /// The type of a class or enumeration.
    pub fn ty(&self, id: SymbolId) -> Idx {
        match &self.symbols.get(id).kind {
            SymbolKind::Class(info) => info.ty,
            SymbolKind::Enum(info) => info.ty,
            SymbolKind::Typedef { ty } | SymbolKind::TemplateParam { ty } | SymbolKind::Variable { ty } => *ty,
            _ => Idx::ERROR,
        }
    }

    pub fn enumeration(&mut self, scope: SymbolId, name: &str, underlying: Option<Idx>, scoped: bool) -> SymbolId {
        let info = EnumInfo {
            ty: Idx::ERROR,
            underlying,
            scoped,
        };
        let id = self.declare(scope, Symbol::new(self.name(name), SymbolKind::Enum(info)));
        let ty = self.pool.enum_type(id);
        if let SymbolKind::Enum(info) = &mut self.symbols.get_mut(id).kind {
            info.ty = ty;
        }
        id
    }

    pub fn typedef(&mut self, scope: SymbolId, name: &str, ty: Idx) -> SymbolId {
        self.declare(scope, Symbol::new(self.name(name), SymbolKind::Typedef { ty }))
    }

    pub fn const_of(&mut self, ty: Idx) -> Idx {
        self.pool.qualified(ty, Quals::CONST)
    }

    pub fn lref(&mut self, ty: Idx) -> Idx {
        self.pool.lvalue_ref(ty)
    }

    pub fn rref(&mut self, ty: Idx) -> Idx {
        self.pool.rvalue_ref(ty)
    }

    /// `const T&`.
    pub fn const_ref(&mut self, ty: Idx) -> Idx {
        let referee = self.const_of(ty);
        self.pool.lvalue_ref(referee)
    }

    pub fn ptr(&mut self, ty: Idx) -> Idx {
        self.pool.pointer(ty)
    }

    // === Class layout ===

    /// Public non-virtual base.
    pub fn base(&mut self, derived: SymbolId, base: SymbolId) {
        self.base_with(derived, base, Access::Public, false);
    }

    pub fn virtual_base(&mut self, derived: SymbolId, base: SymbolId) {
        self.base_with(derived, base, Access::Public, true);
    }

    pub fn base_with(&mut self, derived: SymbolId, base: SymbolId, access: Access, is_virtual: bool) {
        if let Some(info) = self.symbols.class_mut(derived) {
            info.bases.push(BaseSpec {
                class: base,
                access,
                is_virtual,
                offset: 0,
            });
        }
    }

    /// Public data member without an initializer. Returns its index.
    pub fn field(&mut self, class: SymbolId, name: &str, ty: Idx) -> usize {
        let decl = FieldDecl::new(self.name(name), ty);
        self.field_decl(class, decl)
    }

    pub fn field_decl(&mut self, class: SymbolId, decl: FieldDecl) -> usize {
        match self.symbols.class_mut(class) {
            Some(info) => {
                info.fields.push(decl);
                info.fields.len() - 1
            }
            None => 0,
        }
    }

    pub fn friend(&mut self, class: SymbolId, who: SymbolId) {
        if let Some(info) = self.symbols.class_mut(class) {
            info.friends.push(who);
        }
    }

    // === Functions ===

    /// Declare a function with a prepared signature.
    pub fn declare_function(&mut self, scope: SymbolId, name: &str, info: FunctionInfo, flags: SymbolFlags) -> SymbolId {
        let storage = if self.symbols.class(scope).is_some() {
            StorageClass::Member
        } else {
            StorageClass::None
        };
        let symbol = Symbol::new(self.name(name), SymbolKind::Function(info))
            .with_flags(flags | SymbolFlags::USER_PROVIDED)
            .with_storage(storage);
        self.declare(scope, symbol)
    }

    /// `void name(params...)` in a namespace.
    pub fn function(&mut self, scope: SymbolId, name: &str, params: &[Idx]) -> SymbolId {
        self.function_returning(scope, name, params, Idx::VOID)
    }

    pub fn function_returning(&mut self, scope: SymbolId, name: &str, params: &[Idx], ret: Idx) -> SymbolId {
        let info = FunctionInfo::new(params.iter().copied().map(Param::new).collect(), ret);
        self.declare_function(scope, name, info, SymbolFlags::empty())
    }

    /// `void name(fixed..., ...)`.
    pub fn variadic(&mut self, scope: SymbolId, name: &str, params: &[Idx]) -> SymbolId {
        let mut info = FunctionInfo::new(params.iter().copied().map(Param::new).collect(), Idx::VOID);
        info.variadic = true;
        self.declare_function(scope, name, info, SymbolFlags::empty())
    }

    /// Non-static member function `void name(params...)`.
    pub fn method(&mut self, class: SymbolId, name: &str, params: &[Idx]) -> SymbolId {
        self.function(class, name, params)
    }

    /// Member function with cv- and ref-qualifiers on the object.
    pub fn method_with(&mut self, class: SymbolId, name: &str, params: &[Idx], this_quals: Quals, ref_qual: Option<crate::RefKind>) -> SymbolId {
        let mut info = FunctionInfo::new(params.iter().copied().map(Param::new).collect(), Idx::VOID);
        info.this_quals = this_quals;
        info.ref_qual = ref_qual;
        self.declare_function(class, name, info, SymbolFlags::empty())
    }

    pub fn ctor(&mut self, class: SymbolId, params: &[Idx]) -> SymbolId {
        let info = FunctionInfo::new(params.iter().copied().map(Param::new).collect(), Idx::VOID);
        self.ctor_with(class, info, SymbolFlags::empty())
    }

    pub fn ctor_with(&mut self, class: SymbolId, info: FunctionInfo, flags: SymbolFlags) -> SymbolId {
        let name = self.symbols.get(class).name;
        let name = self.interner.lookup(name);
        self.declare_function(class, name, info, flags | SymbolFlags::CONSTRUCTOR)
    }

    pub fn explicit_ctor(&mut self, class: SymbolId, params: &[Idx]) -> SymbolId {
        let info = FunctionInfo::new(params.iter().copied().map(Param::new).collect(), Idx::VOID);
        self.ctor_with(class, info, SymbolFlags::EXPLICIT)
    }

    /// `X(const X&)`.
    pub fn copy_ctor(&mut self, class: SymbolId) -> SymbolId {
        let ty = self.ty(class);
        let param = self.const_ref(ty);
        self.ctor(class, &[param])
    }

    /// `X(X&&)`.
    pub fn move_ctor(&mut self, class: SymbolId) -> SymbolId {
        let ty = self.ty(class);
        let param = self.rref(ty);
        self.ctor(class, &[param])
    }

    pub fn dtor(&mut self, class: SymbolId) -> SymbolId {
        let name = self.interner.lookup(self.symbols.get(class).name);
        let info = FunctionInfo::new(Vec::new(), Idx::VOID);
        self.declare_function(class, name, info, SymbolFlags::DESTRUCTOR)
    }

    pub fn virtual_dtor(&mut self, class: SymbolId) -> SymbolId {
        let dtor = self.dtor(class);
        self.flag(dtor, SymbolFlags::VIRTUAL);
        dtor
    }

    /// `X& operator=(param)`.
    pub fn assign(&mut self, class: SymbolId, param: Idx) -> SymbolId {
        let ty = self.ty(class);
        let ret = self.lref(ty);
        self.function_returning(class, "operator=", &[param], ret)
    }

    /// `X& operator=(const X&)`.
    pub fn copy_assign(&mut self, class: SymbolId) -> SymbolId {
        let ty = self.ty(class);
        let param = self.const_ref(ty);
        self.assign(class, param)
    }

    /// `X& operator=(X&&)`.
    pub fn move_assign(&mut self, class: SymbolId) -> SymbolId {
        let ty = self.ty(class);
        let param = self.rref(ty);
        self.assign(class, param)
    }

    /// `operator T()`.
    pub fn conversion_fn(&mut self, class: SymbolId, ret: Idx) -> SymbolId {
        let name = format!("operator {}", self.printer().ty(ret));
        let info = FunctionInfo::new(Vec::new(), ret);
        self.declare_function(class, &name, info, SymbolFlags::CONVERSION)
    }

    /// A function template. `signature` receives the template parameter
    /// types and returns the parameter list and the return type.
    pub fn template_fn(
        &mut self,
        scope: SymbolId,
        name: &str,
        params: &[&str],
        signature: impl FnOnce(&mut Pool, &[Idx]) -> (Vec<Idx>, Idx),
    ) -> SymbolId {
        let decls: Vec<TemplateParamDecl> = params
            .iter()
            .map(|p| TemplateParamDecl {
                name: self.name(p),
                default: None,
            })
            .collect();
        #[allow(clippy::cast_possible_truncation, reason = "templates in tests have few parameters")]
        let types: Vec<Idx> = decls
            .iter()
            .enumerate()
            .map(|(i, d)| self.pool.template_param(0, i as u32, d.name))
            .collect();
        let (param_types, ret) = signature(&mut self.pool, &types);
        let mut info = FunctionInfo::new(param_types.into_iter().map(Param::new).collect(), ret);
        info.template_params = decls;
        self.declare_function(scope, name, info, SymbolFlags::empty())
    }

    // === Declaration properties ===

    pub fn flag(&mut self, id: SymbolId, flags: SymbolFlags) {
        self.symbols.get_mut(id).flags |= flags;
    }

    /// Mark `= delete`.
    pub fn delete(&mut self, id: SymbolId) {
        let symbol = self.symbols.get_mut(id);
        symbol.flags -= SymbolFlags::USER_PROVIDED;
        symbol.flags |= SymbolFlags::DELETED;
    }

    /// Mark `= default`.
    pub fn default_member(&mut self, id: SymbolId) {
        let symbol = self.symbols.get_mut(id);
        symbol.flags -= SymbolFlags::USER_PROVIDED;
        symbol.flags |= SymbolFlags::DEFAULTED;
    }

    pub fn access(&mut self, id: SymbolId, access: Access) {
        self.symbols.get_mut(id).access = access;
    }

    /// Give the last parameter of `function` a default argument.
    pub fn default_last_param(&mut self, function: SymbolId) {
        if let Some(param) = self.symbols.function_mut(function).and_then(|f| f.params.last_mut()) {
            param.has_default = true;
        }
    }

    // === Running the engine ===

    /// Complete `class` and return its special members.
    pub fn complete(&mut self, class: SymbolId) -> Result<SpecialMembers, SemaError> {
        self.sema().complete_class(class)
    }

    /// Complete `class` and drain the diagnostics it produced.
    pub fn complete_with_diagnostics(&mut self, class: SymbolId) -> (Result<SpecialMembers, SemaError>, Vec<Diagnostic>) {
        let mut sema = self.sema();
        let result = sema.complete_class(class);
        (result, sema.take_diagnostics())
    }
}
