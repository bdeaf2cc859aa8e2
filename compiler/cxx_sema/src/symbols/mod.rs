//! Symbol arena.
//!
//! Symbols live for the whole translation unit and are referenced by
//! [`SymbolId`]. Scopes (namespaces and classes) map names to symbols and
//! remember declaration order. A second function declared under a name
//! already bound to a function turns the binding into an overload-set
//! placeholder listing every function with that name, in order.
//!
//! The engine also stores its outputs here: synthesized bodies, deletion
//! reasons, and the template instantiation cache.

mod class;

pub use class::{BaseSpec, ClassInfo, ClassKey, FieldDecl};

use std::fmt;

use cxx_ir::{Name, Span, StringInterner};
use rustc_hash::FxHashMap;

use crate::special::{DeletionReason, Stmt};
use crate::{Idx, Quals, RefKind, SymbolFlags};

/// Index of a symbol in the [`SymbolTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    /// The global namespace.
    pub const GLOBAL: Self = Self(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// Member access.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub const fn name(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }

    /// Access of a member reached through a base with access `via`.
    #[must_use]
    pub fn through(self, via: Access) -> Access {
        self.max(via)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage class of a symbol.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum StorageClass {
    #[default]
    None,
    /// Non-static class member.
    Member,
    Parameter,
    Static,
    /// Overload-set placeholder.
    Overloads,
    Typedef,
    Virtual,
    Extern,
}

/// A function parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: Idx,
    pub has_default: bool,
}

impl Param {
    pub fn new(ty: Idx) -> Self {
        Param {
            name: Name::EMPTY,
            ty,
            has_default: false,
        }
    }

    /// A parameter with a default argument.
    pub fn defaulted(ty: Idx) -> Self {
        Param {
            has_default: true,
            ..Param::new(ty)
        }
    }
}

/// A template type parameter declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TemplateParamDecl {
    pub name: Name,
    pub default: Option<Idx>,
}

/// Function signature and template information.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionInfo {
    pub params: Vec<Param>,
    pub ret: Idx,
    pub variadic: bool,
    /// cv-qualifiers of the implicit object parameter.
    pub this_quals: Quals,
    pub ref_qual: Option<RefKind>,
    /// Non-empty for function templates. Parameters appear in the
    /// signature as depth-0 template parameter types.
    pub template_params: Vec<TemplateParamDecl>,
    /// Template this function was instantiated from.
    pub template_origin: Option<SymbolId>,
    /// Arguments of the instantiation.
    pub template_args: Vec<Idx>,
}

impl FunctionInfo {
    pub fn new(params: Vec<Param>, ret: Idx) -> Self {
        FunctionInfo {
            params,
            ret,
            variadic: false,
            this_quals: Quals::empty(),
            ref_qual: None,
            template_params: Vec::new(),
            template_origin: None,
            template_args: Vec::new(),
        }
    }

    #[inline]
    pub fn is_template(&self) -> bool {
        !self.template_params.is_empty()
    }

    /// Number of leading parameters without a default argument.
    pub fn required_params(&self) -> usize {
        self.params.iter().take_while(|p| !p.has_default).count()
    }

    /// Whether a call with `n` arguments fits the parameter list.
    pub fn accepts_arity(&self, n: usize) -> bool {
        n >= self.required_params() && (n <= self.params.len() || self.variadic)
    }
}

/// An enumeration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EnumInfo {
    pub ty: Idx,
    /// Fixed underlying type, if declared.
    pub underlying: Option<Idx>,
    pub scoped: bool,
}

/// Name-keyed scope with declaration order.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Scope {
    members: Vec<SymbolId>,
    by_name: FxHashMap<Name, SymbolId>,
}

impl Scope {
    /// The symbol bound to `name` (possibly an overload set).
    pub fn get(&self, name: Name) -> Option<SymbolId> {
        self.by_name.get(&name).copied()
    }

    /// Declared symbols in declaration order. Overload-set placeholders are
    /// not listed; their functions are.
    pub fn members(&self) -> &[SymbolId] {
        &self.members
    }
}

/// What a symbol is.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum SymbolKind {
    Function(FunctionInfo),
    Class(ClassInfo),
    Enum(EnumInfo),
    Variable { ty: Idx },
    Namespace(Scope),
    Typedef { ty: Idx },
    TemplateParam { ty: Idx },
    /// Functions sharing a name in one scope. Not callable itself.
    OverloadSet(Vec<SymbolId>),
}

impl SymbolKind {
    pub const fn describe(&self) -> &'static str {
        match self {
            SymbolKind::Function(_) => "function",
            SymbolKind::Class(_) => "class",
            SymbolKind::Enum(_) => "enum",
            SymbolKind::Variable { .. } => "variable",
            SymbolKind::Namespace(_) => "namespace",
            SymbolKind::Typedef { .. } => "typedef",
            SymbolKind::TemplateParam { .. } => "template parameter",
            SymbolKind::OverloadSet(_) => "overload set",
        }
    }
}

/// A named entity.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Symbol {
    pub name: Name,
    pub kind: SymbolKind,
    pub parent: Option<SymbolId>,
    pub access: Access,
    pub storage: StorageClass,
    pub flags: SymbolFlags,
    pub span: Span,
}

impl Symbol {
    pub fn new(name: Name, kind: SymbolKind) -> Self {
        Symbol {
            name,
            kind,
            parent: None,
            access: Access::Public,
            storage: StorageClass::None,
            flags: SymbolFlags::empty(),
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_storage(mut self, storage: StorageClass) -> Self {
        self.storage = storage;
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function(_))
    }
}

/// The symbol arena plus per-symbol engine outputs.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    bodies: FxHashMap<SymbolId, Vec<Stmt>>,
    deletion_reasons: FxHashMap<SymbolId, DeletionReason>,
    instantiations: FxHashMap<(SymbolId, Vec<Idx>), SymbolId>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table holding only the global namespace.
    pub fn new() -> Self {
        let global = Symbol::new(Name::EMPTY, SymbolKind::Namespace(Scope::default()));
        SymbolTable {
            symbols: vec![global],
            bodies: FxHashMap::default(),
            deletion_reasons: FxHashMap::default(),
            instantiations: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Add a symbol without binding it in any scope.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "symbol count is bounded far below u32::MAX"
    )]
    pub fn add(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    /// Declare a symbol in a namespace or class scope.
    ///
    /// Functions sharing a name are gathered into an overload set; any
    /// other redeclaration rebinds the name.
    pub fn declare(&mut self, scope: SymbolId, mut symbol: Symbol) -> SymbolId {
        symbol.parent = Some(scope);
        let name = symbol.name;
        let is_function = symbol.is_function();
        let access = symbol.access;
        let id = self.add(symbol);

        let existing = self.scope(scope).and_then(|s| s.get(name));
        let binding = match existing {
            Some(prev) if is_function => match self.get(prev).kind {
                SymbolKind::OverloadSet(_) => {
                    if let SymbolKind::OverloadSet(functions) = &mut self.get_mut(prev).kind {
                        functions.push(id);
                    }
                    prev
                }
                SymbolKind::Function(_) => {
                    let mut set = Symbol::new(name, SymbolKind::OverloadSet(vec![prev, id]))
                        .with_storage(StorageClass::Overloads)
                        .with_access(access);
                    set.parent = Some(scope);
                    self.add(set)
                }
                _ => id,
            },
            _ => id,
        };

        if let Some(scope) = self.scope_mut(scope) {
            scope.members.push(id);
            if !name.is_empty() {
                scope.by_name.insert(name, binding);
            }
        }
        id
    }

    /// The scope of a namespace or class.
    pub fn scope(&self, id: SymbolId) -> Option<&Scope> {
        match &self.get(id).kind {
            SymbolKind::Namespace(scope) => Some(scope),
            SymbolKind::Class(info) => Some(&info.scope),
            _ => None,
        }
    }

    fn scope_mut(&mut self, id: SymbolId) -> Option<&mut Scope> {
        match &mut self.get_mut(id).kind {
            SymbolKind::Namespace(scope) => Some(scope),
            SymbolKind::Class(info) => Some(&mut info.scope),
            _ => None,
        }
    }

    /// Look a name up in exactly one scope.
    pub fn lookup_in(&self, scope: SymbolId, name: Name) -> Option<SymbolId> {
        self.scope(scope).and_then(|s| s.get(name))
    }

    pub fn function(&self, id: SymbolId) -> Option<&FunctionInfo> {
        match &self.get(id).kind {
            SymbolKind::Function(info) => Some(info),
            _ => None,
        }
    }

    pub fn function_mut(&mut self, id: SymbolId) -> Option<&mut FunctionInfo> {
        match &mut self.get_mut(id).kind {
            SymbolKind::Function(info) => Some(info),
            _ => None,
        }
    }

    pub fn class(&self, id: SymbolId) -> Option<&ClassInfo> {
        match &self.get(id).kind {
            SymbolKind::Class(info) => Some(info),
            _ => None,
        }
    }

    pub fn class_mut(&mut self, id: SymbolId) -> Option<&mut ClassInfo> {
        match &mut self.get_mut(id).kind {
            SymbolKind::Class(info) => Some(info),
            _ => None,
        }
    }

    pub fn enum_info(&self, id: SymbolId) -> Option<&EnumInfo> {
        match &self.get(id).kind {
            SymbolKind::Enum(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_namespace(&self, id: SymbolId) -> bool {
        matches!(self.get(id).kind, SymbolKind::Namespace(_))
    }

    /// The functions a lookup result names: a function, or every member of
    /// an overload set. Anything else names no function.
    pub fn functions_of(&self, id: SymbolId) -> Vec<SymbolId> {
        match &self.get(id).kind {
            SymbolKind::Function(_) => vec![id],
            SymbolKind::OverloadSet(functions) => functions.clone(),
            _ => Vec::new(),
        }
    }

    /// Member functions of a class in declaration order.
    pub fn member_functions(&self, class: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        self.scope(class)
            .map(Scope::members)
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|&m| self.get(m).is_function())
    }

    /// Constructors declared in a class (user-declared and implicit).
    pub fn constructors(&self, class: SymbolId) -> Vec<SymbolId> {
        self.member_functions(class)
            .filter(|&m| self.get(m).flags.contains(SymbolFlags::CONSTRUCTOR))
            .collect()
    }

    pub fn destructor(&self, class: SymbolId) -> Option<SymbolId> {
        self.member_functions(class)
            .find(|&m| self.get(m).flags.contains(SymbolFlags::DESTRUCTOR))
    }

    /// Conversion functions declared directly in a class.
    pub fn conversion_functions(&self, class: SymbolId) -> Vec<SymbolId> {
        self.member_functions(class)
            .filter(|&m| self.get(m).flags.contains(SymbolFlags::CONVERSION))
            .collect()
    }

    /// Whether a function is a non-static member taking an implicit object.
    pub fn has_implicit_object(&self, function: SymbolId) -> bool {
        let symbol = self.get(function);
        symbol.storage != StorageClass::Static
            && !symbol.flags.intersects(SymbolFlags::SPECIAL)
            && symbol
                .parent
                .is_some_and(|parent| self.class(parent).is_some())
    }

    /// Innermost namespace enclosing a symbol.
    pub fn enclosing_namespace(&self, id: SymbolId) -> SymbolId {
        let mut current = self.get(id).parent;
        while let Some(scope) = current {
            if self.is_namespace(scope) {
                return scope;
            }
            current = self.get(scope).parent;
        }
        SymbolId::GLOBAL
    }

    /// `ns::Class::name` spelling.
    pub fn qualified_name(&self, id: SymbolId, interner: &StringInterner) -> String {
        let mut parts = vec![interner.lookup(self.get(id).name)];
        let mut current = self.get(id).parent;
        while let Some(scope) = current {
            let name = self.get(scope).name;
            if !name.is_empty() {
                parts.push(interner.lookup(name));
            }
            current = self.get(scope).parent;
        }
        parts.reverse();
        parts.join("::")
    }

    // === Engine outputs ===

    pub fn body(&self, function: SymbolId) -> Option<&[Stmt]> {
        self.bodies.get(&function).map(Vec::as_slice)
    }

    pub fn set_body(&mut self, function: SymbolId, body: Vec<Stmt>) {
        self.bodies.insert(function, body);
    }

    pub fn deletion_reason(&self, function: SymbolId) -> Option<&DeletionReason> {
        self.deletion_reasons.get(&function)
    }

    pub fn set_deletion_reason(&mut self, function: SymbolId, reason: DeletionReason) {
        self.deletion_reasons.insert(function, reason);
    }

    pub fn instantiation(&self, template: SymbolId, args: &[Idx]) -> Option<SymbolId> {
        self.instantiations.get(&(template, args.to_vec())).copied()
    }

    pub fn record_instantiation(&mut self, template: SymbolId, args: Vec<Idx>, id: SymbolId) {
        self.instantiations.insert((template, args), id);
    }
}
