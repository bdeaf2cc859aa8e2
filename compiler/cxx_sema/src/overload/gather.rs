//! Candidate gathering: ordinary lookup and argument-dependent lookup.

use cxx_ir::Name;
use rustc_hash::FxHashSet;

use crate::expr::CallDescriptor;
use crate::{CallFlags, Idx, Sema, SymbolId, SymbolTable, TypeData};

/// Where the called name is looked up.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LookupContext {
    /// `f(args)` written in `scope`: search outward.
    Unqualified { scope: SymbolId },
    /// `N::f(args)` or `C::f(args)`: search one scope.
    Qualified { scope: SymbolId },
    /// `obj.f(args)`: search the class and its bases.
    Member { class: SymbolId },
}

/// A function found for a call.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Gathered {
    pub function: SymbolId,
    /// Found only by argument-dependent lookup.
    pub via_adl: bool,
}

impl Sema<'_> {
    /// Collect the functions a call of `name` may invoke.
    ///
    /// Results are deduplicated by identity and by template origin; the
    /// first occurrence wins.
    pub fn gather_candidates(&self, name: Name, lookup: LookupContext, call: &CallDescriptor) -> Vec<Gathered> {
        let (ordinary, found_in_class) = match lookup {
            LookupContext::Unqualified { scope } => self.unqualified_lookup(scope, name),
            LookupContext::Qualified { scope } => {
                if self.symbols.class(scope).is_some() {
                    (self.symbols.member_lookup(scope, name).unwrap_or_default(), true)
                } else {
                    let found = self.symbols.lookup_in(scope, name);
                    (found.map(|id| self.symbols.functions_of(id)).unwrap_or_default(), false)
                }
            }
            LookupContext::Member { class } => {
                (self.symbols.member_lookup(class, name).unwrap_or_default(), true)
            }
        };

        let mut out = Vec::new();
        // Keyed by main template, so a template and its specializations
        // collapse whichever arrives first.
        let mut seen = FxHashSet::default();
        let mut push = |function: SymbolId, via_adl: bool, out: &mut Vec<Gathered>| {
            let origin = self.symbols.function(function).and_then(|f| f.template_origin);
            if seen.insert(origin.unwrap_or(function)) {
                out.push(Gathered { function, via_adl });
            }
        };
        for function in ordinary {
            push(function, false, &mut out);
        }

        let adl = matches!(lookup, LookupContext::Unqualified { .. })
            && call.flags.contains(CallFlags::CALL_SYNTAX | CallFlags::ALLOW_ADL)
            && !found_in_class;
        if adl {
            for function in self.argument_dependent_lookup(name, call) {
                push(function, true, &mut out);
            }
        }
        tracing::trace!(?name, found = out.len(), adl, "gathered candidates");
        out
    }

    /// Walk the scope chain outward, stopping at the first scope that
    /// declares `name`. Returns the functions found and whether the scope
    /// was a class.
    fn unqualified_lookup(&self, scope: SymbolId, name: Name) -> (Vec<SymbolId>, bool) {
        let mut current = Some(scope);
        while let Some(s) = current {
            if self.symbols.class(s).is_some() {
                if let Some(found) = self.symbols.member_lookup(s, name) {
                    return (found, true);
                }
            } else if let Some(found) = self.symbols.lookup_in(s, name) {
                return (self.symbols.functions_of(found), false);
            }
            current = self.symbols.get(s).parent;
        }
        (Vec::new(), false)
    }

    /// Functions named `name` in the namespaces and classes associated with
    /// the argument types, including friends declared in associated classes.
    fn argument_dependent_lookup(&self, name: Name, call: &CallDescriptor) -> Vec<SymbolId> {
        let mut associated = Associated::default();
        for arg in call.args.iter().chain(call.object.as_ref()) {
            if !arg.is_init_list() {
                self.collect_associated(arg.ty, &mut associated);
            }
        }

        let mut out = Vec::new();
        for &ns in &associated.namespaces {
            if let Some(found) = self.symbols.lookup_in(ns, name) {
                out.extend(self.symbols.functions_of(found));
            }
        }
        for &class in &associated.classes {
            let friends = self.symbols.class(class).map(|c| c.friends.as_slice()).unwrap_or_default();
            out.extend(friends.iter().copied().filter(|&f| {
                let symbol = self.symbols.get(f);
                symbol.is_function() && symbol.name == name
            }));
        }
        out
    }

    fn collect_associated(&self, ty: Idx, associated: &mut Associated) {
        match self.pool.data(self.pool.unqualified(ty)) {
            TypeData::Class(class) => associated.add_class(self.symbols, *class),
            TypeData::Enum(enumeration) => {
                associated.add_namespace(self.symbols.enclosing_namespace(*enumeration));
                if let Some(parent) = self.symbols.get(*enumeration).parent {
                    if self.symbols.class(parent).is_some() {
                        associated.add_class(self.symbols, parent);
                    }
                }
            }
            TypeData::Pointer(inner) => self.collect_associated(*inner, associated),
            TypeData::Reference { referee, .. } => self.collect_associated(*referee, associated),
            TypeData::Array { elem, .. } => self.collect_associated(*elem, associated),
            TypeData::Function { params, ret, .. } => {
                for &param in params.iter() {
                    self.collect_associated(param, associated);
                }
                self.collect_associated(*ret, associated);
            }
            TypeData::MemberPointer { class, pointee } => {
                self.collect_associated(*class, associated);
                self.collect_associated(*pointee, associated);
            }
            TypeData::Fundamental(_)
            | TypeData::Qualified { .. }
            | TypeData::TemplateParam { .. }
            | TypeData::TemplateSelector { .. }
            | TypeData::Error => {}
        }
    }
}

/// Associated namespaces and classes, in discovery order.
#[derive(Default)]
struct Associated {
    namespaces: Vec<SymbolId>,
    classes: Vec<SymbolId>,
}

impl Associated {
    fn add_namespace(&mut self, ns: SymbolId) {
        if !self.namespaces.contains(&ns) {
            self.namespaces.push(ns);
        }
    }

    /// A class, its bases, and their enclosing namespaces.
    fn add_class(&mut self, symbols: &SymbolTable, class: SymbolId) {
        if self.classes.contains(&class) {
            return;
        }
        self.classes.push(class);
        self.add_namespace(symbols.enclosing_namespace(class));
        for base in symbols.direct_bases(class) {
            self.add_class(symbols, base.class);
        }
    }
}

impl SymbolTable {
    /// Look `name` up in a class and, if it is not declared there, in its
    /// bases. A declaration in a derived class hides base declarations.
    /// `None` when no class in the hierarchy declares the name.
    pub fn member_lookup(&self, class: SymbolId, name: Name) -> Option<Vec<SymbolId>> {
        if let Some(found) = self.lookup_in(class, name) {
            return Some(self.functions_of(found));
        }
        let mut out: Option<Vec<SymbolId>> = None;
        for base in self.direct_bases(class) {
            if let Some(found) = self.member_lookup(base.class, name) {
                let merged = out.get_or_insert_with(Vec::new);
                for function in found {
                    if !merged.contains(&function) {
                        merged.push(function);
                    }
                }
            }
        }
        out
    }
}
