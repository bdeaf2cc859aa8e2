//! Type and signature rendering for diagnostics and traces.

#![allow(
    clippy::format_push_string,
    reason = "diagnostic formatting prioritizes clarity over allocation"
)]

use cxx_ir::{Name, StringInterner};

use super::{Pool, TypeData};
use crate::{Idx, SymbolId, SymbolTable};

/// Renders types with C++ declarator spelling.
#[derive(Copy, Clone)]
pub struct TypePrinter<'a> {
    pool: &'a Pool,
    symbols: &'a SymbolTable,
    interner: &'a StringInterner,
}

impl<'a> TypePrinter<'a> {
    pub fn new(pool: &'a Pool, symbols: &'a SymbolTable, interner: &'a StringInterner) -> Self {
        TypePrinter {
            pool,
            symbols,
            interner,
        }
    }

    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// Spelling of an interned name.
    pub fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    /// Render a type.
    pub fn ty(&self, idx: Idx) -> String {
        let mut buf = String::new();
        self.ty_into(idx, &mut buf);
        buf
    }

    /// Render `f(T1, T2)` for a function symbol.
    pub fn signature(&self, function: SymbolId) -> String {
        let mut buf = self.symbols.qualified_name(function, self.interner);
        let Some(info) = self.symbols.function(function) else {
            return buf;
        };
        buf.push('(');
        for (i, param) in info.params.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            self.ty_into(param.ty, &mut buf);
        }
        if info.variadic {
            if !info.params.is_empty() {
                buf.push_str(", ");
            }
            buf.push_str("...");
        }
        buf.push(')');
        let this_quals = info.this_quals.prefix().trim_end();
        if !this_quals.is_empty() {
            buf.push(' ');
            buf.push_str(this_quals);
        }
        if let Some(kind) = info.ref_qual {
            buf.push(' ');
            buf.push_str(kind.token());
        }
        buf
    }

    /// Render an argument list `(int, const char*)`.
    pub fn arg_list(&self, types: &[Idx]) -> String {
        let rendered: Vec<String> = types.iter().map(|&t| self.ty(t)).collect();
        format!("({})", rendered.join(", "))
    }

    fn ty_into(&self, idx: Idx, buf: &mut String) {
        match self.pool.data(idx) {
            TypeData::Fundamental(f) => buf.push_str(f.name()),
            TypeData::Error => buf.push_str("<error>"),
            TypeData::Qualified { inner, quals } => {
                let postfix = self.pool.is_pointer(*inner)
                    || self.pool.as_member_pointer(*inner).is_some();
                if postfix {
                    self.ty_into(*inner, buf);
                    buf.push(' ');
                    buf.push_str(quals.prefix().trim_end());
                } else {
                    buf.push_str(quals.prefix());
                    self.ty_into(*inner, buf);
                }
            }
            TypeData::Pointer(pointee) => self.declarator(*pointee, "*", buf),
            TypeData::Reference { referee, kind } => self.declarator(*referee, kind.token(), buf),
            TypeData::Array { elem, len } => {
                self.ty_into(*elem, buf);
                match len {
                    Some(n) => buf.push_str(&format!("[{n}]")),
                    None => buf.push_str("[]"),
                }
            }
            TypeData::Function {
                params,
                ret,
                variadic,
            } => {
                self.ty_into(*ret, buf);
                self.params_into(params, *variadic, buf);
            }
            TypeData::MemberPointer { class, pointee } => {
                self.ty_into(*pointee, buf);
                buf.push(' ');
                self.ty_into(*class, buf);
                buf.push_str("::*");
            }
            TypeData::Class(id) | TypeData::Enum(id) => {
                buf.push_str(&self.symbols.qualified_name(*id, self.interner));
            }
            TypeData::TemplateParam { depth, index, name } => {
                if name.is_empty() {
                    buf.push_str(&format!("T{depth}_{index}"));
                } else {
                    buf.push_str(self.interner.lookup(*name));
                }
            }
            TypeData::TemplateSelector { scope, name } => {
                buf.push_str("typename ");
                self.ty_into(*scope, buf);
                buf.push_str("::");
                buf.push_str(self.interner.lookup(*name));
            }
        }
    }

    /// Pointer or reference declarator; functions and arrays need
    /// parentheses around the token.
    fn declarator(&self, inner: Idx, token: &str, buf: &mut String) {
        if let Some((params, ret, variadic)) = self.pool.as_function(inner) {
            self.ty_into(ret, buf);
            buf.push_str(&format!(" ({token})"));
            self.params_into(params, variadic, buf);
        } else if let Some((elem, len)) = self.pool.as_array(inner) {
            self.ty_into(elem, buf);
            buf.push_str(&format!(" ({token})"));
            match len {
                Some(n) => buf.push_str(&format!("[{n}]")),
                None => buf.push_str("[]"),
            }
        } else {
            self.ty_into(inner, buf);
            buf.push_str(token);
        }
    }

    fn params_into(&self, params: &[Idx], variadic: bool, buf: &mut String) {
        buf.push('(');
        for (i, &param) in params.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            self.ty_into(param, buf);
        }
        if variadic {
            if !params.is_empty() {
                buf.push_str(", ");
            }
            buf.push_str("...");
        }
        buf.push(')');
    }
}
