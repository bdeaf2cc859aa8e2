//! Type construction. Each constructor returns the canonical index.

use cxx_ir::Name;

use super::{Pool, RefKind, TypeData};
use crate::{Idx, Quals, SymbolId};

impl Pool {
    /// Add qualifiers to a type.
    ///
    /// Qualifiers merge with existing ones, apply to the element of an
    /// array, and are dropped on references and functions.
    pub fn qualified(&mut self, ty: Idx, quals: Quals) -> Idx {
        if quals.is_empty() || ty.is_error() {
            return ty;
        }
        match *self.data(ty) {
            TypeData::Qualified { inner, quals: existing } => self.intern(TypeData::Qualified {
                inner,
                quals: existing | quals,
            }),
            TypeData::Reference { .. } | TypeData::Function { .. } => ty,
            TypeData::Array { elem, len } => {
                let elem = self.qualified(elem, quals);
                self.array(elem, len)
            }
            _ => self.intern(TypeData::Qualified { inner: ty, quals }),
        }
    }

    /// `const T`.
    pub fn const_of(&mut self, ty: Idx) -> Idx {
        self.qualified(ty, Quals::CONST)
    }

    /// Replace the top-level qualifiers of `ty` with exactly `quals`.
    pub fn with_quals(&mut self, ty: Idx, quals: Quals) -> Idx {
        let bare = self.unqualified(ty);
        self.qualified(bare, quals)
    }

    pub fn pointer(&mut self, pointee: Idx) -> Idx {
        if pointee.is_error() {
            return Idx::ERROR;
        }
        self.intern(TypeData::Pointer(pointee))
    }

    /// Form a reference, collapsing references to references.
    ///
    /// An lvalue reference anywhere in the pair wins; two rvalue references
    /// collapse to an rvalue reference.
    pub fn reference(&mut self, referee: Idx, kind: RefKind) -> Idx {
        if referee.is_error() {
            return Idx::ERROR;
        }
        if let TypeData::Reference {
            referee: inner,
            kind: inner_kind,
        } = *self.data(referee)
        {
            let collapsed = if kind == RefKind::Lvalue || inner_kind == RefKind::Lvalue {
                RefKind::Lvalue
            } else {
                RefKind::Rvalue
            };
            return self.intern(TypeData::Reference {
                referee: inner,
                kind: collapsed,
            });
        }
        self.intern(TypeData::Reference { referee, kind })
    }

    pub fn lvalue_ref(&mut self, referee: Idx) -> Idx {
        self.reference(referee, RefKind::Lvalue)
    }

    pub fn rvalue_ref(&mut self, referee: Idx) -> Idx {
        self.reference(referee, RefKind::Rvalue)
    }

    pub fn array(&mut self, elem: Idx, len: Option<u64>) -> Idx {
        if elem.is_error() {
            return Idx::ERROR;
        }
        self.intern(TypeData::Array { elem, len })
    }

    pub fn function(&mut self, params: &[Idx], ret: Idx, variadic: bool) -> Idx {
        if ret.is_error() || params.iter().any(|p| p.is_error()) {
            return Idx::ERROR;
        }
        self.intern(TypeData::Function {
            params: params.into(),
            ret,
            variadic,
        })
    }

    /// `pointee Class::*`.
    pub fn member_pointer(&mut self, class: Idx, pointee: Idx) -> Idx {
        if class.is_error() || pointee.is_error() {
            return Idx::ERROR;
        }
        self.intern(TypeData::MemberPointer { class, pointee })
    }

    pub fn class_type(&mut self, class: SymbolId) -> Idx {
        self.intern(TypeData::Class(class))
    }

    pub fn enum_type(&mut self, enumeration: SymbolId) -> Idx {
        self.intern(TypeData::Enum(enumeration))
    }

    pub fn template_param(&mut self, depth: u32, index: u32, name: Name) -> Idx {
        self.intern(TypeData::TemplateParam { depth, index, name })
    }

    /// `typename Scope::name`.
    pub fn template_selector(&mut self, scope: Idx, name: Name) -> Idx {
        if scope.is_error() {
            return Idx::ERROR;
        }
        self.intern(TypeData::TemplateSelector { scope, name })
    }
}
