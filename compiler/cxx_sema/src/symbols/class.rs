//! Class layout records.

use cxx_ir::Name;

use super::{Access, Scope, SymbolId};
use crate::Idx;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassKey {
    Class,
    Struct,
    Union,
}

impl ClassKey {
    /// Default access of members and bases.
    pub const fn default_access(self) -> Access {
        match self {
            ClassKey::Class => Access::Private,
            ClassKey::Struct | ClassKey::Union => Access::Public,
        }
    }
}

/// One entry of a base-specifier list.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct BaseSpec {
    pub class: SymbolId,
    pub access: Access,
    pub is_virtual: bool,
    /// Byte offset of the non-virtual base subobject.
    pub offset: u32,
}

/// A non-static data member.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: Idx,
    pub access: Access,
    /// Has a default member initializer (`int x = 0;`).
    pub has_initializer: bool,
    pub bit_width: Option<u32>,
}

impl FieldDecl {
    pub fn new(name: Name, ty: Idx) -> Self {
        FieldDecl {
            name,
            ty,
            access: Access::Public,
            has_initializer: false,
            bit_width: None,
        }
    }

    #[must_use]
    pub fn with_initializer(mut self) -> Self {
        self.has_initializer = true;
        self
    }

    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }
}

/// A class, struct or union.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ClassInfo {
    pub key: ClassKey,
    /// The class type in the pool.
    pub ty: Idx,
    pub bases: Vec<BaseSpec>,
    pub fields: Vec<FieldDecl>,
    pub scope: Scope,
    /// Friend classes and functions.
    pub friends: Vec<SymbolId>,
    /// Set once implicit members have been declared.
    pub complete: bool,
}

impl ClassInfo {
    pub fn new(key: ClassKey, ty: Idx) -> Self {
        ClassInfo {
            key,
            ty,
            bases: Vec::new(),
            fields: Vec::new(),
            scope: Scope::default(),
            friends: Vec::new(),
            complete: false,
        }
    }

    #[inline]
    pub fn is_union(&self) -> bool {
        self.key == ClassKey::Union
    }

    pub fn field_index(&self, name: Name) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}
