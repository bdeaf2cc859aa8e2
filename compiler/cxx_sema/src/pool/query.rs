//! Read-only type queries.

use super::{Pool, RefKind, TypeData};
use crate::{Fundamental, Idx, Quals, SymbolId};

impl Pool {
    /// Split a type into its unqualified form and top-level qualifiers.
    #[inline]
    pub fn split_quals(&self, ty: Idx) -> (Idx, Quals) {
        match *self.data(ty) {
            TypeData::Qualified { inner, quals } => (inner, quals),
            _ => (ty, Quals::empty()),
        }
    }

    #[inline]
    pub fn unqualified(&self, ty: Idx) -> Idx {
        self.split_quals(ty).0
    }

    #[inline]
    pub fn quals(&self, ty: Idx) -> Quals {
        self.split_quals(ty).1
    }

    pub fn fundamental(&self, ty: Idx) -> Option<Fundamental> {
        match *self.data(self.unqualified(ty)) {
            TypeData::Fundamental(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_void(&self, ty: Idx) -> bool {
        self.fundamental(ty) == Some(Fundamental::Void)
    }

    pub fn is_arithmetic(&self, ty: Idx) -> bool {
        self.fundamental(ty).is_some_and(Fundamental::is_arithmetic)
    }

    pub fn is_integral(&self, ty: Idx) -> bool {
        self.fundamental(ty).is_some_and(Fundamental::is_integral)
    }

    pub fn is_floating(&self, ty: Idx) -> bool {
        self.fundamental(ty).is_some_and(Fundamental::is_floating)
    }

    /// Referee and kind of a reference type.
    pub fn as_reference(&self, ty: Idx) -> Option<(Idx, RefKind)> {
        match *self.data(ty) {
            TypeData::Reference { referee, kind } => Some((referee, kind)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_reference(&self, ty: Idx) -> bool {
        self.as_reference(ty).is_some()
    }

    /// The type with any reference removed.
    pub fn non_reference(&self, ty: Idx) -> Idx {
        self.as_reference(ty).map_or(ty, |(referee, _)| referee)
    }

    /// Pointee of a (possibly cv-qualified) pointer type.
    pub fn pointee(&self, ty: Idx) -> Option<Idx> {
        match *self.data(self.unqualified(ty)) {
            TypeData::Pointer(pointee) => Some(pointee),
            _ => None,
        }
    }

    #[inline]
    pub fn is_pointer(&self, ty: Idx) -> bool {
        self.pointee(ty).is_some()
    }

    /// Class and pointee of a pointer-to-member type.
    pub fn as_member_pointer(&self, ty: Idx) -> Option<(Idx, Idx)> {
        match *self.data(self.unqualified(ty)) {
            TypeData::MemberPointer { class, pointee } => Some((class, pointee)),
            _ => None,
        }
    }

    /// Element and bound of an array type.
    pub fn as_array(&self, ty: Idx) -> Option<(Idx, Option<u64>)> {
        match *self.data(self.unqualified(ty)) {
            TypeData::Array { elem, len } => Some((elem, len)),
            _ => None,
        }
    }

    /// Parameters, return type and variadic-ness of a function type.
    pub fn as_function(&self, ty: Idx) -> Option<(&[Idx], Idx, bool)> {
        match self.data(ty) {
            TypeData::Function {
                params,
                ret,
                variadic,
            } => Some((&params[..], *ret, *variadic)),
            _ => None,
        }
    }

    pub fn is_function(&self, ty: Idx) -> bool {
        self.as_function(ty).is_some()
    }

    /// Class symbol of a (possibly cv-qualified) class type.
    pub fn class_of(&self, ty: Idx) -> Option<SymbolId> {
        match *self.data(self.unqualified(ty)) {
            TypeData::Class(id) => Some(id),
            _ => None,
        }
    }

    pub fn enum_of(&self, ty: Idx) -> Option<SymbolId> {
        match *self.data(self.unqualified(ty)) {
            TypeData::Enum(id) => Some(id),
            _ => None,
        }
    }

    /// Element type after stripping every array dimension.
    pub fn strip_arrays(&self, ty: Idx) -> Idx {
        let mut ty = ty;
        while let Some((elem, _)) = self.as_array(ty) {
            ty = elem;
        }
        ty
    }

    /// Scalar types: arithmetic, enum, pointer, member pointer, `nullptr_t`.
    pub fn is_scalar(&self, ty: Idx) -> bool {
        match *self.data(self.unqualified(ty)) {
            TypeData::Fundamental(f) => f != Fundamental::Void,
            TypeData::Pointer(_) | TypeData::MemberPointer { .. } | TypeData::Enum(_) => true,
            _ => false,
        }
    }

    /// Object types: anything but functions, references and `void`.
    pub fn is_object(&self, ty: Idx) -> bool {
        !(self.is_function(ty) || self.is_reference(ty) || self.is_void(ty))
    }

    /// The type mentions a template parameter or dependent name.
    pub fn is_dependent(&self, ty: Idx) -> bool {
        match self.data(ty) {
            TypeData::TemplateParam { .. } | TypeData::TemplateSelector { .. } => true,
            TypeData::Qualified { inner, .. } => self.is_dependent(*inner),
            TypeData::Pointer(inner) => self.is_dependent(*inner),
            TypeData::Reference { referee, .. } => self.is_dependent(*referee),
            TypeData::Array { elem, .. } => self.is_dependent(*elem),
            TypeData::Function { params, ret, .. } => {
                self.is_dependent(*ret) || params.iter().any(|p| self.is_dependent(*p))
            }
            TypeData::MemberPointer { class, pointee } => {
                self.is_dependent(*class) || self.is_dependent(*pointee)
            }
            TypeData::Fundamental(_)
            | TypeData::Enum(_)
            | TypeData::Class(_)
            | TypeData::Error => false,
        }
    }
}
