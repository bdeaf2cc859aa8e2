//! Interned type graph.
//!
//! Every type is a [`TypeData`] node stored once in the [`Pool`] and named
//! by an [`Idx`]. Structural equality is decided at interning time, so two
//! indices are the same type exactly when they are equal.
//!
//! Canonical forms enforced by the constructors in `construct.rs`:
//! - a `Qualified` node never wraps another `Qualified` node, a reference,
//!   a function or an array (array cv moves to the element)
//! - references to references collapse (`T& &&` is `T&`)
//! - the error type absorbs every constructor

mod construct;
mod format;
mod query;

pub use format::TypePrinter;

use cxx_ir::Name;
use rustc_hash::FxHashMap;

use crate::{Fundamental, Idx, Quals, SymbolId};

/// Reference kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RefKind {
    Lvalue,
    Rvalue,
}

impl RefKind {
    pub const fn token(self) -> &'static str {
        match self {
            RefKind::Lvalue => "&",
            RefKind::Rvalue => "&&",
        }
    }
}

/// A type node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    Fundamental(Fundamental),
    /// cv-qualified wrapper; `inner` is never itself qualified.
    Qualified { inner: Idx, quals: Quals },
    Pointer(Idx),
    Reference { referee: Idx, kind: RefKind },
    /// `len` is `None` for arrays of unknown bound.
    Array { elem: Idx, len: Option<u64> },
    Function {
        params: Box<[Idx]>,
        ret: Idx,
        variadic: bool,
    },
    /// `pointee Class::*`.
    MemberPointer { class: Idx, pointee: Idx },
    Enum(SymbolId),
    Class(SymbolId),
    /// Template type parameter, identified by nesting depth and position.
    TemplateParam { depth: u32, index: u32, name: Name },
    /// Dependent member type `typename Scope::name`.
    TemplateSelector { scope: Idx, name: Name },
    Error,
}

static ERROR_DATA: TypeData = TypeData::Error;

/// The type pool.
#[derive(Clone, Debug)]
pub struct Pool {
    items: Vec<TypeData>,
    map: FxHashMap<TypeData, Idx>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// Create a pool with the fundamentals and the error type pre-interned.
    pub fn new() -> Self {
        let mut pool = Pool {
            items: Vec::with_capacity(256),
            map: FxHashMap::default(),
        };
        for f in Fundamental::ALL {
            let idx = pool.intern(TypeData::Fundamental(f));
            debug_assert_eq!(idx, f.idx());
        }
        let error = pool.intern(TypeData::Error);
        debug_assert_eq!(error, Idx::ERROR);
        pool
    }

    /// Intern a node, returning the existing index for equal nodes.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "pool size is bounded far below u32::MAX"
    )]
    fn intern(&mut self, data: TypeData) -> Idx {
        if let Some(&idx) = self.map.get(&data) {
            return idx;
        }
        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(data.clone());
        self.map.insert(data, idx);
        idx
    }

    /// The node behind an index.
    ///
    /// Indices come only from this pool, so an out-of-range index is a bug;
    /// it reads as the error type rather than panicking.
    #[inline]
    pub fn data(&self, idx: Idx) -> &TypeData {
        self.items
            .get(idx.raw() as usize)
            .unwrap_or(&ERROR_DATA)
    }

    /// Number of interned types.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests;
