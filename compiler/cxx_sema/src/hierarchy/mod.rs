//! Inheritance queries: base subobjects, virtual bases, access.
//!
//! A base class `B` of `D` may be reachable along several paths. Paths
//! that pass through the same virtual base and then follow the same
//! non-virtual edges name the same subobject; a conversion `D -> B` is
//! only well-formed when every path names the same subobject.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{Access, BaseSpec, SymbolFlags, SymbolId, SymbolTable};

/// Result of looking for `base` among the bases of `derived`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BaseLookup {
    NotBase,
    Unique(BasePath),
    /// More than one distinct subobject.
    Ambiguous,
}

/// Summary of the paths to a unique base subobject.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BasePath {
    /// Fewest inheritance edges on any path.
    pub distance: u32,
    /// Least restrictive access over all paths, where each path's access is
    /// its most restrictive edge.
    pub access: Access,
    /// Some path crosses a virtual edge.
    pub through_virtual: bool,
}

/// Subobject identity: the last virtual base crossed, then the
/// non-virtual classes after it.
type SubobjectKey = (Option<SymbolId>, SmallVec<[SymbolId; 4]>);

struct PathEdge {
    from: SymbolId,
    to: SymbolId,
    access: Access,
    is_virtual: bool,
}

impl SymbolTable {
    pub fn direct_bases(&self, class: SymbolId) -> &[BaseSpec] {
        self.class(class)
            .map(|info| info.bases.as_slice())
            .unwrap_or_default()
    }

    /// `base` is a proper base class of `derived`.
    pub fn is_base_of(&self, base: SymbolId, derived: SymbolId) -> bool {
        self.direct_bases(derived)
            .iter()
            .any(|b| b.class == base || self.is_base_of(base, b.class))
    }

    /// Find the `base` subobject of `derived`.
    pub fn lookup_base(&self, derived: SymbolId, base: SymbolId) -> BaseLookup {
        let paths = self.base_paths(derived, base);
        if paths.is_empty() {
            return BaseLookup::NotBase;
        }
        let mut keys: FxHashSet<SubobjectKey> = FxHashSet::default();
        for path in &paths {
            keys.insert(subobject_key(path));
        }
        if keys.len() > 1 {
            return BaseLookup::Ambiguous;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "inheritance depth is tiny"
        )]
        let distance = paths.iter().map(Vec::len).min().unwrap_or(0) as u32;
        let access = paths
            .iter()
            .map(|p| p.iter().map(|e| e.access).max().unwrap_or(Access::Public))
            .min()
            .unwrap_or(Access::Public);
        let through_virtual = paths.iter().any(|p| p.iter().any(|e| e.is_virtual));
        BaseLookup::Unique(BasePath {
            distance,
            access,
            through_virtual,
        })
    }

    /// Whether the `derived -> base` conversion is accessible from `from`
    /// (a class, or `None` for non-member code).
    ///
    /// An edge is usable if it is public, if `from` is the deriving class or
    /// its friend, or if it is protected and `from` derives from the
    /// deriving class.
    pub fn base_accessible(&self, derived: SymbolId, base: SymbolId, from: Option<SymbolId>) -> bool {
        self.base_paths(derived, base).iter().any(|path| {
            path.iter()
                .all(|edge| self.edge_accessible(edge.from, edge.access, from))
        })
    }

    fn edge_accessible(&self, class: SymbolId, access: Access, from: Option<SymbolId>) -> bool {
        match access {
            Access::Public => true,
            Access::Protected => from.is_some_and(|f| {
                f == class || self.is_friend(class, f) || self.is_base_of(class, f)
            }),
            Access::Private => from.is_some_and(|f| f == class || self.is_friend(class, f)),
        }
    }

    /// `who` is declared a friend of `class`.
    pub fn is_friend(&self, class: SymbolId, who: SymbolId) -> bool {
        self.class(class)
            .is_some_and(|info| info.friends.contains(&who))
    }

    /// Whether `member` may be named from `from`.
    pub fn is_accessible(&self, member: SymbolId, from: Option<SymbolId>) -> bool {
        let symbol = self.get(member);
        match symbol.parent {
            Some(owner) if self.class(owner).is_some() => {
                self.edge_accessible(owner, symbol.access, from)
            }
            _ => true,
        }
    }

    /// Virtual bases of `class`, each once, in the order they are
    /// constructed: a post-order depth-first left-to-right walk of the
    /// inheritance graph, so a virtual base comes after its own virtual
    /// bases.
    pub fn virtual_bases(&self, class: SymbolId) -> Vec<SymbolId> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        self.collect_virtual_bases(class, &mut seen, &mut out);
        out
    }

    fn collect_virtual_bases(
        &self,
        class: SymbolId,
        seen: &mut FxHashSet<SymbolId>,
        out: &mut Vec<SymbolId>,
    ) {
        for base in self.direct_bases(class) {
            self.collect_virtual_bases(base.class, seen, out);
            if base.is_virtual && seen.insert(base.class) {
                out.push(base.class);
            }
        }
    }

    pub fn has_virtual_bases(&self, class: SymbolId) -> bool {
        self.direct_bases(class)
            .iter()
            .any(|b| b.is_virtual || self.has_virtual_bases(b.class))
    }

    /// The class declares or inherits a virtual function.
    pub fn is_polymorphic(&self, class: SymbolId) -> bool {
        self.member_functions(class)
            .any(|m| self.get(m).flags.contains(SymbolFlags::VIRTUAL))
            || self
                .direct_bases(class)
                .iter()
                .any(|b| self.is_polymorphic(b.class))
    }

    /// The class needs a vtable pointer installed by its constructors.
    pub fn needs_vptr(&self, class: SymbolId) -> bool {
        self.is_polymorphic(class) || self.has_virtual_bases(class)
    }

    /// Braced lists initialize the fields directly: no user-declared
    /// constructors, no bases, no virtual functions, public fields only.
    pub fn is_aggregate(&self, class: SymbolId) -> bool {
        let Some(info) = self.class(class) else {
            return false;
        };
        let user_ctor = self.constructors(class).into_iter().any(|c| {
            !self.get(c).flags.is_implicit()
        });
        !user_ctor
            && info.bases.is_empty()
            && !self.is_polymorphic(class)
            && info.fields.iter().all(|f| f.access == Access::Public)
    }

    fn base_paths(&self, derived: SymbolId, base: SymbolId) -> Vec<Vec<PathEdge>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        self.walk_paths(derived, base, &mut current, &mut out);
        out
    }

    fn walk_paths(
        &self,
        class: SymbolId,
        target: SymbolId,
        current: &mut Vec<(SymbolId, SymbolId, Access, bool)>,
        out: &mut Vec<Vec<PathEdge>>,
    ) {
        for base in self.direct_bases(class) {
            current.push((class, base.class, base.access, base.is_virtual));
            if base.class == target {
                out.push(
                    current
                        .iter()
                        .map(|&(from, to, access, is_virtual)| PathEdge {
                            from,
                            to,
                            access,
                            is_virtual,
                        })
                        .collect(),
                );
            } else {
                self.walk_paths(base.class, target, current, out);
            }
            current.pop();
        }
    }
}

fn subobject_key(path: &[PathEdge]) -> SubobjectKey {
    let last_virtual = path.iter().rposition(|e| e.is_virtual);
    match last_virtual {
        Some(k) => (
            Some(path[k].to),
            path[k + 1..].iter().map(|e| e.to).collect(),
        ),
        None => (None, path.iter().map(|e| e.to).collect()),
    }
}
