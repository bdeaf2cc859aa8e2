//! Spelling table behind [`Name`].
//!
//! The parser front end and the semantic core share one table per
//! translation unit. Spellings are leaked so lookups can hand out
//! `&'static str` without holding the lock.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use rustc_hash::FxHashMap;

use super::Name;

/// The table ran out of 32-bit indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternError {
    pub spelling: String,
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no room left to intern `{}`", self.spelling)
    }
}

impl std::error::Error for InternError {}

/// Names the semantic core asks for by spelling.
const KNOWN_SPELLINGS: &[&str] = &[
    "",
    "operator=",
    "operator()",
    "operator[]",
    "operator->",
    "operator==",
    "operator<",
    "operator+",
    "operator-",
    "operator*",
    "std",
];

#[derive(Default)]
struct Table {
    by_spelling: FxHashMap<&'static str, Name>,
    spellings: Vec<&'static str>,
}

impl Table {
    fn push(&mut self, spelling: &str) -> Result<Name, InternError> {
        let Ok(raw) = u32::try_from(self.spellings.len()) else {
            return Err(InternError {
                spelling: spelling.to_owned(),
            });
        };
        let name = Name::from_raw(raw);
        let leaked: &'static str = Box::leak(Box::from(spelling));
        self.spellings.push(leaked);
        self.by_spelling.insert(leaked, name);
        Ok(name)
    }
}

pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    /// A table holding the empty string at [`Name::EMPTY`] followed by
    /// the operator spellings special-member synthesis looks up.
    pub fn new() -> Self {
        let mut table = Table::default();
        for spelling in KNOWN_SPELLINGS {
            // A fresh table cannot be full.
            let _ = table.push(spelling);
        }
        StringInterner {
            table: RwLock::new(table),
        }
    }

    pub fn try_intern(&self, spelling: &str) -> Result<Name, InternError> {
        let table = self.table.upgradable_read();
        if let Some(&name) = table.by_spelling.get(spelling) {
            return Ok(name);
        }
        RwLockUpgradableReadGuard::upgrade(table).push(spelling)
    }

    /// # Panics
    /// After `u32::MAX` distinct spellings.
    pub fn intern(&self, spelling: &str) -> Name {
        match self.try_intern(spelling) {
            Ok(name) => name,
            Err(e) => panic!("{e}"),
        }
    }

    /// Spelling of `name`; `<?>` for a name this table never issued.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table.read().spellings.get(name.index()).copied().unwrap_or("<?>")
    }

    /// The name of `spelling` if it was interned before.
    pub fn get(&self, spelling: &str) -> Option<Name> {
        self.table.read().by_spelling.get(spelling).copied()
    }

    pub fn len(&self) -> usize {
        self.table.read().spellings.len()
    }

    /// Never true: the empty spelling is always present.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle so a test harness and the analyzer can share a table.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner::default()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &StringInterner {
        &self.0
    }
}
