//! Type index handle.
//!
//! `Idx` is the only type representation the engine passes around. Every
//! type lives in the [`Pool`](crate::Pool) and is referenced by a 32-bit
//! index, so type equality is index equality.
//!
//! The fundamental types occupy fixed indices and are interned when the pool
//! is created, in the same order as [`Fundamental::ALL`](crate::Fundamental::ALL).

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Fundamental Types (indices 0-19) ===

    pub const VOID: Self = Self(0);
    pub const BOOL: Self = Self(1);
    pub const CHAR: Self = Self(2);
    pub const SCHAR: Self = Self(3);
    pub const UCHAR: Self = Self(4);
    pub const WCHAR: Self = Self(5);
    pub const CHAR16: Self = Self(6);
    pub const CHAR32: Self = Self(7);
    pub const SHORT: Self = Self(8);
    pub const USHORT: Self = Self(9);
    pub const INT: Self = Self(10);
    pub const UINT: Self = Self(11);
    pub const LONG: Self = Self(12);
    pub const ULONG: Self = Self(13);
    pub const LLONG: Self = Self(14);
    pub const ULLONG: Self = Self(15);
    pub const FLOAT: Self = Self(16);
    pub const DOUBLE: Self = Self(17);
    pub const LDOUBLE: Self = Self(18);
    /// `std::nullptr_t`.
    pub const NULLPTR: Self = Self(19);
    /// The error type. Conversions to and from it are identities.
    pub const ERROR: Self = Self(20);

    /// Number of pre-interned types (fundamentals plus the error type).
    pub const PRIMITIVE_COUNT: u32 = 21;

    /// First index for dynamically interned types.
    pub const FIRST_DYNAMIC: u32 = Self::PRIMITIVE_COUNT;

    /// Create an index from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a pre-interned type.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    /// Spelling of pre-interned types, `None` for dynamic ones.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("void"),
            1 => Some("bool"),
            2 => Some("char"),
            3 => Some("signed char"),
            4 => Some("unsigned char"),
            5 => Some("wchar_t"),
            6 => Some("char16_t"),
            7 => Some("char32_t"),
            8 => Some("short"),
            9 => Some("unsigned short"),
            10 => Some("int"),
            11 => Some("unsigned int"),
            12 => Some("long"),
            13 => Some("unsigned long"),
            14 => Some("long long"),
            15 => Some("unsigned long long"),
            16 => Some("float"),
            17 => Some("double"),
            18 => Some("long double"),
            19 => Some("std::nullptr_t"),
            20 => Some("<error>"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx({name})"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "type#{}", self.0),
        }
    }
}

const _: () = assert!(std::mem::size_of::<Idx>() == 4);
