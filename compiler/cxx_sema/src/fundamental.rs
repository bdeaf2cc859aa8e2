//! Fundamental (built-in) types and their arithmetic classification.

use crate::{Idx, TargetInfo};

/// A fundamental type.
///
/// Discriminants match the pre-interned [`Idx`] constants, so conversion in
/// both directions is a cast.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum Fundamental {
    Void,
    Bool,
    Char,
    SChar,
    UChar,
    WChar,
    Char16,
    Char32,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    NullPtr,
}

impl Fundamental {
    /// All fundamentals in pool order.
    pub const ALL: [Fundamental; 20] = [
        Fundamental::Void,
        Fundamental::Bool,
        Fundamental::Char,
        Fundamental::SChar,
        Fundamental::UChar,
        Fundamental::WChar,
        Fundamental::Char16,
        Fundamental::Char32,
        Fundamental::Short,
        Fundamental::UShort,
        Fundamental::Int,
        Fundamental::UInt,
        Fundamental::Long,
        Fundamental::ULong,
        Fundamental::LongLong,
        Fundamental::ULongLong,
        Fundamental::Float,
        Fundamental::Double,
        Fundamental::LongDouble,
        Fundamental::NullPtr,
    ];

    /// The pre-interned index of this type.
    #[inline]
    pub const fn idx(self) -> Idx {
        Idx::from_raw(self as u32)
    }

    /// Map a pre-interned index back to its fundamental.
    pub fn from_idx(idx: Idx) -> Option<Self> {
        Self::ALL.get(idx.raw() as usize).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Fundamental::Void => "void",
            Fundamental::Bool => "bool",
            Fundamental::Char => "char",
            Fundamental::SChar => "signed char",
            Fundamental::UChar => "unsigned char",
            Fundamental::WChar => "wchar_t",
            Fundamental::Char16 => "char16_t",
            Fundamental::Char32 => "char32_t",
            Fundamental::Short => "short",
            Fundamental::UShort => "unsigned short",
            Fundamental::Int => "int",
            Fundamental::UInt => "unsigned int",
            Fundamental::Long => "long",
            Fundamental::ULong => "unsigned long",
            Fundamental::LongLong => "long long",
            Fundamental::ULongLong => "unsigned long long",
            Fundamental::Float => "float",
            Fundamental::Double => "double",
            Fundamental::LongDouble => "long double",
            Fundamental::NullPtr => "std::nullptr_t",
        }
    }

    /// Integral types, `bool` and the character types included.
    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Fundamental::Bool
                | Fundamental::Char
                | Fundamental::SChar
                | Fundamental::UChar
                | Fundamental::WChar
                | Fundamental::Char16
                | Fundamental::Char32
                | Fundamental::Short
                | Fundamental::UShort
                | Fundamental::Int
                | Fundamental::UInt
                | Fundamental::Long
                | Fundamental::ULong
                | Fundamental::LongLong
                | Fundamental::ULongLong
        )
    }

    #[inline]
    pub const fn is_floating(self) -> bool {
        matches!(
            self,
            Fundamental::Float | Fundamental::Double | Fundamental::LongDouble
        )
    }

    #[inline]
    pub const fn is_arithmetic(self) -> bool {
        self.is_integral() || self.is_floating()
    }

    /// Character types whose promotion goes through their underlying width.
    #[inline]
    pub const fn is_wide_char(self) -> bool {
        matches!(
            self,
            Fundamental::WChar | Fundamental::Char16 | Fundamental::Char32
        )
    }

    /// Integer conversion rank. `None` for non-integral types.
    ///
    /// Wide character types take the rank of the standard integer type
    /// with the same width, so they need the target description.
    pub fn integer_rank(self, target: &TargetInfo) -> Option<u8> {
        let rank = match self {
            Fundamental::Bool => 1,
            Fundamental::Char | Fundamental::SChar | Fundamental::UChar => 2,
            Fundamental::Short | Fundamental::UShort => 3,
            Fundamental::Int | Fundamental::UInt => 4,
            Fundamental::Long | Fundamental::ULong => 5,
            Fundamental::LongLong | Fundamental::ULongLong => 6,
            Fundamental::WChar | Fundamental::Char16 | Fundamental::Char32 => {
                let width = target.width(self);
                [
                    (Fundamental::Char, 2),
                    (Fundamental::Short, 3),
                    (Fundamental::Int, 4),
                    (Fundamental::Long, 5),
                    (Fundamental::LongLong, 6),
                ]
                .into_iter()
                .find(|(f, _)| target.width(*f) >= width)
                .map_or(6, |(_, r)| r)
            }
            _ => return None,
        };
        Some(rank)
    }

    /// The type an integral promotion produces, if this type promotes.
    ///
    /// `bool` and types narrower than `int` promote to `int` when `int`
    /// represents every value, otherwise to `unsigned int`. Wide character
    /// types promote to the first of `int`, `unsigned int`, `long`,
    /// `unsigned long`, `long long`, `unsigned long long` able to hold them.
    pub fn promoted(self, target: &TargetInfo) -> Option<Fundamental> {
        if self == Fundamental::Bool {
            return Some(Fundamental::Int);
        }
        if self.is_wide_char() {
            return PROMOTION_LADDER
                .into_iter()
                .find(|candidate| target.represents_all(*candidate, self));
        }
        match self {
            Fundamental::Char
            | Fundamental::SChar
            | Fundamental::UChar
            | Fundamental::Short
            | Fundamental::UShort => {
                if target.represents_all(Fundamental::Int, self) {
                    Some(Fundamental::Int)
                } else {
                    Some(Fundamental::UInt)
                }
            }
            _ => None,
        }
    }
}

const PROMOTION_LADDER: [Fundamental; 6] = [
    Fundamental::Int,
    Fundamental::UInt,
    Fundamental::Long,
    Fundamental::ULong,
    Fundamental::LongLong,
    Fundamental::ULongLong,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idx_roundtrip() {
        for f in Fundamental::ALL {
            assert_eq!(Fundamental::from_idx(f.idx()), Some(f));
            assert_eq!(f.idx().name(), Some(f.name()));
        }
        assert_eq!(Fundamental::from_idx(Idx::ERROR), None);
    }

    #[test]
    fn classification() {
        assert!(Fundamental::Bool.is_integral());
        assert!(Fundamental::Char32.is_integral());
        assert!(!Fundamental::Float.is_integral());
        assert!(Fundamental::LongDouble.is_floating());
        assert!(!Fundamental::NullPtr.is_arithmetic());
        assert!(!Fundamental::Void.is_arithmetic());
    }

    #[test]
    fn narrow_types_promote_to_int() {
        let target = TargetInfo::default();
        assert_eq!(Fundamental::Bool.promoted(&target), Some(Fundamental::Int));
        assert_eq!(Fundamental::UChar.promoted(&target), Some(Fundamental::Int));
        assert_eq!(Fundamental::UShort.promoted(&target), Some(Fundamental::Int));
        assert_eq!(Fundamental::Int.promoted(&target), None);
        assert_eq!(Fundamental::Long.promoted(&target), None);
    }

    #[test]
    fn wide_chars_promote_by_width() {
        let target = TargetInfo::default();
        assert_eq!(Fundamental::Char16.promoted(&target), Some(Fundamental::Int));
        // 32-bit unsigned does not fit in a 32-bit int.
        assert_eq!(
            Fundamental::Char32.promoted(&target),
            Some(Fundamental::UInt)
        );
    }

    #[test]
    fn unsigned_short_promotes_to_unsigned_when_same_width_as_int() {
        let target = TargetInfo {
            short_bits: 16,
            int_bits: 16,
            ..TargetInfo::default()
        };
        assert_eq!(
            Fundamental::UShort.promoted(&target),
            Some(Fundamental::UInt)
        );
        assert_eq!(Fundamental::Short.promoted(&target), Some(Fundamental::Int));
    }

    #[test]
    fn integer_ranks_are_ordered() {
        let target = TargetInfo::default();
        let rank = |f: Fundamental| f.integer_rank(&target);
        assert!(rank(Fundamental::Bool) < rank(Fundamental::Char));
        assert!(rank(Fundamental::Short) < rank(Fundamental::Int));
        assert_eq!(rank(Fundamental::Int), rank(Fundamental::UInt));
        assert_eq!(rank(Fundamental::Char32), rank(Fundamental::Int));
        assert_eq!(rank(Fundamental::Double), None);
    }
}
