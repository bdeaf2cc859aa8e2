//! Engine configuration.

use cxx_diagnostic::DiagnosticConfig;

use crate::Fundamental;

/// Target description consulted by arithmetic conversions.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetInfo {
    pub char_bits: u8,
    pub short_bits: u8,
    pub int_bits: u8,
    pub long_bits: u8,
    pub long_long_bits: u8,
    pub wchar_bits: u8,
    pub char_signed: bool,
    pub wchar_signed: bool,
    /// Tag same-width conversions between `int`/`long`-rank integers as
    /// weak, so they beat ordinary integral conversions.
    pub prefer_same_width_integral: bool,
}

impl Default for TargetInfo {
    /// LP64 with a signed `char`.
    fn default() -> Self {
        TargetInfo {
            char_bits: 8,
            short_bits: 16,
            int_bits: 32,
            long_bits: 64,
            long_long_bits: 64,
            wchar_bits: 32,
            char_signed: true,
            wchar_signed: true,
            prefer_same_width_integral: false,
        }
    }
}

impl TargetInfo {
    /// LLP64 (`long` is 32 bits, 16-bit unsigned `wchar_t`).
    pub fn llp64() -> Self {
        TargetInfo {
            long_bits: 32,
            wchar_bits: 16,
            wchar_signed: false,
            ..Self::default()
        }
    }

    /// ILP32.
    pub fn ilp32() -> Self {
        TargetInfo {
            long_bits: 32,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_same_width_preference(mut self, enabled: bool) -> Self {
        self.prefer_same_width_integral = enabled;
        self
    }

    /// Width in bits of an arithmetic type.
    pub fn width(&self, f: Fundamental) -> u32 {
        let bits = match f {
            Fundamental::Bool => 1,
            Fundamental::Char | Fundamental::SChar | Fundamental::UChar => self.char_bits,
            Fundamental::WChar => self.wchar_bits,
            Fundamental::Char16 => 16,
            Fundamental::Char32 => 32,
            Fundamental::Short | Fundamental::UShort => self.short_bits,
            Fundamental::Int | Fundamental::UInt => self.int_bits,
            Fundamental::Long | Fundamental::ULong => self.long_bits,
            Fundamental::LongLong | Fundamental::ULongLong => self.long_long_bits,
            Fundamental::Float => 32,
            Fundamental::Double => 64,
            Fundamental::LongDouble => 128,
            Fundamental::Void | Fundamental::NullPtr => 0,
        };
        u32::from(bits)
    }

    pub fn is_signed(&self, f: Fundamental) -> bool {
        match f {
            Fundamental::Char => self.char_signed,
            Fundamental::WChar => self.wchar_signed,
            Fundamental::SChar
            | Fundamental::Short
            | Fundamental::Int
            | Fundamental::Long
            | Fundamental::LongLong => true,
            _ => f.is_floating(),
        }
    }

    /// Every value of integral type `from` is representable in `to`.
    pub fn represents_all(&self, to: Fundamental, from: Fundamental) -> bool {
        let (to_w, from_w) = (self.width(to), self.width(from));
        match (self.is_signed(to), self.is_signed(from)) {
            (true, true) | (false, false) => from_w <= to_w,
            (true, false) => from_w < to_w,
            (false, true) => false,
        }
    }
}

/// Reentrancy bounds for the recursive parts of the engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RecursionLimits {
    /// Nested user-defined conversion searches.
    pub user_conversion: u32,
    /// Nested template argument deductions.
    pub deduction: u32,
    /// Nested probing resolutions (deletion checks, noexcept evaluation).
    pub probe: u32,
    /// Nested class completions (member classes completed on demand).
    pub class_completion: u32,
}

impl Default for RecursionLimits {
    fn default() -> Self {
        RecursionLimits {
            user_conversion: 4,
            deduction: 64,
            probe: 32,
            class_completion: 256,
        }
    }
}

/// Options for a [`Sema`](crate::Sema) instance.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SemaOptions {
    pub target: TargetInfo,
    pub limits: RecursionLimits,
    /// In move resolution, discard deleted candidates and resolve again
    /// over the rest.
    pub deleted_move_fallback: bool,
    pub diagnostics: DiagnosticConfig,
}

impl Default for SemaOptions {
    fn default() -> Self {
        SemaOptions {
            target: TargetInfo::default(),
            limits: RecursionLimits::default(),
            deleted_move_fallback: true,
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

impl SemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetInfo) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: RecursionLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn with_deleted_move_fallback(mut self, enabled: bool) -> Self {
        self.deleted_move_fallback = enabled;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, config: DiagnosticConfig) -> Self {
        self.diagnostics = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_move_fallback() {
        assert!(SemaOptions::new().deleted_move_fallback);
        assert!(!SemaOptions::new()
            .with_deleted_move_fallback(false)
            .deleted_move_fallback);
    }

    #[test]
    fn representability() {
        let t = TargetInfo::default();
        assert!(t.represents_all(Fundamental::Int, Fundamental::Short));
        assert!(t.represents_all(Fundamental::Int, Fundamental::UShort));
        assert!(!t.represents_all(Fundamental::Int, Fundamental::UInt));
        assert!(!t.represents_all(Fundamental::UInt, Fundamental::Int));
        assert!(t.represents_all(Fundamental::Long, Fundamental::UInt));
    }

    #[test]
    fn llp64_long_is_int_width() {
        let t = TargetInfo::llp64();
        assert_eq!(t.width(Fundamental::Long), t.width(Fundamental::Int));
        assert!(!t.is_signed(Fundamental::WChar));
    }
}
