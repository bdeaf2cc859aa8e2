//! Bit sets for qualifiers, symbol properties and call-site properties.

use bitflags::bitflags;

bitflags! {
    /// cv-qualifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Quals: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
    }
}

impl Quals {
    pub const CV: Self = Self::CONST.union(Self::VOLATILE);

    /// `self` has every qualifier of `other`.
    #[inline]
    pub const fn at_least(self, other: Self) -> bool {
        self.contains(other)
    }

    /// `self` is a strict subset of `other`.
    #[inline]
    pub fn fewer_than(self, other: Self) -> bool {
        self != other && other.contains(self)
    }

    /// C++ spelling with a trailing space, or empty.
    pub const fn prefix(self) -> &'static str {
        match (self.contains(Self::CONST), self.contains(Self::VOLATILE)) {
            (true, true) => "const volatile ",
            (true, false) => "const ",
            (false, true) => "volatile ",
            (false, false) => "",
        }
    }
}

bitflags! {
    /// Properties of a declared symbol.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SymbolFlags: u32 {
        // === Special-member kinds (bits 0-7) ===

        const CONSTRUCTOR = 1 << 0;
        const DESTRUCTOR = 1 << 1;
        /// Conversion operator (`operator T()`).
        const CONVERSION = 1 << 2;

        // === Declaration properties (bits 8-15) ===

        const EXPLICIT = 1 << 8;
        const DELETED = 1 << 9;
        /// Declared `= default`.
        const DEFAULTED = 1 << 10;
        const VIRTUAL = 1 << 11;
        const NOEXCEPT = 1 << 12;
        const CONSTEXPR = 1 << 13;
        /// Declared and defined by the user (not implicit, not `= default`).
        const USER_PROVIDED = 1 << 14;

        // === Synthesis results (bits 16-23) ===

        /// Declared by the compiler.
        const IMPLICIT = 1 << 16;
        const TRIVIAL = 1 << 17;
        /// Implicit copy whose use is deprecated (user-declared destructor
        /// or sibling copy operation).
        const DEPRECATED_IMPLICIT = 1 << 18;
        /// Constructor or destructor taking the hidden most-derived flag.
        const MOST_DERIVED_PARAM = 1 << 19;

        // === Templates (bits 24-31) ===

        /// Produced by template argument substitution.
        const INSTANTIATED = 1 << 24;
        /// Explicit specialization.
        const SPECIALIZED = 1 << 25;
    }
}

impl SymbolFlags {
    /// Flags that make a function a special-member candidate.
    pub const SPECIAL: Self = Self::CONSTRUCTOR.union(Self::DESTRUCTOR);

    #[inline]
    pub const fn is_deleted(self) -> bool {
        self.contains(Self::DELETED)
    }

    #[inline]
    pub const fn is_implicit(self) -> bool {
        self.contains(Self::IMPLICIT)
    }
}

bitflags! {
    /// Properties of a call site.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct CallFlags: u16 {
        /// Written as a function call `f(args)`.
        const CALL_SYNTAX = 1 << 0;
        /// Explicit template arguments were written (`f<int>(x)`).
        const EXPLICIT_TEMPLATE = 1 << 1;
        /// Argument-dependent lookup may add candidates.
        const ALLOW_ADL = 1 << 2;
        /// Failures are silent (SFINAE-like probing, deletion checks).
        const PROBE = 1 << 3;
        /// Direct-initialization: `explicit` constructors and conversion
        /// functions participate.
        const DIRECT_INIT = 1 << 4;
        /// Selecting a move operation: deleted candidates fall back.
        const MOVE_RESOLUTION = 1 << 5;
        /// User-defined conversions are not allowed for the arguments.
        const NO_USER_CONV = 1 << 6;
    }
}

impl CallFlags {
    /// An ordinary `f(args)` call with ADL.
    pub const ORDINARY: Self = Self::CALL_SYNTAX.union(Self::ALLOW_ADL);

    #[inline]
    pub const fn is_probe(self) -> bool {
        self.contains(Self::PROBE)
    }
}

bitflags! {
    /// Which user-defined conversions may be considered.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct UserConvFlags: u8 {
        /// Converting constructors of the target class.
        const CONSTRUCTORS = 1 << 0;
        /// Conversion functions of the source class.
        const CONVERSION_FUNCTIONS = 1 << 1;
        /// `explicit` candidates participate.
        const DIRECT_INIT = 1 << 2;
        /// The result must be an lvalue (binding a non-const lvalue reference).
        const LVALUE_RESULT = 1 << 3;
    }
}

impl UserConvFlags {
    pub const ALL_KINDS: Self = Self::CONSTRUCTORS.union(Self::CONVERSION_FUNCTIONS);
}

#[cfg(test)]
mod tests;
