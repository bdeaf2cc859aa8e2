//! Implicit conversion sequences.
//!
//! A [`ConversionSeq`] records the ordered steps that turn one argument
//! into a parameter, plus the metadata the ranker needs to compare two
//! sequences for the same argument: how a reference was bound, which base
//! class a derived-to-base step reached, which qualifiers a pointer
//! conversion added, and (for user-defined sequences) the conversion
//! function and its second standard leg.
//!
//! Computation lives in `standard.rs` (dispatch, pointer and class rules),
//! `arith.rs`, `reference.rs` and `init_list.rs`.

mod arith;
mod init_list;
mod reference;
mod standard;

pub use arith::arithmetic_conversion;

use std::fmt;

use smallvec::SmallVec;

use crate::{Idx, Quals, RefKind, SymbolId};

/// One step of a conversion sequence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConvKind {
    Identity,
    LvalueToRvalue,
    ArrayToPointer,
    FunctionToPointer,
    Qualification,
    /// String literal to non-const `char*`.
    DeprecatedStringQualification,
    DerivedToBase,
    IntegralPromotion,
    FloatingPromotion,
    /// Same-width integral conversion, preferred on some targets.
    IntegralConversionWeak,
    IntegralConversion,
    FloatingConversion,
    FloatingIntegral,
    /// `Derived*` to `Base*`.
    PointerConversion,
    PointerToVoid,
    NullPointer,
    /// `T Base::*` to `T Derived::*`.
    MemberPointer,
    Boolean,
    User,
    Ellipsis,
    Invalid,
}

impl ConvKind {
    pub const fn rank(self) -> ConvRank {
        match self {
            ConvKind::Identity
            | ConvKind::LvalueToRvalue
            | ConvKind::ArrayToPointer
            | ConvKind::FunctionToPointer
            | ConvKind::Qualification => ConvRank::Exact,
            ConvKind::IntegralPromotion | ConvKind::FloatingPromotion => ConvRank::Promotion,
            ConvKind::Boolean => ConvRank::Boolean,
            ConvKind::DeprecatedStringQualification
            | ConvKind::DerivedToBase
            | ConvKind::IntegralConversionWeak
            | ConvKind::IntegralConversion
            | ConvKind::FloatingConversion
            | ConvKind::FloatingIntegral
            | ConvKind::PointerConversion
            | ConvKind::PointerToVoid
            | ConvKind::NullPointer
            | ConvKind::MemberPointer
            | ConvKind::User
            | ConvKind::Ellipsis
            | ConvKind::Invalid => ConvRank::Conversion,
        }
    }

    /// Array-to-pointer, function-to-pointer and lvalue-to-rvalue.
    pub const fn is_lvalue_transformation(self) -> bool {
        matches!(
            self,
            ConvKind::LvalueToRvalue | ConvKind::ArrayToPointer | ConvKind::FunctionToPointer
        )
    }

    /// Markers that are not standard conversions.
    pub const fn is_marker(self) -> bool {
        matches!(self, ConvKind::User | ConvKind::Ellipsis | ConvKind::Invalid)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ConvKind::Identity => "identity",
            ConvKind::LvalueToRvalue => "lvalue-to-rvalue",
            ConvKind::ArrayToPointer => "array-to-pointer",
            ConvKind::FunctionToPointer => "function-to-pointer",
            ConvKind::Qualification => "qualification",
            ConvKind::DeprecatedStringQualification => "deprecated string qualification",
            ConvKind::DerivedToBase => "derived-to-base",
            ConvKind::IntegralPromotion => "integral promotion",
            ConvKind::FloatingPromotion => "floating promotion",
            ConvKind::IntegralConversionWeak => "weak integral conversion",
            ConvKind::IntegralConversion => "integral conversion",
            ConvKind::FloatingConversion => "floating conversion",
            ConvKind::FloatingIntegral => "floating-integral conversion",
            ConvKind::PointerConversion => "pointer conversion",
            ConvKind::PointerToVoid => "pointer-to-void",
            ConvKind::NullPointer => "null pointer conversion",
            ConvKind::MemberPointer => "member pointer conversion",
            ConvKind::Boolean => "boolean conversion",
            ConvKind::User => "user-defined",
            ConvKind::Ellipsis => "ellipsis",
            ConvKind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for ConvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rank of a standard conversion sequence (its worst step).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ConvRank {
    Exact,
    Promotion,
    Conversion,
    Boolean,
}

/// Kind of a whole sequence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum SeqClass {
    Standard,
    User,
    Ellipsis,
}

/// How a reference parameter was bound.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RefBinding {
    pub kind: RefKind,
    /// The reference was bound to an rvalue (or a materialized temporary).
    pub binds_rvalue: bool,
    /// Referee with top-level cv removed.
    pub referee: Idx,
    pub referee_quals: Quals,
    /// Implicit object parameter of a member function without a
    /// ref-qualifier.
    pub implicit_object: bool,
}

/// A derived-to-base adjustment (objects, pointers, member pointers) or a
/// class pointer converted to `void*` (`to` is `None`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassStep {
    pub from: SymbolId,
    pub to: Option<SymbolId>,
    pub distance: u32,
}

/// A pointer qualification adjustment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct QualStep {
    /// Target pointer type with the pointee's cv removed.
    pub similar: Idx,
    /// cv of the target pointee.
    pub quals: Quals,
}

/// The user-defined step of a sequence.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct UserStep {
    /// Converting constructor or conversion function; `None` for aggregate
    /// initialization from a braced list.
    pub function: Option<SymbolId>,
    /// Standard conversion from the function's result to the target.
    pub second: Box<ConversionSeq>,
}

/// An implicit conversion sequence.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConversionSeq {
    steps: SmallVec<[ConvKind; 4]>,
    pub binding: Option<RefBinding>,
    pub class_step: Option<ClassStep>,
    pub qual_step: Option<QualStep>,
    pub user: Option<UserStep>,
}

impl ConversionSeq {
    fn with_steps(steps: SmallVec<[ConvKind; 4]>) -> Self {
        ConversionSeq {
            steps,
            binding: None,
            class_step: None,
            qual_step: None,
            user: None,
        }
    }

    /// `[Identity]`.
    pub fn identity() -> Self {
        Self::single(ConvKind::Identity)
    }

    pub fn invalid() -> Self {
        Self::single(ConvKind::Invalid)
    }

    /// Match of an argument against `...`.
    pub fn ellipsis() -> Self {
        Self::single(ConvKind::Ellipsis)
    }

    pub fn single(kind: ConvKind) -> Self {
        let mut steps = SmallVec::new();
        steps.push(kind);
        Self::with_steps(steps)
    }

    /// Sequence from an ordered list of steps; empty means identity.
    pub fn from_steps(kinds: &[ConvKind]) -> Self {
        if kinds.is_empty() {
            return Self::identity();
        }
        Self::with_steps(kinds.iter().copied().collect())
    }

    /// Append a step. A lone `Identity` is replaced.
    pub fn push(&mut self, kind: ConvKind) {
        if self.steps.as_slice() == [ConvKind::Identity] {
            self.steps.clear();
        }
        self.steps.push(kind);
    }

    /// Splice a user-defined conversion: `[first..., User, second...]`.
    pub fn user_defined(first: &ConversionSeq, function: Option<SymbolId>, second: ConversionSeq) -> Self {
        let mut steps: SmallVec<[ConvKind; 4]> = first
            .steps
            .iter()
            .copied()
            .filter(|k| *k != ConvKind::Identity)
            .collect();
        steps.push(ConvKind::User);
        steps.extend(
            second
                .steps
                .iter()
                .copied()
                .filter(|k| *k != ConvKind::Identity),
        );
        ConversionSeq {
            steps,
            binding: second.binding,
            class_step: None,
            qual_step: None,
            user: Some(UserStep {
                function,
                second: Box::new(second),
            }),
        }
    }

    #[must_use]
    pub fn with_binding(mut self, binding: RefBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn steps(&self) -> &[ConvKind] {
        &self.steps
    }

    pub fn contains(&self, kind: ConvKind) -> bool {
        self.steps.contains(&kind)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.contains(ConvKind::Invalid)
    }

    pub fn class(&self) -> SeqClass {
        if self.contains(ConvKind::Ellipsis) {
            SeqClass::Ellipsis
        } else if self.contains(ConvKind::User) {
            SeqClass::User
        } else {
            SeqClass::Standard
        }
    }

    /// Worst rank over the standard steps.
    pub fn rank(&self) -> ConvRank {
        self.steps
            .iter()
            .filter(|k| !k.is_marker())
            .map(|k| k.rank())
            .max()
            .unwrap_or(ConvRank::Exact)
    }

    /// Steps that count for subsumption and length: everything except
    /// identity and lvalue transformations.
    pub fn significant_steps(&self) -> SmallVec<[ConvKind; 4]> {
        self.steps
            .iter()
            .copied()
            .filter(|k| *k != ConvKind::Identity && !k.is_lvalue_transformation())
            .collect()
    }

    /// Number of significant steps.
    pub fn len(&self) -> usize {
        self.significant_steps().len()
    }

    /// Only identity (or lvalue transformations).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The user-defined conversion function, if any.
    pub fn user_function(&self) -> Option<SymbolId> {
        self.user.as_ref().and_then(|u| u.function)
    }
}

impl fmt::Display for ConversionSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(step.name())?;
        }
        f.write_str("]")
    }
}

/// Knobs of one conversion computation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConvContext {
    /// User-defined conversions may be used.
    pub allow_user: bool,
    /// Direct-initialization: `explicit` conversions participate.
    pub direct_init: bool,
    /// Converting the implicit object argument of a member function
    /// without a ref-qualifier: rvalues may bind to `X&`.
    pub implicit_object: bool,
    /// Class whose code performs the conversion, for base access checks.
    pub access_from: Option<SymbolId>,
}

impl Default for ConvContext {
    fn default() -> Self {
        Self::copy_init()
    }
}

impl ConvContext {
    /// Copy-initialization of a parameter.
    pub const fn copy_init() -> Self {
        ConvContext {
            allow_user: true,
            direct_init: false,
            implicit_object: false,
            access_from: None,
        }
    }

    /// Standard conversions only (legs of a user-defined conversion).
    pub const fn standard_only() -> Self {
        ConvContext {
            allow_user: false,
            direct_init: false,
            implicit_object: false,
            access_from: None,
        }
    }

    #[must_use]
    pub const fn direct(mut self) -> Self {
        self.direct_init = true;
        self
    }

    #[must_use]
    pub const fn from_class(mut self, class: Option<SymbolId>) -> Self {
        self.access_from = class;
        self
    }

    /// The same context for a leg of a user-defined conversion.
    #[must_use]
    pub const fn without_user(mut self) -> Self {
        self.allow_user = false;
        self.implicit_object = false;
        self
    }
}

#[cfg(test)]
mod tests;
