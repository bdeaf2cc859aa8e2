//! Shared identifiers for the C++ semantic core.
//!
//! Everything here is small, `Copy`, and cheap to hash: interned [`Name`]s
//! for identifiers and operator spellings, and [`Span`]s pointing back into
//! the translation unit for diagnostics.

mod interner;
mod name;
mod span;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;

/// Compile-time assertion that a type has a specific size.
///
/// Used to keep frequently-copied handles (names, spans, type indices) from
/// silently growing.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Name, Span};
    crate::static_assert_size!(Name, 4);
    crate::static_assert_size!(Span, 8);
}
