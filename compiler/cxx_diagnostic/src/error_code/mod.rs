//! Error codes for all semantic diagnostics.
//!
//! Each code is a unique identifier (e.g. `E2001`) whose first digit names
//! the phase that produced it.

use std::fmt;

/// Error codes for all semantic diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E2xxx: Overload resolution errors
/// - E3xxx: Special-member synthesis diagnostics
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Overload Resolution (E2xxx)
    /// No viable function for a call
    E2001,
    /// Ambiguous call
    E2002,
    /// Call resolves to a deleted function
    E2003,
    /// Call resolves to an inaccessible function
    E2004,

    // Special Members (E3xxx)
    /// Explicitly defaulted member is implicitly deleted (warning)
    E3001,

    // Internal Errors (E9xxx)
    /// Internal consistency violation
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// Every error code, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E3001,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Short description used by `--explain` style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "no matching function for call",
            ErrorCode::E2002 => "ambiguous call",
            ErrorCode::E2003 => "call to deleted function",
            ErrorCode::E2004 => "inaccessible function selected",
            ErrorCode::E3001 => "explicitly defaulted function is implicitly deleted",
            ErrorCode::E9001 => "internal compiler error",
            ErrorCode::E9002 => "too many errors",
        }
    }

    /// Check if this is an overload-resolution error (E2xxx range).
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E2001 | ErrorCode::E2002 | ErrorCode::E2003 | ErrorCode::E2004
        )
    }

    /// Check if this is a special-member diagnostic (E3xxx range).
    pub fn is_special_member_error(&self) -> bool {
        matches!(self, ErrorCode::E3001)
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }

    /// Check if this code is reported as a warning by default.
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::E3001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`.
///
/// Case-insensitive. Derived from [`ErrorCode::ALL`] and [`ErrorCode::as_str()`].
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
