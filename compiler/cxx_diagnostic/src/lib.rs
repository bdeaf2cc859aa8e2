//! Diagnostics for the semantic core.
//!
//! Every user-facing failure carries:
//! - an error code for searchability
//! - a message saying what went wrong
//! - a primary span saying where
//! - notes listing the candidates or the sub-object that caused it
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is proof that at least one error reached a
//! [`DiagnosticQueue`]. Only the queue hands one out.
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn resolve(..) -> Result<ResolvedCall, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
