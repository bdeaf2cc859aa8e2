//! Resolution failures and internal errors.

use cxx_diagnostic::{Diagnostic, ErrorCode};
use cxx_ir::{Name, Span};

use crate::special::InitTarget;
use crate::{Access, Idx, SymbolId, TypePrinter};

/// Why a call did not resolve to a usable function.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ResolveError {
    /// No candidate is viable.
    #[error("no matching function for call with {} argument(s)", args.len())]
    NoMatch {
        name: Name,
        /// Argument types, for the message.
        args: Vec<Idx>,
        /// Every function considered.
        candidates: Vec<SymbolId>,
    },
    /// Several viable candidates, none better than the others.
    #[error("ambiguous call among {} candidates", candidates.len())]
    Ambiguous { name: Name, candidates: Vec<SymbolId> },
    /// The best candidate is deleted.
    #[error("call to deleted function {function:?}")]
    Deleted { function: SymbolId },
    /// The best candidate is not accessible from the call site.
    #[error("cannot access {access} function {function:?}")]
    Inaccessible { function: SymbolId, access: Access },
}

impl ResolveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolveError::NoMatch { .. } => ErrorCode::E2001,
            ResolveError::Ambiguous { .. } => ErrorCode::E2002,
            ResolveError::Deleted { .. } => ErrorCode::E2003,
            ResolveError::Inaccessible { .. } => ErrorCode::E2004,
        }
    }

    /// Convert to a diagnostic with one note per candidate.
    pub fn to_diagnostic(&self, span: Span, printer: &TypePrinter<'_>) -> Diagnostic {
        let symbols = printer.symbols();
        let candidate_notes = |diag: Diagnostic, candidates: &[SymbolId]| {
            candidates.iter().fold(diag, |diag, &c| {
                diag.with_secondary_label(symbols.get(c).span, "candidate")
                    .with_note(format!("candidate: `{}`", printer.signature(c)))
            })
        };

        match self {
            ResolveError::NoMatch {
                name,
                args,
                candidates,
            } => {
                let called = called_name(printer, *name, candidates);
                let diag = Diagnostic::error(ErrorCode::E2001)
                    .with_message(format!(
                        "no matching function for call to `{called}{}`",
                        printer.arg_list(args)
                    ))
                    .with_label(span, "no viable candidate");
                if candidates.is_empty() {
                    diag.with_suggestion("declare the function before the call")
                } else {
                    candidate_notes(diag, candidates)
                }
            }
            ResolveError::Ambiguous { name, candidates } => {
                let called = called_name(printer, *name, candidates);
                let diag = Diagnostic::error(ErrorCode::E2002)
                    .with_message(format!("call to `{called}` is ambiguous"))
                    .with_label(span, "ambiguous call")
                    .with_suggestion("add an explicit conversion to select one overload");
                candidate_notes(diag, candidates)
            }
            ResolveError::Deleted { function } => {
                let mut diag = Diagnostic::error(ErrorCode::E2003)
                    .with_message(format!("call to deleted function `{}`", printer.signature(*function)))
                    .with_label(span, "selected here")
                    .with_secondary_label(symbols.get(*function).span, "deleted here");
                if let Some(reason) = symbols.deletion_reason(*function) {
                    diag = diag.with_note(format!("implicitly deleted because {reason}"));
                }
                diag
            }
            ResolveError::Inaccessible { function, access } => Diagnostic::error(ErrorCode::E2004)
                .with_message(format!(
                    "cannot access {access} member `{}`",
                    printer.signature(*function)
                ))
                .with_label(span, "selected here")
                .with_secondary_label(symbols.get(*function).span, format!("declared {access} here")),
        }
    }
}

/// Internal failures of the engine.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum SemaError {
    #[error("internal error: {0}")]
    Internal(String),
    #[error("symbol {0:?} is not a class")]
    NotAClass(SymbolId),
    #[error("class completion nested too deeply at {0:?}")]
    CompletionDepth(SymbolId),
    #[error("member initializer {target:?} of {ctor:?} names no base or field")]
    UnknownInitializer { ctor: SymbolId, target: InitTarget },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl SemaError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SemaError::Resolve(err) => err.code(),
            SemaError::Internal(_)
            | SemaError::NotAClass(_)
            | SemaError::CompletionDepth(_)
            | SemaError::UnknownInitializer { .. } => ErrorCode::E9001,
        }
    }

    /// Report as an internal compiler error. Resolution failures carried
    /// here have already been reported at their call site.
    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        let diag = Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(span, "while analyzing this");
        match self {
            SemaError::Resolve(_) => diag,
            _ => diag.with_note("this is a bug in the semantic analyzer"),
        }
    }
}

/// Qualified name of the called function without its parameter list.
fn called_name(printer: &TypePrinter<'_>, name: Name, candidates: &[SymbolId]) -> String {
    match candidates.first() {
        Some(&first) => {
            let signature = printer.signature(first);
            match signature.split_once('(') {
                Some((head, _)) => head.to_owned(),
                None => signature,
            }
        }
        None => printer.name(name).to_owned(),
    }
}

#[cfg(test)]
mod tests;
