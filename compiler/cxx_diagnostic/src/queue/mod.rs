//! Collection point for diagnostics produced during a session.
//!
//! A single bad argument can make every later call that mentions it fail
//! too, so the queue drops errors whose message mentions the `<error>`
//! type and collapses exact repeats of an error at one call site. Once
//! the error cap is hit further errors are counted but not stored, and
//! [`DiagnosticQueue::flush`] closes the batch with an E9002 summary.

use cxx_ir::Span;
use rustc_hash::FxHashSet;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Rendering of the poisoned type inside messages.
const POISON_MARKER: &str = "<error>";

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Errors kept before the queue starts discarding them. `0` keeps all.
    pub max_errors: usize,
    /// Drop errors about expressions that already failed.
    pub drop_poisoned: bool,
    /// Keep only the first of several identical errors at one span.
    pub collapse_repeats: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            max_errors: 20,
            drop_poisoned: true,
            collapse_repeats: true,
        }
    }
}

impl DiagnosticConfig {
    /// Every diagnostic is kept. Tests use this to see the raw stream.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            max_errors: 0,
            drop_poisoned: false,
            collapse_repeats: false,
        }
    }
}

/// Identity of an error for repeat detection.
type ErrorKey = (ErrorCode, Option<Span>, String);

/// Ordered store of diagnostics with error accounting.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    config: DiagnosticConfig,
    entries: Vec<Diagnostic>,
    errors: usize,
    /// Errors rejected by the cap since the last flush.
    overflow: usize,
    seen: FxHashSet<ErrorKey>,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..DiagnosticQueue::default()
        }
    }

    /// Queue `diag`. Returns `false` when it was discarded.
    ///
    /// Warnings and notes bypass every filter.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if diag.is_error() {
            if self.limit_reached() {
                self.overflow += 1;
                return false;
            }
            if self.config.drop_poisoned && diag.message.contains(POISON_MARKER) {
                tracing::trace!(code = %diag.code, "dropping follow-on error");
                return false;
            }
            if self.config.collapse_repeats {
                let key = (diag.code, diag.primary_span(), diag.message.clone());
                if !self.seen.insert(key) {
                    return false;
                }
            }
            self.errors += 1;
        }
        self.entries.push(diag);
        true
    }

    /// Queue an error and hand back the proof.
    ///
    /// A filtered error still yields the proof: the filters only reject
    /// errors that something already queued accounts for.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with a {}", diag.severity);
        self.add(diag);
        ErrorGuaranteed::new()
    }

    pub fn limit_reached(&self) -> bool {
        self.config.max_errors != 0 && self.errors >= self.config.max_errors
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.errors)
    }

    /// Queued diagnostics of every severity.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain the queue in source order and reset the error accounting.
    ///
    /// Diagnostics without a primary span sort first; ties keep the order
    /// they were added in.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.entries);
        out.sort_by_key(|d| d.primary_span().map(|s| s.start));
        if self.overflow > 0 {
            let at = out
                .iter()
                .rev()
                .filter_map(Diagnostic::primary_span)
                .find(|span| !span.is_dummy())
                .unwrap_or(Span::DUMMY);
            tracing::debug!(dropped = self.overflow, "error cap reached");
            out.push(too_many_errors(self.errors, at));
        }
        self.errors = 0;
        self.overflow = 0;
        self.seen.clear();
        out
    }

    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

/// Summary appended when errors were discarded by the cap.
#[cold]
pub fn too_many_errors(kept: usize, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("stopped after {kept} errors"))
        .with_label(span, "last reported error")
        .with_note("raise `DiagnosticConfig::max_errors` to see the rest")
}

#[cfg(test)]
mod tests;
