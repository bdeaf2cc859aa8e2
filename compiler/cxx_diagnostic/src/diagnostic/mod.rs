//! The [`Diagnostic`] record shared by overload resolution and
//! special-member synthesis.

use cxx_ir::Span;
use std::fmt;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span with a short caption.
///
/// The primary label sits on the call or class being diagnosed. Secondary
/// labels point back at candidate declarations.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    fn new(span: Span, message: impl Into<String>, is_primary: bool) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary,
        }
    }
}

/// One reportable problem.
///
/// Built in a chain starting from [`Diagnostic::error`] or
/// [`Diagnostic::warning`]; a resolution failure typically adds one note
/// per candidate, a synthesis warning one note per deleted sub-object.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "a diagnostic does nothing until it is queued"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new(Severity::Error, code)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new(Severity::Warning, code)
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..self
        }
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(span, message, true));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(span, message, false));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Span of the first primary label. Secondary labels never count.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().filter(|l| l.is_primary).map(|l| l.span).next()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Single-block text rendering, used by logs and test failure output.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;
        for Label {
            span,
            message,
            is_primary,
        } in &self.labels
        {
            let arrow = if *is_primary { "-->" } else { "   " };
            write!(f, "\n  {arrow} {span:?}: {message}")?;
        }
        let trailers = self
            .notes
            .iter()
            .map(|n| ("note", n))
            .chain(self.suggestions.iter().map(|s| ("help", s)));
        for (kind, text) in trailers {
            write!(f, "\n  = {kind}: {text}")?;
        }
        Ok(())
    }
}
