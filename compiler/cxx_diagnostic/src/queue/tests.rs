use super::*;
use pretty_assertions::assert_eq;

fn error_at(code: ErrorCode, message: &str, start: u32) -> Diagnostic {
    Diagnostic::error(code)
        .with_message(message)
        .with_label(Span::new(start, start + 1), "here")
}

#[test]
fn test_flush_sorts_by_offset() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.add(error_at(ErrorCode::E2001, "second", 40));
    queue.add(error_at(ErrorCode::E2002, "first", 3));

    let flushed = queue.flush();
    let messages: Vec<&str> = flushed.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second"]);
    assert_eq!(queue.error_count(), 0);
    assert!(queue.is_empty());
}

#[test]
fn test_error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        max_errors: 2,
        drop_poisoned: false,
        collapse_repeats: false,
    });
    assert!(queue.add(error_at(ErrorCode::E2001, "a", 0)));
    assert!(queue.add(error_at(ErrorCode::E2001, "b", 1)));
    assert!(queue.limit_reached());
    assert!(!queue.add(error_at(ErrorCode::E2001, "c", 2)));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_warnings_pass_after_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        max_errors: 1,
        drop_poisoned: false,
        collapse_repeats: false,
    });
    queue.add(error_at(ErrorCode::E2001, "a", 0));
    assert!(queue.add(Diagnostic::warning(ErrorCode::E3001).with_message("w")));
    assert_eq!(queue.error_count(), 1);
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_repeats_at_one_span_collapse() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error_at(ErrorCode::E2001, "no matching function for call to `f`", 7)));
    assert!(!queue.add(error_at(ErrorCode::E2001, "no matching function for call to `f`", 7)));
    assert!(queue.add(error_at(ErrorCode::E2001, "no matching function for call to `f`", 9)));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_follow_on_filtered() {
    let mut queue = DiagnosticQueue::new();
    assert!(!queue.add(error_at(ErrorCode::E2001, "no matching function for `f(<error>)`", 0)));
    assert!(queue.is_empty());
}

#[test]
fn test_has_errors_and_emit_error() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.has_errors().is_none());
    let guarantee = queue.emit_error(error_at(ErrorCode::E2003, "deleted", 0));
    assert_eq!(queue.has_errors(), Some(guarantee));
}

#[test]
fn test_too_many_errors_diagnostic() {
    let diag = too_many_errors(5, Span::new(0, 1));
    assert_eq!(diag.code, ErrorCode::E9002);
    assert_eq!(diag.message, "stopped after 5 errors");
}

#[test]
fn test_flush_appends_summary_after_overflow() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        max_errors: 1,
        drop_poisoned: false,
        collapse_repeats: false,
    });
    queue.add(error_at(ErrorCode::E2001, "a", 4));
    assert!(!queue.add(error_at(ErrorCode::E2002, "b", 9)));

    let flushed = queue.flush();
    let codes: Vec<ErrorCode> = flushed.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2001, ErrorCode::E9002]);
    assert_eq!(flushed[1].primary_span(), Some(Span::new(4, 5)));

    // The next batch starts clean.
    assert!(queue.add(error_at(ErrorCode::E2001, "c", 0)));
    assert_eq!(queue.flush().len(), 1);
}

#[test]
fn test_same_message_different_code_is_kept() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error_at(ErrorCode::E2003, "call to `f`", 2)));
    assert!(queue.add(error_at(ErrorCode::E2004, "call to `f`", 2)));
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_summary_skips_synthesized_spans() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        max_errors: 2,
        drop_poisoned: false,
        collapse_repeats: false,
    });
    queue.add(error_at(ErrorCode::E2001, "call", 6));
    queue.add(Diagnostic::error(ErrorCode::E2003).with_label(Span::DUMMY, "implicit member"));
    queue.add(error_at(ErrorCode::E2001, "dropped", 9));

    let flushed = queue.flush();
    assert_eq!(flushed.last().map(|d| d.code), Some(ErrorCode::E9002));
    assert_eq!(flushed.last().and_then(Diagnostic::primary_span), Some(Span::new(6, 7)));
}
