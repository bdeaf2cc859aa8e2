use super::*;
use crate::expr::{Arg, CallDescriptor};
use crate::testing::TestDb;
use crate::SpecialKind;
use pretty_assertions::assert_eq;

#[test]
fn test_codes() {
    let f = SymbolId::from_raw(7);
    assert_eq!(
        ResolveError::NoMatch {
            name: Name::EMPTY,
            args: Vec::new(),
            candidates: Vec::new(),
        }
        .code(),
        ErrorCode::E2001
    );
    assert_eq!(
        ResolveError::Ambiguous {
            name: Name::EMPTY,
            candidates: vec![f],
        }
        .code(),
        ErrorCode::E2002
    );
    assert_eq!(ResolveError::Deleted { function: f }.code(), ErrorCode::E2003);
    assert_eq!(
        ResolveError::Inaccessible {
            function: f,
            access: Access::Private,
        }
        .code(),
        ErrorCode::E2004
    );
    assert_eq!(SemaError::NotAClass(f).code(), ErrorCode::E9001);
    assert_eq!(
        SemaError::from(ResolveError::Deleted { function: f }).code(),
        ErrorCode::E2003
    );
}

#[test]
fn test_no_match_message_lists_arguments() {
    let mut db = TestDb::new();
    let f = db.function(SymbolId::GLOBAL, "f", &[Idx::INT]);
    let int_ptr = db.ptr(Idx::INT);
    let span = db.next_span();
    let err = ResolveError::NoMatch {
        name: db.name("f"),
        args: vec![int_ptr],
        candidates: vec![f],
    };
    let diag = err.to_diagnostic(span, &db.printer());
    assert_eq!(diag.code, ErrorCode::E2001);
    assert_eq!(diag.message, "no matching function for call to `f(int*)`");
    assert_eq!(diag.labels[0].span, span);
    assert_eq!(diag.labels[0].message, "no viable candidate");
    assert_eq!(diag.notes, vec!["candidate: `f(int)`".to_string()]);
}

#[test]
fn test_no_match_without_candidates_suggests_declaring() {
    let db = TestDb::new();
    let err = ResolveError::NoMatch {
        name: db.name("g"),
        args: Vec::new(),
        candidates: Vec::new(),
    };
    let diag = err.to_diagnostic(Span::DUMMY, &db.printer());
    assert_eq!(diag.message, "no matching function for call to `g()`");
    assert!(diag.notes.is_empty());
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn test_ambiguous_notes_every_candidate() {
    let mut db = TestDb::new();
    let ns = db.namespace(SymbolId::GLOBAL, "n");
    let f1 = db.function(ns, "f", &[Idx::LONG]);
    let f2 = db.function(ns, "f", &[Idx::DOUBLE]);
    let err = ResolveError::Ambiguous {
        name: db.name("f"),
        candidates: vec![f1, f2],
    };
    let diag = err.to_diagnostic(Span::DUMMY, &db.printer());
    assert_eq!(diag.message, "call to `n::f` is ambiguous");
    assert_eq!(
        diag.notes,
        vec!["candidate: `n::f(long)`".to_string(), "candidate: `n::f(double)`".to_string()]
    );
    assert_eq!(diag.labels.iter().filter(|l| !l.is_primary).count(), 2);
}

#[test]
fn test_deleted_and_inaccessible_messages() {
    let mut db = TestDb::new();
    let f = db.function(SymbolId::GLOBAL, "f", &[Idx::INT]);
    db.delete(f);
    let c = db.class("C");
    let g = db.method(c, "g", &[Idx::INT]);
    db.access(g, Access::Private);

    let printer = db.printer();
    let deleted = ResolveError::Deleted { function: f }.to_diagnostic(Span::DUMMY, &printer);
    assert_eq!(deleted.message, "call to deleted function `f(int)`");
    assert!(deleted.notes.is_empty());

    let hidden = ResolveError::Inaccessible {
        function: g,
        access: Access::Private,
    }
    .to_diagnostic(Span::DUMMY, &printer);
    assert_eq!(hidden.code, ErrorCode::E2004);
    assert_eq!(hidden.message, "cannot access private member `C::g(int)`");
}

#[test]
fn test_implicitly_deleted_call_explains_why() {
    let mut db = TestDb::new();
    let r = db.class("R");
    let int_ref = db.lref(Idx::INT);
    db.field(r, "r", int_ref);
    let members = db.complete(r);
    let Some(default) = members.ok().and_then(|m| m.get(SpecialKind::DefaultCtor).map(|d| d.symbol)) else {
        panic!("R should have an implicit default constructor");
    };

    let constructors = db.symbols.constructors(r);
    let mut sema = db.sema();
    let result = sema.resolve_among(&constructors, &CallDescriptor::construct(Vec::new()));
    assert_eq!(result.map(|r| r.function), Err(ResolveError::Deleted { function: default }));
    let diagnostics = sema.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::E2003);
    assert_eq!(
        diagnostics[0].notes,
        vec!["implicitly deleted because a reference member cannot be default-initialized or reseated".to_string()]
    );
}

#[test]
fn test_internal_errors_are_flagged_as_bugs() {
    let f = SymbolId::from_raw(3);
    let diag = SemaError::NotAClass(f).to_diagnostic(Span::DUMMY);
    assert_eq!(diag.code, ErrorCode::E9001);
    assert_eq!(diag.notes, vec!["this is a bug in the semantic analyzer".to_string()]);

    // Resolution failures were reported where they happened.
    let wrapped = SemaError::from(ResolveError::Deleted { function: f }).to_diagnostic(Span::DUMMY);
    assert!(wrapped.notes.is_empty());
    assert_eq!(wrapped.code, ErrorCode::E2003);
}

#[test]
fn test_deleted_best_match_is_reported() {
    let mut db = TestDb::new();
    let f = db.function(SymbolId::GLOBAL, "f", &[Idx::INT]);
    db.delete(f);
    let result = db
        .sema()
        .resolve_among(&[f], &CallDescriptor::new(vec![Arg::prvalue(Idx::INT)]));
    assert_eq!(result.map(|r| r.function), Err(ResolveError::Deleted { function: f }));
}
