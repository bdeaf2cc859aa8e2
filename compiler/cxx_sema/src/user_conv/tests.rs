use super::*;
use crate::conversion::ConvKind;
use crate::testing::TestDb;
use crate::{FunctionInfo, Quals, RecursionLimits, SemaOptions};
use pretty_assertions::assert_eq;

fn find(db: &mut TestDb, flags: UserConvFlags, target: Idx, arg: &Arg) -> UserConversion {
    db.sema().find_user_conversion(flags, target, arg, None)
}

fn found_function(conversion: &UserConversion) -> Option<SymbolId> {
    match conversion {
        UserConversion::Found(found) => Some(found.function),
        _ => None,
    }
}

/// `operator T() const`.
fn const_conversion_fn(db: &mut TestDb, class: SymbolId, ret: Idx) -> SymbolId {
    let mut info = FunctionInfo::new(Vec::new(), ret);
    info.this_quals = Quals::CONST;
    let name = format!("operator {}", db.printer().ty(ret));
    db.declare_function(class, &name, info, SymbolFlags::CONVERSION)
}

#[test]
fn test_converting_constructor() {
    let mut db = TestDb::new();
    let x = db.class("X");
    let from_int = db.ctor(x, &[Idx::INT]);
    let x_ty = db.ty(x);

    let found = find(&mut db, UserConvFlags::ALL_KINDS, x_ty, &Arg::prvalue(Idx::INT));
    assert_eq!(found_function(&found), Some(from_int));

    // Through the conversion entry point the sequence is `[User]`.
    let seq = db
        .sema()
        .compute_conversion(x_ty, &Arg::prvalue(Idx::INT), ConvContext::copy_init());
    assert_eq!(seq.steps(), &[ConvKind::User]);
    assert_eq!(seq.user_function(), Some(from_int));
}

#[test]
fn test_first_leg_is_standard_conversion() {
    let mut db = TestDb::new();
    let x = db.class("X");
    db.ctor(x, &[Idx::LONG]);
    let x_ty = db.ty(x);
    let UserConversion::Found(found) = find(&mut db, UserConvFlags::ALL_KINDS, x_ty, &Arg::lvalue(Idx::INT)) else {
        panic!("expected a converting constructor");
    };
    assert_eq!(
        found.first.steps(),
        &[ConvKind::LvalueToRvalue, ConvKind::IntegralConversion]
    );
    assert_eq!(found.second.steps(), &[ConvKind::Identity]);
}

#[test]
fn test_explicit_constructor_needs_direct_init() {
    let mut db = TestDb::new();
    let x = db.class("X");
    let ctor = db.explicit_ctor(x, &[Idx::INT]);
    let x_ty = db.ty(x);
    let arg = Arg::prvalue(Idx::INT);
    assert_eq!(find(&mut db, UserConvFlags::ALL_KINDS, x_ty, &arg), UserConversion::None);
    let direct = find(
        &mut db,
        UserConvFlags::ALL_KINDS | UserConvFlags::DIRECT_INIT,
        x_ty,
        &arg,
    );
    assert_eq!(found_function(&direct), Some(ctor));
}

#[test]
fn test_conversion_function() {
    let mut db = TestDb::new();
    let y = db.class("Y");
    let to_int = db.conversion_fn(y, Idx::INT);
    let y_ty = db.ty(y);

    let found = find(&mut db, UserConvFlags::ALL_KINDS, Idx::INT, &Arg::lvalue(y_ty));
    assert_eq!(found_function(&found), Some(to_int));

    let seq = db
        .sema()
        .compute_conversion(Idx::LONG, &Arg::lvalue(y_ty), ConvContext::copy_init());
    assert_eq!(seq.steps(), &[ConvKind::User, ConvKind::IntegralConversion]);
}

#[test]
fn test_second_leg_picks_closer_result() {
    let mut db = TestDb::new();
    let z = db.class("Z");
    let to_int = db.conversion_fn(z, Idx::INT);
    let to_double = db.conversion_fn(z, Idx::DOUBLE);
    let z_ty = db.ty(z);

    let exact = find(&mut db, UserConvFlags::ALL_KINDS, Idx::INT, &Arg::lvalue(z_ty));
    assert_eq!(found_function(&exact), Some(to_int));

    // int -> long and double -> long are both conversions.
    let tied = find(&mut db, UserConvFlags::ALL_KINDS, Idx::LONG, &Arg::lvalue(z_ty));
    assert_eq!(tied, UserConversion::Ambiguous(vec![to_int, to_double]));
    let seq = db
        .sema()
        .compute_conversion(Idx::LONG, &Arg::lvalue(z_ty), ConvContext::copy_init());
    assert!(!seq.is_valid());
}

#[test]
fn test_constructor_against_const_conversion_function() {
    let mut db = TestDb::new();
    let a = db.class("A");
    let b = db.class("B");
    let (a_ty, b_ty) = (db.ty(a), db.ty(b));
    let const_b = db.const_ref(b_ty);
    let ctor = db.ctor(a, &[const_b]);
    let conv = const_conversion_fn(&mut db, b, a_ty);

    let tied = find(&mut db, UserConvFlags::ALL_KINDS, a_ty, &Arg::lvalue(b_ty));
    assert_eq!(tied, UserConversion::Ambiguous(vec![ctor, conv]));

    // Restricting the search to one kind removes the tie.
    let only_ctors = find(&mut db, UserConvFlags::CONSTRUCTORS, a_ty, &Arg::lvalue(b_ty));
    assert_eq!(found_function(&only_ctors), Some(ctor));
}

#[test]
fn test_less_qualified_object_binding_wins() {
    let mut db = TestDb::new();
    let a = db.class("A");
    let b = db.class("B");
    let (a_ty, b_ty) = (db.ty(a), db.ty(b));
    let const_b = db.const_ref(b_ty);
    db.ctor(a, &[const_b]);
    let conv = db.conversion_fn(b, a_ty);
    let found = find(&mut db, UserConvFlags::ALL_KINDS, a_ty, &Arg::lvalue(b_ty));
    assert_eq!(found_function(&found), Some(conv));
}

#[test]
fn test_hint_restricts_search() {
    let mut db = TestDb::new();
    let z = db.class("Z");
    let to_int = db.conversion_fn(z, Idx::INT);
    let to_double = db.conversion_fn(z, Idx::DOUBLE);
    let z_ty = db.ty(z);
    let found = db
        .sema()
        .find_user_conversion(UserConvFlags::ALL_KINDS, Idx::LONG, &Arg::lvalue(z_ty), Some(to_double));
    assert_eq!(found_function(&found), Some(to_double));
    assert!(to_int != to_double);
}

#[test]
fn test_lvalue_result_for_mutable_reference() {
    let mut db = TestDb::new();
    let y = db.class("Y");
    let int_ref = db.lref(Idx::INT);
    let to_ref = db.conversion_fn(y, int_ref);
    let w = db.class("W");
    db.conversion_fn(w, Idx::INT);
    let (y_ty, w_ty) = (db.ty(y), db.ty(w));

    let seq = db
        .sema()
        .compute_conversion(int_ref, &Arg::lvalue(y_ty), ConvContext::copy_init());
    assert_eq!(seq.user_function(), Some(to_ref));
    // A prvalue result cannot bind to `int&`.
    let seq = db
        .sema()
        .compute_conversion(int_ref, &Arg::lvalue(w_ty), ConvContext::copy_init());
    assert!(!seq.is_valid());
}

#[test]
fn test_derived_conversion_function_hides_base() {
    let mut db = TestDb::new();
    let base = db.class("Base");
    let derived = db.class("Derived");
    db.base(derived, base);
    let hidden = db.conversion_fn(base, Idx::INT);
    let base_double = db.conversion_fn(base, Idx::DOUBLE);
    let own = db.conversion_fn(derived, Idx::INT);

    let visible = db.sema().visible_conversion_functions(derived);
    assert_eq!(visible, vec![own, base_double]);
    assert!(!visible.contains(&hidden));
}

#[test]
fn test_no_conversions_between_unrelated_classes() {
    let mut db = TestDb::new();
    let p = db.class("P");
    let q = db.class("Q");
    let (p_ty, q_ty) = (db.ty(p), db.ty(q));
    assert_eq!(find(&mut db, UserConvFlags::ALL_KINDS, p_ty, &Arg::lvalue(q_ty)), UserConversion::None);
}

#[test]
fn test_depth_limit_fails_closed() {
    let limits = RecursionLimits {
        user_conversion: 0,
        ..RecursionLimits::default()
    };
    let mut db = TestDb::with_options(SemaOptions::default().with_limits(limits));
    let x = db.class("X");
    db.ctor(x, &[Idx::INT]);
    let x_ty = db.ty(x);
    assert_eq!(
        find(&mut db, UserConvFlags::ALL_KINDS, x_ty, &Arg::prvalue(Idx::INT)),
        UserConversion::None
    );
}
