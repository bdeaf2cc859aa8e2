use super::*;
use crate::testing::TestDb;
use crate::{Access, Arg, SemaOptions, SymbolId, TargetInfo};
use pretty_assertions::assert_eq;

fn convert(db: &mut TestDb, target: Idx, arg: &Arg) -> ConversionSeq {
    db.sema().compute_conversion(target, arg, ConvContext::copy_init())
}

/// `struct B {}; struct D : B {};`
fn derived_pair(db: &mut TestDb) -> (SymbolId, SymbolId) {
    let b = db.class("B");
    let d = db.class("D");
    db.base(d, b);
    (b, d)
}

// === Sequence values ===

#[test]
fn test_push_replaces_lone_identity() {
    let mut seq = ConversionSeq::identity();
    seq.push(ConvKind::IntegralPromotion);
    assert_eq!(seq.steps(), &[ConvKind::IntegralPromotion]);
    assert_eq!(ConversionSeq::from_steps(&[]), ConversionSeq::identity());
}

#[test]
fn test_rank_is_worst_standard_step() {
    let seq = ConversionSeq::from_steps(&[ConvKind::LvalueToRvalue, ConvKind::IntegralPromotion]);
    assert_eq!(seq.rank(), ConvRank::Promotion);
    assert_eq!(seq.len(), 1);
    assert_eq!(ConversionSeq::single(ConvKind::Boolean).rank(), ConvRank::Boolean);
    assert!(ConversionSeq::from_steps(&[ConvKind::LvalueToRvalue]).is_empty());
}

#[test]
fn test_user_defined_splices_both_legs() {
    let first = ConversionSeq::single(ConvKind::IntegralPromotion);
    let second = ConversionSeq::single(ConvKind::Qualification);
    let seq = ConversionSeq::user_defined(&first, Some(SymbolId::from_raw(7)), second.clone());
    assert_eq!(
        seq.steps(),
        &[ConvKind::IntegralPromotion, ConvKind::User, ConvKind::Qualification]
    );
    assert_eq!(seq.class(), SeqClass::User);
    assert_eq!(seq.user_function(), Some(SymbolId::from_raw(7)));
    assert_eq!(seq.user.as_ref().map(|u| &*u.second), Some(&second));
    // Markers do not take part in the rank.
    assert_eq!(seq.rank(), ConvRank::Promotion);
}

#[test]
fn test_display_lists_steps() {
    let seq = ConversionSeq::from_steps(&[ConvKind::LvalueToRvalue, ConvKind::IntegralConversion]);
    assert_eq!(seq.to_string(), "[lvalue-to-rvalue, integral conversion]");
    assert_eq!(ConversionSeq::identity().to_string(), "[identity]");
    assert_eq!(ConversionSeq::ellipsis().class(), SeqClass::Ellipsis);
    assert!(!ConversionSeq::invalid().is_valid());
}

// === Arithmetic ===

#[test]
fn test_same_type_is_identity() {
    let mut db = TestDb::new();
    let seq = convert(&mut db, Idx::INT, &Arg::lvalue(Idx::INT));
    assert_eq!(seq.steps(), &[ConvKind::Identity]);
}

#[test]
fn test_promotions() {
    let mut db = TestDb::new();
    let short = convert(&mut db, Idx::INT, &Arg::prvalue(Idx::SHORT));
    assert_eq!(short.steps(), &[ConvKind::IntegralPromotion]);
    let float = convert(&mut db, Idx::DOUBLE, &Arg::prvalue(Idx::FLOAT));
    assert_eq!(float.steps(), &[ConvKind::FloatingPromotion]);
}

#[test]
fn test_lvalue_to_rvalue_precedes_conversion() {
    let mut db = TestDb::new();
    let seq = convert(&mut db, Idx::LONG, &Arg::lvalue(Idx::INT));
    assert_eq!(seq.steps(), &[ConvKind::LvalueToRvalue, ConvKind::IntegralConversion]);
    assert_eq!(seq.rank(), ConvRank::Conversion);
}

#[test]
fn test_floating_integral_and_boolean() {
    let mut db = TestDb::new();
    let to_int = convert(&mut db, Idx::INT, &Arg::prvalue(Idx::DOUBLE));
    assert_eq!(to_int.steps(), &[ConvKind::FloatingIntegral]);
    let to_bool = convert(&mut db, Idx::BOOL, &Arg::prvalue(Idx::INT));
    assert_eq!(to_bool.steps(), &[ConvKind::Boolean]);
    assert_eq!(to_bool.rank(), ConvRank::Boolean);
}

#[test]
fn test_same_width_preference_is_a_target_knob() {
    let options = SemaOptions::default().with_target(TargetInfo::default().with_same_width_preference(true));
    let mut db = TestDb::with_options(options);
    let same_width = convert(&mut db, Idx::UINT, &Arg::prvalue(Idx::INT));
    assert_eq!(same_width.steps(), &[ConvKind::IntegralConversionWeak]);
    let wider = convert(&mut db, Idx::LONG, &Arg::prvalue(Idx::INT));
    assert_eq!(wider.steps(), &[ConvKind::IntegralConversion]);

    let mut plain = TestDb::new();
    let seq = convert(&mut plain, Idx::UINT, &Arg::prvalue(Idx::INT));
    assert_eq!(seq.steps(), &[ConvKind::IntegralConversion]);
}

#[test]
fn test_unscoped_enum_promotes() {
    let mut db = TestDb::new();
    let e = db.enumeration(SymbolId::GLOBAL, "E", None, false);
    let scoped = db.enumeration(SymbolId::GLOBAL, "S", Some(Idx::INT), true);
    let (e_ty, scoped_ty) = (db.ty(e), db.ty(scoped));
    assert_eq!(convert(&mut db, Idx::INT, &Arg::prvalue(e_ty)).steps(), &[ConvKind::IntegralPromotion]);
    assert_eq!(convert(&mut db, Idx::LONG, &Arg::prvalue(e_ty)).steps(), &[ConvKind::IntegralConversion]);
    assert!(!convert(&mut db, Idx::INT, &Arg::prvalue(scoped_ty)).is_valid());
    // Nothing converts to an enumeration implicitly.
    assert!(!convert(&mut db, e_ty, &Arg::prvalue(Idx::INT)).is_valid());
}

// === Pointers ===

#[test]
fn test_array_decays_then_qualifies() {
    let mut db = TestDb::new();
    let arr = db.pool.array(Idx::CHAR, Some(4));
    let const_char = db.const_of(Idx::CHAR);
    let target = db.ptr(const_char);
    let seq = convert(&mut db, target, &Arg::lvalue(arr));
    assert_eq!(seq.steps(), &[ConvKind::ArrayToPointer, ConvKind::Qualification]);
    assert_eq!(seq.rank(), ConvRank::Exact);
    assert_eq!(seq.qual_step.map(|q| q.quals), Some(Quals::CONST));
}

#[test]
fn test_function_decays_to_pointer() {
    let mut db = TestDb::new();
    let f = db.pool.function(&[Idx::INT], Idx::VOID, false);
    let fp = db.ptr(f);
    let seq = convert(&mut db, fp, &Arg::lvalue(f));
    assert_eq!(seq.steps(), &[ConvKind::FunctionToPointer]);
}

#[test]
fn test_string_literal_to_mutable_char_pointer() {
    let mut db = TestDb::new();
    let literal = Arg::string_literal(&mut db.pool, 3);
    let char_ptr = db.ptr(Idx::CHAR);
    let seq = convert(&mut db, char_ptr, &literal);
    assert_eq!(
        seq.steps(),
        &[ConvKind::ArrayToPointer, ConvKind::DeprecatedStringQualification]
    );
    assert_eq!(seq.rank(), ConvRank::Conversion);

    // Any other array of const char does not lose its qualifier.
    let const_char = db.const_of(Idx::CHAR);
    let arr = db.pool.array(const_char, Some(4));
    assert!(!convert(&mut db, char_ptr, &Arg::lvalue(arr)).is_valid());
}

#[test]
fn test_qualification_needs_const_above() {
    let mut db = TestDb::new();
    // int** -> const int** drops the guarantee at the middle level.
    let int_ptr = db.ptr(Idx::INT);
    let int_pp = db.ptr(int_ptr);
    let const_int = db.const_of(Idx::INT);
    let const_int_ptr = db.ptr(const_int);
    let bad = db.ptr(const_int_ptr);
    assert!(!convert(&mut db, bad, &Arg::prvalue(int_pp)).is_valid());
    // int** -> const int* const* is fine.
    let const_const_ptr = db.const_of(const_int_ptr);
    let good = db.ptr(const_const_ptr);
    assert_eq!(convert(&mut db, good, &Arg::prvalue(int_pp)).steps(), &[ConvKind::Qualification]);
}

#[test]
fn test_null_pointer_constants() {
    let mut db = TestDb::new();
    let int_ptr = db.ptr(Idx::INT);
    assert_eq!(convert(&mut db, int_ptr, &Arg::nullptr()).steps(), &[ConvKind::NullPointer]);
    assert_eq!(convert(&mut db, int_ptr, &Arg::null_literal()).steps(), &[ConvKind::NullPointer]);
    // A plain int is not a null pointer constant.
    assert!(!convert(&mut db, int_ptr, &Arg::prvalue(Idx::INT)).is_valid());
}

#[test]
fn test_nullptr_t_values_convert_to_pointers() {
    let mut db = TestDb::new();
    let c = db.class("C");
    let c_ty = db.ty(c);
    let int_ptr = db.ptr(Idx::INT);
    let int_member = db.pool.member_pointer(c_ty, Idx::INT);
    for target in [int_ptr, int_member] {
        for arg in [Arg::lvalue(Idx::NULLPTR), Arg::prvalue(Idx::NULLPTR)] {
            let seq = convert(&mut db, target, &arg);
            assert!(seq.is_valid());
            assert!(seq.contains(ConvKind::NullPointer));
        }
    }
    // Still not arithmetic.
    assert!(!convert(&mut db, Idx::INT, &Arg::prvalue(Idx::NULLPTR)).is_valid());
}

#[test]
fn test_nullptr_to_bool_only_when_direct() {
    let mut db = TestDb::new();
    assert!(!convert(&mut db, Idx::BOOL, &Arg::nullptr()).is_valid());
    let direct = db
        .sema()
        .compute_conversion(Idx::BOOL, &Arg::nullptr(), ConvContext::copy_init().direct());
    assert_eq!(direct.steps(), &[ConvKind::Boolean]);
}

#[test]
fn test_pointer_to_bool_is_boolean() {
    let mut db = TestDb::new();
    let p = db.ptr(Idx::INT);
    assert_eq!(convert(&mut db, Idx::BOOL, &Arg::prvalue(p)).steps(), &[ConvKind::Boolean]);
}

#[test]
fn test_derived_pointer_to_base_pointer() {
    let mut db = TestDb::new();
    let (b, d) = derived_pair(&mut db);
    let (b_ty, d_ty) = (db.ty(b), db.ty(d));
    let (bp, dp) = (db.ptr(b_ty), db.ptr(d_ty));
    let seq = convert(&mut db, bp, &Arg::prvalue(dp));
    assert_eq!(seq.steps(), &[ConvKind::PointerConversion]);
    assert_eq!(
        seq.class_step,
        Some(ClassStep {
            from: d,
            to: Some(b),
            distance: 1,
        })
    );
    // Base to derived is not implicit.
    assert!(!convert(&mut db, dp, &Arg::prvalue(bp)).is_valid());
}

#[test]
fn test_class_pointer_to_void_pointer() {
    let mut db = TestDb::new();
    let (_, d) = derived_pair(&mut db);
    let d_ty = db.ty(d);
    let dp = db.ptr(d_ty);
    let vp = db.ptr(Idx::VOID);
    let seq = convert(&mut db, vp, &Arg::prvalue(dp));
    assert_eq!(seq.steps(), &[ConvKind::PointerToVoid]);
    assert_eq!(seq.class_step.map(|s| s.to), Some(None));
}

#[test]
fn test_private_base_blocks_pointer_conversion() {
    let mut db = TestDb::new();
    let b = db.class("B");
    let d = db.class("D");
    db.base_with(d, b, Access::Private, false);
    let (b_ty, d_ty) = (db.ty(b), db.ty(d));
    let (bp, dp) = (db.ptr(b_ty), db.ptr(d_ty));
    assert!(!convert(&mut db, bp, &Arg::prvalue(dp)).is_valid());
    let inside = db
        .sema()
        .compute_conversion(bp, &Arg::prvalue(dp), ConvContext::copy_init().from_class(Some(d)));
    assert_eq!(inside.steps(), &[ConvKind::PointerConversion]);
}

#[test]
fn test_member_pointer_to_derived() {
    let mut db = TestDb::new();
    let (b, d) = derived_pair(&mut db);
    let (b_ty, d_ty) = (db.ty(b), db.ty(d));
    let in_base = db.pool.member_pointer(b_ty, Idx::INT);
    let in_derived = db.pool.member_pointer(d_ty, Idx::INT);
    let seq = convert(&mut db, in_derived, &Arg::prvalue(in_base));
    assert_eq!(seq.steps(), &[ConvKind::MemberPointer]);
    assert!(!convert(&mut db, in_base, &Arg::prvalue(in_derived)).is_valid());
}

#[test]
fn test_member_pointer_through_virtual_base() {
    let mut db = TestDb::new();
    let b = db.class("B");
    let d = db.class("D");
    db.virtual_base(d, b);
    let (b_ty, d_ty) = (db.ty(b), db.ty(d));
    let in_base = db.pool.member_pointer(b_ty, Idx::INT);
    let in_derived = db.pool.member_pointer(d_ty, Idx::INT);
    assert!(!convert(&mut db, in_derived, &Arg::prvalue(in_base)).is_valid());
}

// === Classes and references ===

#[test]
fn test_derived_object_to_base_value() {
    let mut db = TestDb::new();
    let (b, d) = derived_pair(&mut db);
    let (b_ty, d_ty) = (db.ty(b), db.ty(d));
    let seq = convert(&mut db, b_ty, &Arg::lvalue(d_ty));
    assert_eq!(seq.steps(), &[ConvKind::DerivedToBase]);
    assert_eq!(seq.class_step.map(|s| s.distance), Some(1));
    let same = convert(&mut db, b_ty, &Arg::lvalue(b_ty));
    assert_eq!(same.steps(), &[ConvKind::Identity]);
}

#[test]
fn test_ambiguous_base_is_invalid() {
    let mut db = TestDb::new();
    let a = db.class("A");
    let l = db.class("L");
    let r = db.class("R");
    let d = db.class("D");
    db.base(l, a);
    db.base(r, a);
    db.base(d, l);
    db.base(d, r);
    let (a_ty, d_ty) = (db.ty(a), db.ty(d));
    let a_ref = db.lref(a_ty);
    assert!(!convert(&mut db, a_ty, &Arg::lvalue(d_ty)).is_valid());
    assert!(!convert(&mut db, a_ref, &Arg::lvalue(d_ty)).is_valid());
}

#[test]
fn test_lvalue_reference_binds_lvalues() {
    let mut db = TestDb::new();
    let int_ref = db.lref(Idx::INT);
    let seq = convert(&mut db, int_ref, &Arg::lvalue(Idx::INT));
    assert_eq!(seq.steps(), &[ConvKind::Identity]);
    let binding = seq.binding.map(|b| (b.kind, b.binds_rvalue));
    assert_eq!(binding, Some((RefKind::Lvalue, false)));
    assert!(!convert(&mut db, int_ref, &Arg::prvalue(Idx::INT)).is_valid());
}

#[test]
fn test_const_reference_binds_temporaries() {
    let mut db = TestDb::new();
    let cref = db.const_ref(Idx::INT);
    let direct = convert(&mut db, cref, &Arg::prvalue(Idx::INT));
    assert_eq!(direct.binding.map(|b| b.binds_rvalue), Some(true));

    let converted = convert(&mut db, cref, &Arg::lvalue(Idx::SHORT));
    assert_eq!(
        converted.steps(),
        &[ConvKind::LvalueToRvalue, ConvKind::IntegralPromotion]
    );
    assert_eq!(converted.binding.map(|b| b.binds_rvalue), Some(true));
}

#[test]
fn test_rvalue_reference_rejects_lvalues() {
    let mut db = TestDb::new();
    let rref = db.rref(Idx::INT);
    assert!(!convert(&mut db, rref, &Arg::lvalue(Idx::INT)).is_valid());
    let seq = convert(&mut db, rref, &Arg::xvalue(Idx::INT));
    assert_eq!(seq.binding.map(|b| (b.kind, b.binds_rvalue)), Some((RefKind::Rvalue, true)));
}

#[test]
fn test_reference_cannot_drop_qualifiers() {
    let mut db = TestDb::new();
    let int_ref = db.lref(Idx::INT);
    let const_int = db.const_of(Idx::INT);
    assert!(!convert(&mut db, int_ref, &Arg::lvalue(const_int)).is_valid());
}

#[test]
fn test_base_reference_binds_derived_lvalue() {
    let mut db = TestDb::new();
    let (b, d) = derived_pair(&mut db);
    let (b_ty, d_ty) = (db.ty(b), db.ty(d));
    let b_ref = db.lref(b_ty);
    let seq = convert(&mut db, b_ref, &Arg::lvalue(d_ty));
    assert_eq!(seq.steps(), &[ConvKind::DerivedToBase]);
    assert_eq!(seq.binding.map(|bd| bd.referee), Some(b_ty));
}

// === Initializer lists ===

#[test]
fn test_braced_scalar() {
    let mut db = TestDb::new();
    let single = Arg::init_list(vec![Arg::prvalue(Idx::INT)]);
    assert_eq!(convert(&mut db, Idx::INT, &single).steps(), &[ConvKind::Identity]);
    let empty = Arg::init_list(Vec::new());
    assert_eq!(convert(&mut db, Idx::INT, &empty).steps(), &[ConvKind::Identity]);
    let narrowing = Arg::init_list(vec![Arg::prvalue(Idx::DOUBLE)]);
    assert!(!convert(&mut db, Idx::INT, &narrowing).is_valid());
    let two = Arg::init_list(vec![Arg::prvalue(Idx::INT), Arg::prvalue(Idx::INT)]);
    assert!(!convert(&mut db, Idx::INT, &two).is_valid());
}

#[test]
fn test_braced_aggregate() {
    let mut db = TestDb::new();
    let p = db.class("P");
    db.field(p, "x", Idx::INT);
    db.field(p, "y", Idx::DOUBLE);
    let p_ty = db.ty(p);

    let list = Arg::init_list(vec![Arg::prvalue(Idx::INT), Arg::prvalue(Idx::DOUBLE)]);
    let seq = convert(&mut db, p_ty, &list);
    assert_eq!(seq.steps(), &[ConvKind::User]);
    assert_eq!(seq.user_function(), None);

    let narrowing = Arg::init_list(vec![Arg::prvalue(Idx::DOUBLE)]);
    assert!(!convert(&mut db, p_ty, &narrowing).is_valid());
    let too_many = Arg::init_list(vec![Arg::prvalue(Idx::INT); 3]);
    assert!(!convert(&mut db, p_ty, &too_many).is_valid());
}

#[test]
fn test_braced_list_to_mutable_reference() {
    let mut db = TestDb::new();
    let int_ref = db.lref(Idx::INT);
    let cref = db.const_ref(Idx::INT);
    let list = Arg::init_list(vec![Arg::prvalue(Idx::INT)]);
    assert!(!convert(&mut db, int_ref, &list).is_valid());
    let seq = convert(&mut db, cref, &list);
    assert_eq!(seq.binding.map(|b| b.binds_rvalue), Some(true));
}

#[test]
fn test_error_types_convert_silently() {
    let mut db = TestDb::new();
    assert_eq!(convert(&mut db, Idx::ERROR, &Arg::lvalue(Idx::INT)), ConversionSeq::identity());
    assert_eq!(convert(&mut db, Idx::INT, &Arg::lvalue(Idx::ERROR)), ConversionSeq::identity());
}
