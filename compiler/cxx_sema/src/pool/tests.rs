use super::*;
use crate::testing::TestDb;
use pretty_assertions::assert_eq;

#[test]
fn test_fundamentals_are_pre_interned() {
    let pool = Pool::new();
    for f in Fundamental::ALL {
        assert_eq!(pool.fundamental(f.idx()), Some(f));
    }
    assert_eq!(pool.data(Idx::ERROR), &TypeData::Error);
    assert_eq!(pool.len(), Idx::PRIMITIVE_COUNT as usize);
}

#[test]
fn test_structural_interning() {
    let mut pool = Pool::new();
    let a = pool.pointer(Idx::INT);
    let b = pool.pointer(Idx::INT);
    assert_eq!(a, b);
    let c = pool.pointer(Idx::LONG);
    assert!(a != c);
}

#[test]
fn test_qualifiers_merge_and_never_nest() {
    let mut pool = Pool::new();
    let c = pool.qualified(Idx::INT, Quals::CONST);
    let cv = pool.qualified(c, Quals::VOLATILE);
    assert_eq!(pool.split_quals(cv), (Idx::INT, Quals::CV));
    assert_eq!(pool.qualified(Idx::INT, Quals::empty()), Idx::INT);
    assert_eq!(pool.with_quals(cv, Quals::CONST), c);
}

#[test]
fn test_array_qualifiers_move_to_element() {
    let mut pool = Pool::new();
    let arr = pool.array(Idx::CHAR, Some(4));
    let const_arr = pool.const_of(arr);
    let (elem, len) = pool.as_array(const_arr).unwrap_or((Idx::ERROR, None));
    assert_eq!(len, Some(4));
    assert_eq!(pool.quals(elem), Quals::CONST);
    assert_eq!(pool.quals(const_arr), Quals::empty());
}

#[test]
fn test_references_drop_qualifiers() {
    let mut pool = Pool::new();
    let r = pool.lvalue_ref(Idx::INT);
    assert_eq!(pool.const_of(r), r);
}

#[test]
fn test_reference_collapsing() {
    let mut pool = Pool::new();
    let l = pool.lvalue_ref(Idx::INT);
    let r = pool.rvalue_ref(Idx::INT);
    assert_eq!(pool.rvalue_ref(l), l);
    assert_eq!(pool.lvalue_ref(r), l);
    assert_eq!(pool.rvalue_ref(r), r);
    assert_eq!(pool.as_reference(r), Some((Idx::INT, RefKind::Rvalue)));
}

#[test]
fn test_error_type_absorbs_constructors() {
    let mut pool = Pool::new();
    assert_eq!(pool.pointer(Idx::ERROR), Idx::ERROR);
    assert_eq!(pool.lvalue_ref(Idx::ERROR), Idx::ERROR);
    assert_eq!(pool.array(Idx::ERROR, None), Idx::ERROR);
    assert_eq!(pool.function(&[Idx::INT, Idx::ERROR], Idx::VOID, false), Idx::ERROR);
}

#[test]
fn test_scalar_and_object_queries() {
    let mut pool = Pool::new();
    let p = pool.pointer(Idx::VOID);
    let f = pool.function(&[Idx::INT], Idx::VOID, false);
    let r = pool.lvalue_ref(Idx::INT);
    assert!(pool.is_scalar(Idx::NULLPTR));
    assert!(pool.is_scalar(p));
    assert!(!pool.is_scalar(Idx::VOID));
    assert!(!pool.is_object(f));
    assert!(!pool.is_object(r));
    assert!(pool.is_object(p));
}

#[test]
fn test_dependence_propagates() {
    let mut pool = Pool::new();
    let t = pool.template_param(0, 0, Name::EMPTY);
    let pt = pool.pointer(t);
    let ct = pool.const_of(pt);
    let f = pool.function(&[ct], Idx::VOID, false);
    assert!(pool.is_dependent(f));
    assert!(!pool.is_dependent(Idx::INT));
}

#[test]
fn test_out_of_range_index_reads_as_error() {
    let pool = Pool::new();
    assert_eq!(pool.data(Idx::from_raw(9_999)), &TypeData::Error);
}

#[test]
fn test_printer_declarators() {
    let mut db = TestDb::new();
    let c = db.class("C");
    let c_ty = db.ty(c);
    let const_c = db.const_of(c_ty);
    let ptr = db.ptr(const_c);
    let const_ptr = db.const_of(ptr);
    let f = db.pool.function(&[Idx::INT], Idx::VOID, true);
    let fp = db.ptr(f);
    let arr = db.pool.array(Idx::INT, Some(3));
    let arr_ref = db.lref(arr);
    let mp = db.pool.member_pointer(c_ty, Idx::INT);

    let printer = db.printer();
    assert_eq!(printer.ty(ptr), "const C*");
    assert_eq!(printer.ty(const_ptr), "const C* const");
    assert_eq!(printer.ty(fp), "void (*)(int, ...)");
    assert_eq!(printer.ty(arr_ref), "int (&)[3]");
    assert_eq!(printer.ty(mp), "int C::*");
    assert_eq!(printer.arg_list(&[Idx::INT, ptr]), "(int, const C*)");
}

#[test]
fn test_printer_signature_includes_qualifiers() {
    let mut db = TestDb::new();
    let ns = db.namespace(SymbolId::GLOBAL, "n");
    let c = db.class_in(ns, crate::ClassKey::Struct, "C");
    let m = db.method_with(c, "get", &[Idx::INT], Quals::CONST, Some(RefKind::Lvalue));
    assert_eq!(db.printer().signature(m), "n::C::get(int) const &");
}
