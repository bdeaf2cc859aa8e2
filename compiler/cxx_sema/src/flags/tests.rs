use super::*;

#[test]
fn flags_size() {
    assert_eq!(std::mem::size_of::<Quals>(), 1);
    assert_eq!(std::mem::size_of::<SymbolFlags>(), 4);
    assert_eq!(std::mem::size_of::<CallFlags>(), 2);
}

#[test]
fn quals_ordering() {
    assert!(Quals::CV.at_least(Quals::CONST));
    assert!(Quals::empty().fewer_than(Quals::CONST));
    assert!(Quals::CONST.fewer_than(Quals::CV));
    assert!(!Quals::CONST.fewer_than(Quals::CONST));
    assert!(!Quals::CONST.fewer_than(Quals::VOLATILE));
}

#[test]
fn quals_prefix() {
    assert_eq!(Quals::empty().prefix(), "");
    assert_eq!(Quals::CONST.prefix(), "const ");
    assert_eq!(Quals::CV.prefix(), "const volatile ");
}

#[test]
fn symbol_flag_helpers() {
    let flags = SymbolFlags::CONSTRUCTOR | SymbolFlags::IMPLICIT | SymbolFlags::DELETED;
    assert!(flags.is_deleted());
    assert!(flags.is_implicit());
    assert!(flags.intersects(SymbolFlags::SPECIAL));
    assert!(!SymbolFlags::CONVERSION.intersects(SymbolFlags::SPECIAL));
}

#[test]
fn ordinary_call_allows_adl() {
    assert!(CallFlags::ORDINARY.contains(CallFlags::ALLOW_ADL));
    assert!(!CallFlags::ORDINARY.is_probe());
    assert!((CallFlags::ORDINARY | CallFlags::PROBE).is_probe());
}
