use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E2001.to_string(), "E2001");
    assert_eq!(ErrorCode::E9001.as_str(), "E9001");
}

#[test]
fn test_resolution_error_codes() {
    for code in [
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
    ] {
        assert!(code.is_resolution_error());
        assert!(!code.is_internal_error());
        assert!(!code.is_warning());
    }
}

#[test]
fn test_defaulted_deleted_is_warning() {
    assert!(ErrorCode::E3001.is_warning());
    assert!(ErrorCode::E3001.is_special_member_error());
    assert!(!ErrorCode::E3001.is_resolution_error());
}

#[test]
fn test_from_str_is_case_insensitive() {
    assert_eq!("e2002".parse::<ErrorCode>(), Ok(ErrorCode::E2002));
    assert_eq!("E9002".parse::<ErrorCode>(), Ok(ErrorCode::E9002));
    assert_eq!("E0000".parse::<ErrorCode>(), Err(()));
}

#[test]
fn test_all_codes_roundtrip_through_as_str() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
        assert!(!code.description().is_empty());
    }
}
