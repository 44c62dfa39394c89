// ==========================
// tests/unit/password_tests.rs
// ==========================
//! Unit tests for password requirement toggles.
use backend_lib::config::PasswordRequirements;
use backend_lib::validation::validate_password;

fn lax() -> PasswordRequirements {
    PasswordRequirements {
        min_length: 4,
        max_length: 64,
        require_uppercase: false,
        require_digit: false,
        require_special: false,
    }
}

#[test]
fn test_lax_requirements_accept_simple_passwords() {
    assert!(validate_password("abcd", &lax()).is_ok());
}

#[test]
fn test_each_toggle_is_independent() {
    let mut req = lax();
    req.require_uppercase = true;
    assert!(validate_password("abcd", &req).is_err());
    assert!(validate_password("Abcd", &req).is_ok());

    let mut req = lax();
    req.require_digit = true;
    assert!(validate_password("abcd", &req).is_err());
    assert!(validate_password("abc1", &req).is_ok());

    let mut req = lax();
    req.require_special = true;
    assert!(validate_password("abcd", &req).is_err());
    assert!(validate_password("abc!", &req).is_ok());
}

#[test]
fn test_length_bounds_are_inclusive() {
    let req = PasswordRequirements {
        min_length: 4,
        max_length: 6,
        require_uppercase: false,
        require_digit: false,
        require_special: false,
    };
    assert!(validate_password("abc", &req).is_err());
    assert!(validate_password("abcd", &req).is_ok());
    assert!(validate_password("abcdef", &req).is_ok());
    assert!(validate_password("abcdefg", &req).is_err());
}

#[test]
fn test_default_requirements_match_the_register_rules() {
    let req = PasswordRequirements::default();
    assert!(validate_password("Valid1!x", &req).is_ok());
    assert!(validate_password("Ab1!", &req).is_err());
    assert!(validate_password("nouppercase1!", &req).is_err());
    assert!(validate_password("NoDigits!!", &req).is_err());
    assert!(validate_password("NoSpecial11", &req).is_err());
}
