// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Unit tests for the configuration module
use backend_lib::config::Settings;
use std::fs;

#[test]
fn test_settings_default() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.verification.code_ttl_secs, 180);
    assert_eq!(settings.verification.max_attempts, 5);
    assert!(settings.verification.require_email_verification);
    assert_eq!(settings.reaper.offset_days, -30);
    assert_eq!(settings.reaper.retry_delays_secs, vec![60, 120, 300, 600, 900]);
    assert_eq!(settings.reaper.max_attempts, 10);
    assert_eq!(settings.password.min_length, 8);
    assert_eq!(settings.password.max_length, 20);
}

#[test]
fn test_missing_jwt_secret_is_a_startup_error() {
    // the default secret is empty, so defaults alone must not validate
    let settings = Settings::default();
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("jwt.secret"));
}

#[test]
fn test_positive_reaper_offset_is_rejected() {
    let mut settings = Settings::default();
    settings.jwt.secret = "a-secret".to_string();
    settings.reaper.offset_days = 30;

    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("offset_days"));
}

#[test]
fn test_zero_ttl_is_rejected() {
    let mut settings = Settings::default();
    settings.jwt.secret = "a-secret".to_string();
    settings.verification.code_ttl_secs = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn test_valid_settings_pass_validation() {
    let mut settings = Settings::default();
    settings.jwt.secret = "a-secret".to_string();
    assert!(settings.validate().is_ok());

    // zero offset means "reap everything unconfirmed", legal if blunt
    settings.reaper.offset_days = 0;
    assert!(settings.validate().is_ok());
}

#[test]
fn test_load_from_toml_file() {
    let path = std::env::temp_dir().join(format!(
        "storefront-config-{}.toml",
        uuid::Uuid::new_v4()
    ));
    fs::write(
        &path,
        r#"
[jwt]
secret = "file-secret"

[verification]
code_ttl_secs = 60

[reaper]
offset_days = -7
"#,
    )
    .unwrap();

    let settings = Settings::load_from(path.to_str().unwrap()).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(settings.jwt.secret, "file-secret");
    assert_eq!(settings.verification.code_ttl_secs, 60);
    assert_eq!(settings.reaper.offset_days, -7);
    // untouched keys keep their defaults
    assert_eq!(settings.verification.max_attempts, 5);
}

#[test]
fn test_load_from_rejects_bad_offset() {
    let path = std::env::temp_dir().join(format!(
        "storefront-config-{}.toml",
        uuid::Uuid::new_v4()
    ));
    fs::write(
        &path,
        r#"
[jwt]
secret = "file-secret"

[reaper]
offset_days = 14
"#,
    )
    .unwrap();

    let result = Settings::load_from(path.to_str().unwrap());
    fs::remove_file(&path).ok();
    assert!(result.is_err());
}
