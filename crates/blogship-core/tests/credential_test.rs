use std::fs;

use blogship_core::{Credential, Error};
use secrecy::{ExposeSecret, SecretString};

#[test]
fn blog_registry_credential_uses_fixed_account() {
    let cred = Credential::for_blog_registry(SecretString::from("ghp_secret".to_owned()));

    assert_eq!(cred.registry(), "ghcr.io");
    assert_eq!(cred.username(), "KGB33");
    assert_eq!(cred.secret().expose_secret(), "ghp_secret");
}

#[test]
fn debug_output_redacts_secret() {
    let cred = Credential::for_blog_registry(SecretString::from("ghp_secret".to_owned()));
    let debug = format!("{cred:?}");

    assert!(debug.contains("[REDACTED]"));
    assert!(!debug.contains("ghp_secret"));
}

#[test]
fn from_env_reports_missing_variable() {
    let site = tempfile::tempdir().unwrap();
    let result = Credential::from_env("BLOGSHIP_TEST_TOKEN_THAT_IS_NEVER_SET", site.path());
    assert!(matches!(result, Err(Error::MissingEnvVar(ref v)) if v == "BLOGSHIP_TEST_TOKEN_THAT_IS_NEVER_SET"));
}

// ── Env files ──

#[test]
fn env_file_outside_sources_supplies_token() {
    let home = tempfile::tempdir().unwrap();
    let site = tempfile::tempdir().unwrap();
    let env_file = home.path().join(".env");
    fs::write(&env_file, "OTHER=1\nGHCR_TOKEN=ghp_secret\n").unwrap();

    let cred = Credential::from_env_file("GHCR_TOKEN", &env_file, site.path()).unwrap();

    assert_eq!(cred.secret().expose_secret(), "ghp_secret");
}

#[test]
fn env_file_inside_sources_is_refused() {
    let site = tempfile::tempdir().unwrap();
    let env_file = site.path().join(".env");
    fs::write(&env_file, "GHCR_TOKEN=ghp_secret\n").unwrap();

    let result = Credential::from_env_file("GHCR_TOKEN", &env_file, site.path());

    match result {
        Err(err @ Error::TokenInSource { .. }) => {
            let message = err.to_string();
            assert!(message.contains(".env"));
            assert!(!message.contains("ghp_secret"));
        }
        other => panic!("expected TokenInSource, got {other:?}"),
    }
}

#[test]
fn env_file_in_nested_source_dir_is_refused() {
    let site = tempfile::tempdir().unwrap();
    fs::create_dir_all(site.path().join("content")).unwrap();
    let env_file = site.path().join("content/.env");
    fs::write(&env_file, "GHCR_TOKEN=ghp_secret\n").unwrap();

    let result = Credential::from_env_file("GHCR_TOKEN", &env_file, site.path());

    assert!(matches!(result, Err(Error::TokenInSource { .. })));
}

#[test]
fn env_file_without_variable_reports_missing() {
    let site = tempfile::tempdir().unwrap();
    let env_file = site.path().join(".env");
    fs::write(&env_file, "HUGO_ENV=production\n").unwrap();

    let result = Credential::from_env_file("GHCR_TOKEN", &env_file, site.path());

    assert!(matches!(result, Err(Error::MissingEnvVar(ref v)) if v == "GHCR_TOKEN"));
}

#[test]
fn env_file_with_empty_token_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let site = tempfile::tempdir().unwrap();
    let env_file = home.path().join(".env");
    fs::write(&env_file, "GHCR_TOKEN=\n").unwrap();

    let result = Credential::from_env_file("GHCR_TOKEN", &env_file, site.path());

    assert!(matches!(result, Err(Error::EmptyToken(_))));
}
