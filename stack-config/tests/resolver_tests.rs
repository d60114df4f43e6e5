//! Resolution against the real process environment and stack files on disk.

use serial_test::serial;
use stack_config::{ConfigError, ConfigKey, ConfigResolver, EnvSnapshot, StackFile, ValueOrigin};
use std::io::Write;
use tempfile::NamedTempFile;

const STACK_FILE: &str = r#"
[config]
project_name = "proj1"
project_number = 123456789012
location = "us-central1"
repository = "notejam"
db_user = "notejam"
db_pass = "s3cret"
db_ha = true
db_node_size = "db-f1-micro"
owner = "notejam-org"
branch = "main"
"#;

fn write_stack_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn clear_overrides() {
    for key in ConfigKey::ALL {
        std::env::remove_var(key.env_var());
    }
}

#[test]
#[serial]
fn test_capture_picks_up_prefixed_overrides_only() {
    clear_overrides();
    std::env::set_var("NOTEJAM_LOCATION", "europe-west1");
    std::env::set_var("UNRELATED_LOCATION", "nowhere");

    let env = EnvSnapshot::capture();
    assert_eq!(env.get("NOTEJAM_LOCATION"), Some("europe-west1"));
    assert_eq!(env.get("UNRELATED_LOCATION"), None);

    std::env::remove_var("NOTEJAM_LOCATION");
    std::env::remove_var("UNRELATED_LOCATION");
}

#[test]
#[serial]
fn test_snapshot_is_not_affected_by_later_changes() {
    clear_overrides();
    std::env::set_var("NOTEJAM_BRANCH_NAME", "release");
    let env = EnvSnapshot::capture();
    std::env::set_var("NOTEJAM_BRANCH_NAME", "changed");

    assert_eq!(env.get("NOTEJAM_BRANCH_NAME"), Some("release"));
    std::env::remove_var("NOTEJAM_BRANCH_NAME");
}

#[test]
#[serial]
fn test_resolve_from_stack_file_with_env_override() {
    clear_overrides();
    std::env::set_var("NOTEJAM_DB_NODE_SIZE", "db-custom-2-7680");

    let file = write_stack_file(STACK_FILE);
    let stack_file = StackFile::load(file.path()).unwrap();
    let env = EnvSnapshot::capture();
    let resolver = ConfigResolver::new(&env, &stack_file);
    let config = resolver.resolve().unwrap();

    assert_eq!(config.project_name, "proj1");
    assert_eq!(config.project_number, "123456789012");
    assert_eq!(config.db_high_availability, "true");
    assert_eq!(config.db_node_size, "db-custom-2-7680");
    assert_eq!(config.db_pass.expose(), "s3cret");

    let (_, origin) = resolver.resolve_key(ConfigKey::DbNodeSize).unwrap();
    assert_eq!(origin, ValueOrigin::Environment("NOTEJAM_DB_NODE_SIZE"));

    std::env::remove_var("NOTEJAM_DB_NODE_SIZE");
}

#[test]
fn test_missing_key_in_stack_file() {
    let file = write_stack_file(&STACK_FILE.replace("branch = \"main\"\n", ""));
    let stack_file = StackFile::load(file.path()).unwrap();
    let env = EnvSnapshot::default();

    match ConfigResolver::new(&env, &stack_file).resolve() {
        Err(ConfigError::MissingConfiguration { key, env_var }) => {
            assert_eq!(key, "branch");
            assert_eq!(env_var, "NOTEJAM_BRANCH_NAME");
        }
        other => panic!("Expected MissingConfiguration, got {:?}", other),
    }
}

#[test]
fn test_missing_stack_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Notejam.nope.toml");
    match StackFile::load(&path) {
        Err(ConfigError::ConfigFileNotFound { path: missing }) => assert_eq!(missing, path),
        other => panic!("Expected ConfigFileNotFound, got {:?}", other),
    }
}

#[test]
fn test_malformed_stack_file() {
    let file = write_stack_file("[config\nproject_name = ");
    assert!(matches!(
        StackFile::load(file.path()),
        Err(ConfigError::Parse { .. })
    ));
}
