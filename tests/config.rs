use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;
use zotero_feed::cli::Args;
use zotero_feed::config::{Config, FileConfig};
use zotero_feed::credentials::{parse_credentials, read_credentials};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn test_read_credentials_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zotero_keys.txt");
    fs::write(&path, "12345\nabcKEY\n").unwrap();

    let credentials = read_credentials(&path).unwrap();
    assert_eq!(credentials.user_id, "12345");
    assert_eq!(credentials.user_key, "abcKEY");
}

#[test]
fn test_parse_credentials_handles_crlf() {
    let credentials = parse_credentials("12345\r\nabcKEY\r\nignored\r\n").unwrap();
    assert_eq!(credentials.user_id, "12345");
    assert_eq!(credentials.user_key, "abcKEY");
}

#[test]
fn test_parse_credentials_needs_two_lines() {
    assert!(parse_credentials("12345\n").is_err());
    assert!(parse_credentials("").is_err());
}

#[test]
fn test_missing_credentials_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(read_credentials(&temp_dir.path().join("nope.txt")).is_err());
}

#[test]
fn test_env_credentials_and_defaults() {
    let args = Args::default();
    let env = env_from(&[("ZOTERO_USER_ID", "12345"), ("ZOTERO_API_KEY", "abcKEY")]);

    let config = Config::from_sources(&args, FileConfig::default(), env).unwrap();
    assert_eq!(config.user_id.as_deref(), Some("12345"));
    assert_eq!(config.user_key.as_deref(), Some("abcKEY"));
    assert_eq!(config.endpoint, "https://api.zotero.org");
    assert_eq!(config.timeout_secs, 30);
    assert!(!config.verbose);
}

#[test]
fn test_args_override_env_override_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zot.yaml");
    fs::write(
        &path,
        "api:\n  endpoint: http://file.example/\n  timeout_secs: 5\ncredentials:\n  user_id: file-id\n  user_key: file-key\nsession:\n  verbose: true\n",
    )
    .unwrap();
    let file_config = FileConfig::load_from(&path).unwrap();

    let args = Args {
        endpoint: Some("http://args.example".to_string()),
        ..Args::default()
    };
    let env = env_from(&[("ZOTERO_USER_ID", "env-id")]);

    let config = Config::from_sources(&args, file_config, env).unwrap();
    assert_eq!(config.endpoint, "http://args.example");
    assert_eq!(config.user_id.as_deref(), Some("env-id"));
    assert_eq!(config.user_key.as_deref(), Some("file-key"));
    assert_eq!(config.timeout_secs, 5);
    assert!(config.verbose);
}

#[test]
fn test_env_keys_file_fills_missing_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let keys = temp_dir.path().join("keys.txt");
    fs::write(&keys, "from-file\nfile-key\n").unwrap();
    let keys = keys.to_str().unwrap().to_string();

    let env = env_from(&[("ZOTERO_USER_ID", "env-id"), ("ZOTERO_KEYS_FILE", &keys)]);

    let config = Config::from_sources(&Args::default(), FileConfig::default(), env).unwrap();
    assert_eq!(config.user_id.as_deref(), Some("env-id"));
    assert_eq!(config.user_key.as_deref(), Some("file-key"));
}

#[test]
fn test_cli_keys_file_supplies_both_values() {
    let temp_dir = TempDir::new().unwrap();
    let keys = temp_dir.path().join("keys.txt");
    fs::write(&keys, "from-file\nfile-key\n").unwrap();

    let args = Args {
        keys_file: Some(keys),
        ..Args::default()
    };
    let env = env_from(&[("ZOTERO_USER_ID", "env-id"), ("ZOTERO_API_KEY", "env-key")]);

    let config = Config::from_sources(&args, FileConfig::default(), env).unwrap();
    assert_eq!(config.user_id.as_deref(), Some("from-file"));
    assert_eq!(config.user_key.as_deref(), Some("file-key"));
}

#[test]
fn test_explicit_keys_file_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let args = Args {
        keys_file: Some(temp_dir.path().join("missing.txt")),
        ..Args::default()
    };
    let result = Config::from_sources(&args, FileConfig::default(), env_from(&[]));
    assert!(result.is_err());
}

#[test]
fn test_json_config_with_env_expansion() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zot.json");
    fs::write(
        &path,
        r#"{"credentials": {"user_id": "${ZOT_TEST_ID}", "user_key": "k"}}"#,
    )
    .unwrap();
    let file_config = FileConfig::load_from(&path).unwrap();

    let env = env_from(&[("ZOT_TEST_ID", "777")]);
    let config = Config::from_sources(&Args::default(), file_config, env).unwrap();
    assert_eq!(config.user_id.as_deref(), Some("777"));
}
