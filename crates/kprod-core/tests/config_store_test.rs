//! File-backed configuration store behaviour.

use kprod_core::{ConfigError, ConfigStore, ConnectionSettings, FileConfigStore, PersistedConfig};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> FileConfigStore {
    FileConfigStore::new(dir.path().join(".kafka-producer.json"))
}

#[test]
fn missing_file_yields_documented_default() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let config = store.load().unwrap();

    assert_eq!(config, PersistedConfig::documented_default());
    assert!(!store.path().exists(), "load must not create the file");
}

#[test]
fn existing_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(
        store.path(),
        r#"{
            "brokers": ["broker1:9092", "broker2:9092"],
            "topic": "my-topic",
            "cert_file": "/path/to/cert.pem",
            "key_file": "/path/to/key.pem",
            "ca_file": "/path/to/ca.pem",
            "key_serde": "string",
            "value_serde": "bytearray",
            "use_auth": true
        }"#,
    )
    .unwrap();

    let config = store.load().unwrap();

    assert_eq!(config.brokers, vec!["broker1:9092", "broker2:9092"]);
    assert_eq!(config.topic, "my-topic");
    assert_eq!(config.ca_file, "/path/to/ca.pem");
    assert_eq!(config.value_serde, "bytearray");
    assert!(config.use_auth);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "{ this is not json").unwrap();

    let err = store.load().unwrap_err();

    assert!(matches!(err, ConfigError::Malformed { .. }), "{err:?}");
    assert!(err.to_string().contains(".kafka-producer.json"), "{err}");
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut settings = ConnectionSettings {
        brokers: vec!["kafka:9093".into()],
        topic: "payments".into(),
        cert_path: "/tls/client.pem".into(),
        key_path: "/tls/client.key".into(),
        ca_path: "/tls/ca.pem".into(),
        ..Default::default()
    };
    settings.recompute_auth();

    store.save(&settings.to_persisted()).unwrap();
    let loaded = ConnectionSettings::from(store.load().unwrap());

    assert_eq!(loaded, settings);
    assert!(loaded.use_auth);
}

#[test]
fn save_overwrites_previous_contents() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let long = PersistedConfig { topic: "a-rather-long-topic-name".repeat(10), ..Default::default() };
    store.save(&long).unwrap();
    let short = PersistedConfig { topic: "t".into(), ..Default::default() };
    store.save(&short).unwrap();

    assert_eq!(store.load().unwrap(), short);
}

#[cfg(unix)]
#[test]
fn saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "{}").unwrap();
    std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

    store.save(&PersistedConfig::documented_default()).unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
