use cradle_domain::config::{BootstrapConfig, DocumentConfig, LogConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let document = DocumentConfig::default();
    assert_eq!(document.path, std::path::PathBuf::from("conf/cradle.yaml"));

    let log = LogConfig::default();
    assert_eq!(log.level, "info");
    assert!(log.console);
    assert!(log.path.is_none());
    assert_eq!(log.max_files, 10);
}

#[test]
fn bootstrap_config_deserializes() {
    let raw = json!({
        "document": { "path": "/etc/cradle/cradle.yaml" },
        "log": { "level": "debug", "json": true, "path": "/var/log/cradle" }
    });

    let cfg: BootstrapConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.document.path, std::path::PathBuf::from("/etc/cradle/cradle.yaml"));
    assert_eq!(cfg.log.level, "debug");
    assert!(cfg.log.json);
    assert!(cfg.log.console, "unset fields keep their defaults");
}
