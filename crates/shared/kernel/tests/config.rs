use cradle_kernel::KernelError;
use cradle_kernel::config::load_config;
use cradle_kernel::domain::config::BootstrapConfig;
use std::path::{Path, PathBuf};

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg: BootstrapConfig = load_config(Some(dir.path().join("absent"))).unwrap();

    assert_eq!(cfg.document.path, PathBuf::from("conf/cradle.yaml"));
    assert_eq!(cfg.log.level, "info");
    assert!(cfg.log.console);
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cradle.yaml");
    let text = "document:\n  path: /etc/cradle/main.json\nlog:\n  level: debug\n  json: true\n";
    std::fs::write(&path, text).unwrap();

    let cfg: BootstrapConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.document.path, Path::new("/etc/cradle/main.json"));
    assert_eq!(cfg.log.level, "debug");
    assert!(cfg.log.json);
    assert_eq!(cfg.log.max_files, 10);
}

#[test]
fn malformed_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cradle.yaml");
    std::fs::write(&path, "log: [\n").unwrap();

    let err = load_config::<BootstrapConfig>(Some(&path)).unwrap_err();
    assert!(matches!(err, KernelError::Config { .. }));
}
