#![cfg(all(feature = "core", feature = "event", feature = "log"))]

use cradle::kernel::prelude::*;
use cradle::modules;

#[test]
fn default_features_register_every_builtin() {
    let registry = cradle::registry().unwrap();
    let names: Vec<_> = registry.all().iter().map(Module::name).collect();
    assert_eq!(names, modules::ENABLED);
    assert!(modules::is_enabled("event"));
    assert!(!modules::is_enabled("http"));
}

#[test]
fn extra_modules_follow_the_builtins() {
    let extra = Module::builder("extra").build();
    let registry = cradle::registry_with([extra]).unwrap();
    assert_eq!(registry.find("extra").map(Module::index), Some(modules::ENABLED.len()));

    let clash = Module::builder("core").build();
    assert!(matches!(
        cradle::registry_with([clash]),
        Err(KernelError::DuplicateRegistration { .. })
    ));
}

#[test]
fn full_document_loads_and_initializes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cradle.yaml");
    std::fs::write(
        &path,
        "worker_threads: 2\nlog_level: info\nevents:\n  worker_connections: 256\n  multi_accept: true\n",
    )
    .unwrap();

    let registry = cradle::registry().unwrap();
    let cycle = cradle::check(&registry, &path).unwrap();

    assert_eq!(cycle.state(), CycleState::Initialized);
    let core = modules::core::CoreConf::of(&cycle).unwrap();
    assert_eq!(core.worker_threads, 2);
    let event = modules::event::EventConf::of(&cycle).unwrap();
    assert_eq!(event.worker_connections, 256);
    assert!(event.multi_accept);
}

#[test]
fn sequence_documents_are_merged_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cradle.yaml");
    std::fs::write(&path, "- worker_threads: 2\n- worker_threads: 6\n  pid: cradle.pid\n").unwrap();

    let registry = cradle::registry().unwrap();
    let cycle = cradle::load(&registry, &path).unwrap();
    let core = modules::core::CoreConf::of(&cycle).unwrap();
    assert_eq!(core.worker_threads, 6);
    assert_eq!(core.pid, "cradle.pid");
}

#[test]
fn load_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cradle.yaml");
    std::fs::write(&path, "worker_connections: 10\n").unwrap();

    let registry = cradle::registry().unwrap();
    let err = cradle::load(&registry, &path).unwrap_err();
    assert!(matches!(err, KernelError::UnknownDirective { .. }));
    assert!(err.to_string().contains("cradle.yaml"), "{err}");
}
