use cradle_kernel::prelude::*;
use cradle_log::module;
use cradle_logger::{LevelFilter, Logger};
use tracing::Level;

fn load(text: &str) -> Cycle {
    let registry = Registry::builder().with(module()).unwrap().seal();
    let mut cycle = Cycle::new(registry);
    let doc = Document::parse_str(text, Format::Yaml).unwrap();
    dispatch(&mut cycle, doc.root()).unwrap();
    cycle
}

#[test]
fn filter_changes_only_when_main_hooks_run() {
    let _logger = Logger::builder()
        .name("log-module-main-hook")
        .env_filter("info")
        .level(LevelFilter::INFO)
        .init()
        .expect("logger");

    let mut cycle = load("log_level: debug\n");
    lifecycle::init_modules(&mut cycle).unwrap();
    assert!(!tracing::enabled!(Level::DEBUG), "init must leave the live filter alone");

    lifecycle::run_modules(&mut cycle).unwrap();
    assert!(tracing::enabled!(Level::DEBUG));
    assert!(!tracing::enabled!(Level::TRACE));
}
