use cradle_logger::{LevelFilter, Logger, current_filter, reconfigure};

#[test]
fn a_saved_filter_can_be_put_back() {
    let _logger = Logger::builder()
        .name("integration-restore")
        .level(LevelFilter::INFO)
        .env_filter("info")
        .init()
        .expect("logger should initialize");

    let saved = current_filter().expect("filter should be readable");
    reconfigure("trace").expect("valid filter should apply");
    assert!(tracing::enabled!(tracing::Level::TRACE));

    reconfigure(&saved).expect("saved filter should apply");
    assert!(!tracing::enabled!(tracing::Level::DEBUG));
    assert!(tracing::enabled!(tracing::Level::INFO));
}
