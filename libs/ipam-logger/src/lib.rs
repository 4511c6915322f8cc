mod config;
pub use config::{Level, LogTargetConfig, LoggingConfig};

pub type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

mod level_filter_trie;

pub fn init(config: &LoggingConfig) -> Result<(), AnyError> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{Layer, filter};

    let filter = level_filter_trie::FilterTrie::from_statements(&config.log_target_filter);
    let default_level = config.min_log_level;

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_names(false)
        .with_file(config.with_file)
        .with_writer(std::io::stderr)
        .with_filter(filter::filter_fn(move |meta| {
            let level = filter
                .level_for_target(meta.target().split("::"))
                .unwrap_or(default_level);
            level >= *meta.level()
        }));

    tracing_subscriber::registry().with(fmt).try_init()?;
    Ok(())
}

/// Same as [`init`], but for tests: repeated calls are fine and the output is
/// captured by the test harness.
pub fn init_for_tests(config: &LoggingConfig) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(config.min_log_level)
        .with_test_writer()
        .try_init();
}
