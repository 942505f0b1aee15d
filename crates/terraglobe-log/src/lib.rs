//! Tracing setup for terraglobe tools.
//!
//! Console output is human-readable and timed from process start. Debug builds
//! given a log directory also write a JSON copy of every event to `terraglobe.log`.

use std::path::Path;

use terraglobe_config::Config;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// JSON log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "terraglobe.log";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the config's `debug.log_level`, which wins over
/// [`DEFAULT_DIRECTIVE`]. File logging only happens when `debug_build` is set;
/// a log directory that cannot be created is reported on the console and
/// skipped.
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Result<(), TryInitError> {
    let directive = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let Some(dir) = log_dir.filter(|_| debug_build) else {
        return subscriber.try_init();
    };

    match open_log_file(dir) {
        Ok(file) => {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::uptime())
                .json();
            subscriber.with(file_layer).try_init()
        }
        Err(e) => {
            subscriber.try_init()?;
            tracing::warn!("File logging disabled for {}: {e}", dir.display());
            Ok(())
        }
    }
}

/// The filter string derived from config, before `RUST_LOG` is consulted.
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(c) if !c.debug.log_level.trim().is_empty() => c.debug.log_level.trim().to_string(),
        _ => DEFAULT_DIRECTIVE.to_string(),
    }
}

/// An `EnvFilter` built from [`DEFAULT_DIRECTIVE`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_DIRECTIVE)
}

fn open_log_file(dir: &Path) -> std::io::Result<std::fs::File> {
    std::fs::create_dir_all(dir)?;
    std::fs::File::create(dir.join(LOG_FILE_NAME))
}
