//! Log output for the command line client.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs a compact stderr logger.
///
/// `RUST_LOG` takes precedence; without it everything at `default_level`
/// and above is shown. Calling this twice is harmless.
pub fn init_logging(default_level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}
