//! Centralized logging setup with dual output (stdout + debug.log)

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Initialize logging with dual output: stdout + debug.log file
///
/// Both outputs use the level from the `RUST_LOG` environment variable,
/// defaulting to "info". Port workers attach a `port` field to every
/// diagnostic, so interleaved output stays attributable.
///
/// The appender guard is forgotten to keep the file writer alive for the
/// program lifetime.
pub fn init_dual_logging() {
    let file_appender = tracing_appender::rolling::never(".", "debug.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(env_filter()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(env_filter()),
        )
        .init();

    // Keep guard alive for the program lifetime
    std::mem::forget(_guard);
}
