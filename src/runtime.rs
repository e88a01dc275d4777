//! Tokio runtime configuration and shutdown plumbing
//!
//! Port workers are blocking tasks, so the async side stays small: the
//! reporter, the signal handler and the worker joins. A single `watch`
//! channel carries the stop signal to every worker and the reporter.

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    worker_threads: usize,
}

impl RuntimeConfig {
    /// Create runtime config from the optional CLI thread count
    ///
    /// Defaults to 1 thread; 0 means "use all CPU cores". The blocking
    /// pool that carries the port workers is sized by tokio independently.
    #[must_use]
    pub fn from_args(threads: Option<usize>) -> Self {
        let worker_threads = match threads {
            None => 1,
            Some(0) => std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1),
            Some(n) => n,
        };
        Self { worker_threads }
    }

    /// Number of async worker threads
    #[must_use]
    pub const fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Check if single-threaded
    #[must_use]
    pub const fn is_single_threaded(&self) -> bool {
        self.worker_threads == 1
    }

    /// Build the tokio runtime
    ///
    /// # Errors
    /// Returns error if runtime creation fails
    pub fn build_runtime(self) -> Result<tokio::runtime::Runtime> {
        let rt = if self.is_single_threaded() {
            info!("Starting drop monitor with single-threaded runtime");
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
        } else {
            info!(
                "Starting drop monitor with {} async worker threads",
                self.worker_threads
            );
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(self.worker_threads)
                .enable_all()
                .build()?
        };
        Ok(rt)
    }
}

/// Create the shared shutdown channel, initially not signalled
#[must_use]
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM on Unix)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Spawn the task that turns an OS signal into the shutdown broadcast
///
/// Workers poll the watch value at every read boundary, so the latency
/// from signal to a fully stopped process is bounded by the serial read
/// timeout plus one idle sleep.
#[must_use]
pub fn spawn_shutdown_handler(shutdown_tx: watch::Sender<bool>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, stopping workers");
        let _ = shutdown_tx.send(true);
    })
}
