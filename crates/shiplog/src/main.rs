//! Shiplog - Categorized changelog generator CLI

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let _guard = init_tracing();

    let cli = Cli::parse();
    cli.execute()
}

/// Console logging follows RUST_LOG (default: warn); when a log directory is
/// available, a debug-level JSON layer also writes daily files under
/// ~/.shiplog/logs/. The returned guard flushes the file writer on drop.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_layer = tracing_subscriber::fmt::layer().with_target(false).with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    );

    let (file_layer, guard) = match log_directory() {
        Some(log_dir) => {
            let appender = tracing_appender::rolling::daily(&log_dir, "shiplog.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

/// Log directory under the home directory, created on first use
fn log_directory() -> Option<std::path::PathBuf> {
    let log_dir = dirs::home_dir()?.join(".shiplog").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;
    Some(log_dir)
}
