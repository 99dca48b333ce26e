use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex};

use tracing_subscriber::{
    filter::{filter_fn, EnvFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

/// Target used by the HTTP access log events.
pub const ACCESS_LOG_TARGET: &str = "access_log";

const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info";

#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Emit JSON lines on stdout instead of the compact human format.
    pub json: bool,
    /// Append access log events as JSON lines to this file.
    pub access_log_path: Option<PathBuf>,
}

/// Initialize the tracing subscriber.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,tower_http=info,axum=info`
/// - Writes to stdout to improve visibility in environments that hide stderr
/// - Mirrors `access_log` events into `access_log_path` when configured
///
/// Calling it twice is not an error; the first subscriber wins.
pub fn init_logging(opts: &LoggingOptions) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_layer = if opts.json {
        fmt::layer()
            .with_target(false)
            .json()
            .with_writer(io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .compact()
            .with_writer(io::stdout)
            .boxed()
    };

    let access_layer = match &opts.access_log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("cannot open access log {}: {e}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(filter_fn(|meta| meta.target() == ACCESS_LOG_TARGET)),
            )
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(stdout_layer.with_filter(env_filter))
        .with(access_layer)
        .try_init();
    Ok(())
}
