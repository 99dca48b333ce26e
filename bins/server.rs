use std::path::PathBuf;

use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

fn init_logging(cfg: &AppConfig) {
    let opts = common::LoggingOptions {
        json: cfg.log.format == LogFormat::Json,
        access_log_path: cfg.log.access_log_path().map(PathBuf::from),
    };
    if let Err(e) = common::init_logging(&opts) {
        // Still log to stdout when the access log file cannot be opened.
        let _ = common::init_logging(&common::LoggingOptions { access_log_path: None, ..opts });
        warn!(
            service = "server",
            event = "access_log_disabled",
            error = %e,
            "access log file unavailable"
        );
    }
    info!(service = "server", event = "logger_init", "tracing subscriber initialized");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(
            service = "server",
            event = "signal_error",
            error = %e,
            "failed to listen for Ctrl+C"
        );
        return;
    }
    info!(service = "server", event = "shutdown_signal", "received Ctrl+C, shutting down");
}

fn main() -> std::process::ExitCode {
    // Load .env before reading CONFIG_PATH, PORT or RUST_LOG.
    dotenv().ok();

    let loaded = AppConfig::load_and_validate();
    init_logging(loaded.as_ref().unwrap_or(&AppConfig::default()));
    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(
                service = "server",
                event = "config_invalid",
                error = %e,
                "invalid configuration"
            );
            return std::process::ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "server",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(
                service = "server",
                event = "runtime_build_failed",
                error = %e,
                "failed to build tokio runtime"
            );
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        host = %cfg.server.host,
        port = cfg.server.port,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "customer registry starting"
    );

    rt.block_on(async move {
        match server::run(&cfg.server, shutdown_signal()).await {
            Ok(()) => {
                info!(
                    service = "server",
                    event = "stop",
                    %service_id,
                    pid,
                    "server stopped normally"
                );
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(
                    service = "server",
                    event = "run_failed",
                    error = %e,
                    "server::run returned error"
                );
                std::process::ExitCode::FAILURE
            }
        }
    })
}
