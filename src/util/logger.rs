use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_CONSOLE_FILTER: &str = "info,nefes_backend=debug,tower_http=debug";

/// Console plus daily-rolling file logging. The guards flush the file
/// writers and must outlive every log call.
pub struct Logger {
    pub guards: Vec<WorkerGuard>,
}

impl Logger {
    /// Log files go under `LOG_DIR` (default `logs`).
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
        let guards = Self::setup_logging(&log_dir)?;
        Ok(Logger { guards })
    }

    /// Console-only fallback for when the log directory is unusable.
    pub fn console_only() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(console_filter())
            .with_target(true)
            .try_init();
        Logger { guards: Vec::new() }
    }

    fn setup_logging(log_dir: &str) -> Result<Vec<WorkerGuard>, Box<dyn std::error::Error>> {
        let error_dir = format!("{}/error", log_dir);
        std::fs::create_dir_all(&error_dir)?;

        let file_log_level = std::env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
        let error_file_log_level = std::env::var("ERROR_FILE_LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        let (general, general_guard) = non_blocking(rolling::daily(log_dir, "nefes-backend.log"));
        let (errors, error_guard) = non_blocking(rolling::daily(&error_dir, "nefes-backend-error.log"));
        let (general_json, json_guard) = non_blocking(rolling::daily(log_dir, "nefes-backend.json"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(true)
                    .with_filter(console_filter()),
            )
            .with(
                fmt::layer()
                    .with_writer(general)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&file_log_level)),
            )
            .with(
                fmt::layer()
                    .with_writer(errors)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&error_file_log_level)),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(general_json)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&file_log_level)),
            )
            .try_init()?;

        Ok(vec![general_guard, error_guard, json_guard])
    }
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER))
}
