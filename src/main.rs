use dotenv::dotenv;
use nefes_backend::app::app::{App, AppError};
use nefes_backend::util::logger::Logger;
use tracing::{error, info, warn};

async fn run() -> Result<(), AppError> {
    let app = App::new().await?;
    app.start().await
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file before LOG_DIR is read
    let dotenv_result = dotenv();

    let logger = match Logger::new() {
        Ok(logger) => logger,
        Err(e) => {
            let logger = Logger::console_only();
            warn!("⚠️ File logging disabled: {}", e);
            logger
        }
    };

    info!("🚀 Starting Nefes Depo Backend v{}", env!("CARGO_PKG_VERSION"));
    match dotenv_result {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let result = run().await;
    if let Err(e) = &result {
        error!("❌ Server failed: {}", e);
    }

    // Flush file writers before exiting.
    drop(logger);
    if result.is_err() {
        std::process::exit(1);
    }
}
