use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::{AdminConfig, AppConfig, ConfigError, MongoConfig};
use crate::middlewares::admin_middleware::{AdminAuthState, ADMIN_PASSWORD_HEADER};
use crate::repository::quote_repo::MongoQuoteRepository;
use crate::router::app_router;
use crate::service::quote_service::QuoteServiceImpl;
use crate::util::email::notifier_from_env;
use crate::util::quote_number::EpochQuoteNumberGenerator;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Owns everything the process needs: built once at startup, dropped after
/// the server has drained.
pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new() -> Result<Self, AppError> {
        let config = AppConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;
        let admin_config = AdminConfig::from_env()?;

        let quote_repo = MongoQuoteRepository::new(&mongo_config).await?;
        if let Err(e) = quote_repo.ensure_indexes().await {
            // The database may not be up yet; inserts fail on their own if it stays down.
            error!("Could not ensure quote indexes at startup: {}", e);
        }

        // Mail is best-effort: intake keeps working without SMTP settings.
        let notifier = notifier_from_env();
        let quote_service = Arc::new(QuoteServiceImpl::new(
            Arc::new(quote_repo),
            notifier,
            Arc::new(EpochQuoteNumberGenerator),
        ));
        let admin_auth_state = Arc::new(AdminAuthState::new(admin_config.password));

        let router = app_router(quote_service, admin_auth_state)
            .layer(cors_layer(&config))
            .layer(TraceLayer::new_for_http());

        Ok(App { config, router })
    }

    pub async fn start(self) -> Result<(), AppError> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running at http://{}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Allow-list from configuration, or any origin when none is configured.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(ADMIN_PASSWORD_HEADER),
        ])
        .expose_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
