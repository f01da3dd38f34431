//! Comment Engine
//!
//! Self-hosted comment backend for static pages:
//! - Threaded, paginated comment listings with sticky support
//! - Validated, rate-limited, spam-classified submissions
//! - Best-effort push notification with a bounded wait

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use api::{router, AppState};
use comment_core::CommentConfig;
use comment_store::{CommentStore, MemoryStore};
use telemetry::{health, init_tracing_from_env};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    comment: CommentConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            comment: CommentConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Comment Engine v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    info!(
        page_size = config.comment.comment_count,
        rate_limit = config.comment.rate_limit.max_submissions,
        push_configured = config.comment.push_url.is_some(),
        "Loaded comment config"
    );

    // The bundled store keeps comments in process memory; deployments with
    // an external document store plug their driver in through CommentStore.
    let store: Arc<dyn CommentStore> = Arc::new(MemoryStore::new());

    check_health(store.as_ref()).await;

    // Create application state
    let state = AppState::new(store, config.comment.clone());

    // Start rate limiter cleanup background task
    let _limiter_cleanup = state.start_limiter_cleanup();
    info!("Started rate limiter cleanup task (every 5 minutes)");

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("COMMENT")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested comment config from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(owner_mail) = std::env::var("COMMENT_OWNER_MAIL") {
        config.comment.owner_mail = owner_mail;
    }
    if let Ok(username) = std::env::var("COMMENT_USERNAME") {
        config.comment.username = username;
    }
    if let Ok(password) = std::env::var("COMMENT_PASSWORD") {
        config.comment.password = password;
    }
    if let Ok(site_url) = std::env::var("COMMENT_SITE_URL") {
        config.comment.site_url = site_url;
    }
    if let Ok(push_url) = std::env::var("COMMENT_PUSH_URL") {
        config.comment.push_url = Some(push_url);
    }
    if let Ok(secret) = std::env::var("COMMENT_AUTH_SECRET") {
        config.comment.auth.secret = secret;
    }
    if let Ok(endpoint) = std::env::var("COMMENT_CLASSIFIER_ENDPOINT") {
        config.comment.classifier.endpoint = Some(endpoint);
    }
    if let Ok(key) = std::env::var("COMMENT_CLASSIFIER_KEY") {
        config.comment.classifier.key = Some(key);
    }

    Ok(config)
}

/// Check component health on startup.
async fn check_health(store: &dyn CommentStore) {
    if store.ping().await {
        health().store.set_healthy();
        info!("Store connection: healthy");
    } else {
        health().store.set_unhealthy("Connection failed");
        error!("Store connection: unhealthy");
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
