//! Eventum Auth - Authentication and authorization service for the Eventum platform

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::Config;
use eventum_api::{create_router, AppState};
use eventum_auth::{CredentialVerifier, SessionManager};
use eventum_db::{Database, NewUser, Role, UserStore};

/// Eventum Auth - Authentication service for the Eventum platform
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "EVENTUM_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "EVENTUM_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting Eventum Auth v{}", env!("CARGO_PKG_VERSION"));

    // Initialize database
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // Create default sysadmin user if no users exist
    if !db.has_users().await? {
        info!("Creating default sysadmin user");
        let password_hash = eventum_auth::hash_password("admin")?;
        db.insert_user(NewUser {
            username: "admin".to_string(),
            email: "admin@eventum.local".to_string(),
            password_hash,
            full_name: "Default Administrator".to_string(),
            role: Role::Sysadmin,
        })
        .await?;
        info!("Default sysadmin user created (email: admin@eventum.local, password: admin)");
    }

    // Initialize credential verifier over the injected store
    let store: Arc<dyn UserStore> = Arc::new(db.clone());
    let verifier = Arc::new(CredentialVerifier::new(store));

    // Initialize session manager
    let sessions = Arc::new(SessionManager::new(
        &config.auth.session_secret,
        config.auth.session_ttl_hours,
    ));

    // Create application state
    let state = AppState::new(db, verifier, sessions);

    // Create router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
