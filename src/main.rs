use anyhow::Result;
use std::sync::Arc;

use zoom_relay::{auth, config, http_client, routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let config = config::Config::load()?;
    config.validate()?;

    // Initialize logging with a configured level
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("🚀 Zoom Relay starting...");
    tracing::info!(
        "Server configured: {}:{}",
        config.server_host,
        config.server_port
    );

    // Shared HTTP client for the OAuth and REST endpoints
    let client = http_client::build_client(config.http_connect_timeout, config.http_request_timeout)?;
    tracing::info!("✅ HTTP client initialized");

    let oauth = auth::OAuthClient::new(
        client.clone(),
        &config.oauth_base_url,
        config.client_id.clone(),
        config.client_secret.clone(),
        config.redirect_uri.clone(),
    );

    tracing::info!("Initializing token manager...");
    let token_manager = Arc::new(auth::TokenManager::new(
        config.initial_token.clone(),
        config.refresh_token.clone(),
        oauth,
        config.adopt_exchanged_token,
    ));

    let zoom_client = Arc::new(http_client::ZoomApiClient::new(
        client,
        config.api_base_url.clone(),
    ));

    let app_state = routes::AppState {
        token_manager,
        zoom_client,
    };

    // Build the application with routes and middleware
    let app = routes::build_app(app_state);

    // Bind to configured host and port
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    print_startup_banner(&config);

    // Start server with graceful shutdown
    tracing::info!("Server is running on port {}", config.server_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server shutdown complete");

    Ok(())
}

/// Print startup banner
fn print_startup_banner(config: &config::Config) {
    let banner = r#"
╔═══════════════════════════════════════════════════════════╗
║                                                           ║
║                    📅 Zoom Relay                          ║
║                                                           ║
║  OAuth2 relay for the Zoom meetings API                  ║
║                                                           ║
╚═══════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner);
    println!("  Version:      {}", env!("CARGO_PKG_VERSION"));
    println!(
        "  Server:       http://{}:{}",
        config.server_host, config.server_port
    );
    println!("  OAuth URL:    {}", config.oauth_base_url);
    println!("  API URL:      {}", config.api_base_url);
    println!("  Redirect URI: {}", config.redirect_uri);
    println!(
        "  Code tokens:  {}",
        if config.adopt_exchanged_token {
            "adopted as shared credential"
        } else {
            "returned only"
        }
    );
    println!("  Log Level:    {}", config.log_level);
    println!();
}

/// Handle graceful shutdown signal
async fn shutdown_signal() {
    use tokio::signal;

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
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown...");
        },
    }
}
