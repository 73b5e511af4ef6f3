use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use promotions_api::middleware;
use promotions_api::routes;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controls the log level (default: info); logs go to stderr
    // without ANSI colors so they stay readable in log files.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("Promotions service starting...");

    let db_path = std::env::var("PROMOTIONS_DB").unwrap_or_else(|_| "promotions.db".to_string());
    let app_state = routes::create_app_state(Path::new(&db_path))
        .with_context(|| format!("Failed to open promotions database at {}", db_path))?;

    let app = routes::create_api_router().with_state(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::create_cors_layer()),
    );

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid HOST/PORT configuration")?;

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
