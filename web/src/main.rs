use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use wikiracer_web::config::ServerConfig;
use wikiracer_web::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        }
    };
    let port = config.port;

    let state = Arc::new(AppState::new(config));
    let app = wikiracer_web::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap();

    info!("Server running on http://0.0.0.0:{port}");

    axum::serve(listener, app).await.unwrap();
}
