//! supplyline server binary.
//!
//! - Strict YAML config (path from `SUPPLYLINE_CONFIG`, default `supplyline.yaml`)
//! - SQLite record store, schema bootstrapped at startup
//! - Bearer-token HTTP API + ops endpoints
//! - Graceful shutdown on SIGINT/SIGTERM

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use supplyline_server::{app_state, config, router, store};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("SUPPLYLINE_CONFIG").unwrap_or_else(|_| "supplyline.yaml".into());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .expect("server.listen must be a valid SocketAddr");

    let db = store::SqliteStore::connect(&cfg.database)
        .await
        .expect("database connect failed");

    let state = app_state::AppState::new(&cfg, db);
    let app = router::build_router(state);

    tracing::info!(%listen, "supplyline-server starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
