use std::sync::Arc;

use bookshelf::config::{Cli, Config};
use bookshelf::credential::Credential;
use bookshelf::error::unpack_error;
use bookshelf::handler::AppState;
use bookshelf::router;
use bookshelf::store::BookStore;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("bookshelf.svc starting");

    let cfg = Config::resolve(args.config_path.as_deref()).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?args.config_path, "failed to load config file");
        std::process::exit(1);
    });

    // The credential must be in place before the store exists or anything is served.
    let credential = Credential::load(&cfg.app.password_file).unwrap_or_else(|e| {
        tracing::error!(error = %unpack_error(&e), "failed to load admin credential");
        std::process::exit(1);
    });

    let store = Arc::new(BookStore::new());
    let state = AppState::new(store, credential, cfg.app.admin_page.clone());
    let app = router(state, &cfg.app.static_dir);

    let address = format!("0.0.0.0:{}", cfg.app.port);
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("bookshelf.svc running on {}", &address);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(err) = result {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }

    tracing::info!("bookshelf.svc going off, graceful shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl+c");
        std::future::pending::<()>().await;
    }
    tracing::info!("ctrl+c signal received, preparing to shutdown");
}
