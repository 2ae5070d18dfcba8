//! A small polling service: users register and log in, then create polls and
//! vote on them over a JSON HTTP API.
//!
//! | Method | Path | Token |
//! |---|---|---|
//! | `POST` | `/register` | no |
//! | `POST` | `/login` | no |
//! | `GET` | `/polls` | no |
//! | `POST` | `/polls` | yes |
//! | `POST` | `/polls/{id}/vote` | yes |
//!
//! The token returned by `/login` goes verbatim in the `Authorization` header.
use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;
use tracing::info;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

use config::Config;
use error::StartupError;
use state::AppState;

pub async fn start_server(config: Config) -> Result<(), StartupError> {
    info!("Initializing state...");
    let state = AppState::from_config(&config).await?;
    let app = routes::create_routes(state);

    let address: SocketAddr = config.bind_address().parse()?;
    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    info!("Server running on http://{address}");
    axum_server::bind(address)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
