//! HTTP surface: one axum route per (verb, path) pair.
//!
//! Handlers stay thin. They extract path, query and body, call the matching
//! `ShippingService` method and serialize the result. Every data route sits
//! behind the readiness gate; `/` and `/health/ready` always answer.

pub mod error;
pub mod handlers;
pub mod readiness;

use crate::application::readiness::Readiness;
use crate::application::service::ShippingService;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ShippingService>,
    pub readiness: Readiness,
}

impl AppState {
    pub fn new(service: Arc<ShippingService>, readiness: Readiness) -> Self {
        Self { service, readiness }
    }
}

pub fn router(state: AppState) -> Router {
    let data_routes = Router::new()
        .route("/books", get(handlers::list_books))
        .route("/book/:id", get(handlers::get_book))
        .route(
            "/parcels",
            get(handlers::list_parcels).post(handlers::create_parcel),
        )
        .route(
            "/parcels/:id",
            get(handlers::get_parcel)
                .put(handlers::update_parcel)
                .delete(handlers::delete_parcel),
        )
        .route(
            "/create-checkout-session",
            post(handlers::create_checkout_session),
        )
        .route("/coverage", get(handlers::list_coverage))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            readiness::require_ready,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health/ready", get(handlers::ready))
        .merge(data_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `router` on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
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
}
