//! HTTP surface: public site API plus the admin dashboard API.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub use state::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/properties", get(handlers::properties::list_properties))
        .route("/properties/search", post(handlers::properties::search_properties))
        .route("/properties/:id", get(handlers::properties::get_property))
        .route("/properties/:id/similar", get(handlers::properties::similar_properties))
        .route("/blog", get(handlers::content::list_posts))
        .route("/blog/:slug", get(handlers::content::get_post))
        .route("/areas", get(handlers::content::list_areas))
        .route("/areas/:slug", get(handlers::content::get_area))
        .route("/leads", post(handlers::leads::submit_lead))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout));

    let admin_routes = Router::new()
        .route("/overview", get(handlers::admin::overview))
        .route("/leads", get(handlers::admin::list_leads))
        .route("/properties", post(handlers::admin::create_property))
        .route(
            "/properties/:id",
            put(handlers::admin::update_property).delete(handlers::admin::delete_property),
        )
        .route(
            "/blog",
            get(handlers::admin::list_posts).post(handlers::admin::create_post),
        )
        .route(
            "/blog/:slug",
            put(handlers::admin::update_post).delete(handlers::admin::delete_post),
        )
        .route(
            "/areas/:slug",
            put(handlers::admin::upsert_area).delete(handlers::admin::delete_area),
        );

    Router::new()
        .nest("/api", public_routes.nest("/admin", admin_routes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn run_server(state: AppState, address: &str) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
