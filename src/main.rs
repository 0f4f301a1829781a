use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod db;
mod error;
mod handlers;
mod models;

use crate::config::Config;

/// Shared application state, handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_filter())),
        )
        .with_target(false)
        .compact()
        .init();

    info!(
        debug = config.debug,
        testing = config.testing,
        "Product catalog service starting"
    );

    let pool = db::init_db(&config).await?;
    let state = AppState { db: pool.clone() };
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db::close_db(pool).await;
    info!("Service stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Health & landing page ───────────────────────────────────────────
        .route("/health", get(handlers::health))
        .route("/", get(handlers::index))

        // ── Products CRUD ───────────────────────────────────────────────────
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )

        // ── Filters ─────────────────────────────────────────────────────────
        .route(
            "/products/name/:name",
            get(handlers::products::list_products_by_name),
        )
        .route(
            "/products/category/:category",
            get(handlers::products::list_products_by_category),
        )
        .route(
            "/products/availability/:available",
            get(handlers::products::list_products_by_availability),
        )

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
