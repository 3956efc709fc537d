//! Rekod Pejabat - Backend Server
//!
//! Office records for correspondence (surat), payments (bayaran) and the
//! file index, with role-based access control.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod routes;
mod services;

pub use config::Config;
use services::{BayaranService, FailService, RecordCaches, SuratService, UserService};

/// Shared by every handler. Record services are built per request over
/// the long-lived snapshot caches.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub caches: RecordCaches,
}

impl AppState {
    pub fn surat_service(&self) -> SuratService {
        SuratService::new(self.db.clone(), self.caches.surat.clone())
    }

    pub fn bayaran_service(&self) -> BayaranService {
        BayaranService::new(self.db.clone(), self.caches.bayaran.clone())
    }

    pub fn fail_service(&self) -> FailService {
        FailService::new(self.db.clone(), self.caches.fail.clone())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config = config::Config::load()?;
    tracing::info!(environment = %config.environment, "starting rekod-server");

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;
    tracing::info!(max_connections = config.database.max_connections, "database pool ready");

    // Schema changes are applied automatically only outside production
    if config.environment == "development" {
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("migrations applied");
    }

    if let Some(bootstrap) = &config.bootstrap {
        UserService::new(db_pool.clone())
            .bootstrap_admin(bootstrap)
            .await
            .map_err(|e| anyhow::anyhow!("bootstrap admin failed: {}", e))?;
    }

    let state = AppState {
        db: db_pool,
        caches: RecordCaches::new(Duration::from_secs(config.cache.ttl_secs)),
        config: Arc::new(config.clone()),
    };

    refresh_snapshots(&state).await;
    spawn_snapshot_refresh(state.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rekod_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

/// Reload every record snapshot on a fixed period
fn spawn_snapshot_refresh(state: AppState) {
    let period = Duration::from_secs(state.config.cache.refresh_interval_secs.max(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            refresh_snapshots(&state).await;
        }
    });
}

async fn refresh_snapshots(state: &AppState) {
    let results = [
        ("surat", state.surat_service().refresh().await),
        ("bayaran", state.bayaran_service().refresh().await),
        ("fail", state.fail_service().refresh().await),
    ];
    for (name, result) in results {
        match result {
            Ok(count) => tracing::debug!(cache = name, count, "snapshot refreshed"),
            Err(e) => tracing::warn!(cache = name, error = %e, "snapshot refresh failed"),
        }
    }
}

async fn root() -> &'static str {
    "Rekod Pejabat API v1.0"
}
