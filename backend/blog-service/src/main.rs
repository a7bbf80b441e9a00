use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

use blog_service::config::{Config, StoreBackend};
use blog_service::handlers::{self, AppState};
use blog_service::store::{MemoryStore, PgStore, PostStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("🔧 Starting blog-service");

    // Load configuration
    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to load configuration")?;
    info!(
        "✅ Configuration loaded: env={}, port={}, page_size={}, cache_ttl={}s",
        config.app.env, config.app.port, config.feed.page_size, config.feed.index_cache_ttl_secs
    );

    // Initialize the post store
    let store: Arc<dyn PostStore> = match config.store.backend {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await
                .context("Failed to connect to database")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("✅ Database pool created, migrations applied");

            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            info!("✅ Using in-memory post store (local development mode)");
            Arc::new(MemoryStore::new())
        }
    };

    let state = web::Data::new(AppState::new(store, &config));

    let addr = format!("{}:{}", config.app.host, config.app.port);
    info!("🚀 blog-service listening on http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/ready", web::get().to(|| async { "READY" }))
            .configure(handlers::configure)
    })
    .bind(&addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")?;

    info!("🛑 blog-service shutting down");
    Ok(())
}
