use anyhow::Context;
use mimalloc::MiMalloc;
use std::sync::Arc;
use tracing::info;

use fyyur_trivia::{
    config::{Config, StoreBackend},
    controllers,
    database::Database,
    init_tracing,
    store::{BookingStore, MemoryBookingStore, PgBookingStore},
    FyyurState,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::fyyur_from_env()?;
    init_tracing(&config.app);

    info!(environment = %config.app.environment, "Starting Fyyur");

    let store: Arc<dyn BookingStore> = match &config.store {
        StoreBackend::Postgres(db) => {
            // Connect to the database
            let database = Database::new(&db.url, db.pool_size)
                .await
                .context("failed to connect to database")?;
            info!("Database connected");

            database
                .run_fyyur_migrations()
                .await
                .context("failed to run migrations")?;
            Arc::new(PgBookingStore::new(database.pool))
        }
        StoreBackend::Memory => {
            info!("Using the seeded in-memory store");
            Arc::new(MemoryBookingStore::seeded())
        }
    };

    let app = controllers::fyyur::router(FyyurState::new(store));

    let addr = config.app.socket_addr()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
