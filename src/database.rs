use sqlx::{migrate::Migrator, postgres::PgPoolOptions, Pool, Postgres};
use std::time::Duration;
use tracing::info;

static FYYUR_MIGRATIONS: Migrator = sqlx::migrate!("./src/migrations/fyyur");
static TRIVIA_MIGRATIONS: Migrator = sqlx::migrate!("./src/migrations/trivia");

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Postgres>,
}

impl Database {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn run_fyyur_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running fyyur migrations...");
        FYYUR_MIGRATIONS.run(&self.pool).await?;
        info!("Migrations completed");
        Ok(())
    }

    pub async fn run_trivia_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running trivia migrations...");
        TRIVIA_MIGRATIONS.run(&self.pool).await?;
        info!("Migrations completed");
        Ok(())
    }
}
