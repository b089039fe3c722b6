use dotenvy::dotenv;
use log::*;
use order_engine::{sqlite::db::run_migrations, SqliteDatabase};
use sqlx::{migrate::MigrateDatabase, Sqlite};
use thiserror::Error;

mod config;
mod promotion_worker;

use config::WorkerConfig;
use promotion_worker::start_promotion_worker;

#[derive(Debug, Error)]
enum WorkerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let config = WorkerConfig::from_env_or_default();

    info!("🚀️ Starting the order promotion worker (every {}s)", config.promote_interval.as_secs());
    match run_worker(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}

async fn run_worker(config: WorkerConfig) -> Result<(), WorkerError> {
    let url = config.database_url.as_str();
    if !Sqlite::database_exists(url).await.unwrap_or(false) {
        info!("🚀️ Creating database at {url}");
        Sqlite::create_database(url).await?;
    }
    let db = SqliteDatabase::new_with_url(url, config.max_connections).await?;
    run_migrations(db.pool()).await?;
    let handle = start_promotion_worker(db, config.promote_interval);
    handle.await?;
    Ok(())
}
