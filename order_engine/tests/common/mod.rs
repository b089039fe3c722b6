#![allow(dead_code)]

use log::*;
use order_engine::{
    order_objects::CreateOrderRequest, sqlite::db::run_migrations, OrderLifecycleApi, SqliteDatabase,
};
use sqlx::{migrate::MigrateDatabase, Sqlite};

/// Creates a throw-away SQLite database with the schema applied, ready for a single test.
pub async fn new_test_db() -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let url = random_db_path();
    create_database(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error creating connection to database");
    run_migrations(db.pool()).await.expect("Error running DB migrations");
    db
}

pub async fn new_test_api() -> OrderLifecycleApi<SqliteDatabase> {
    OrderLifecycleApi::new(new_test_db().await)
}

pub fn random_db_path() -> String {
    format!("sqlite://{}/order_engine_test_{}.db", std::env::temp_dir().display(), rand::random::<u64>())
}

async fn create_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

/// A minimal valid creation request: one unit of `p1` at 10.00.
pub fn simple_order(name: &str, email: &str) -> CreateOrderRequest {
    CreateOrderRequest::new(name, email).with_item("p1", 1, "10.00")
}
