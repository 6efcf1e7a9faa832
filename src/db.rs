//! Global database connection pool.

use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connect to the database and store the pool globally.
/// Called once at startup before any request is served.
pub async fn init_db(database_url: String) {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(16)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let pool = Database::connect(options)
        .await
        .expect("Failed to connect to database.");

    DB_POOL
        .set(pool)
        .expect("init_db() called more than once.");
}

/// Returns the global connection pool.
pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL.get().expect("Database pool not initialized.")
}
