//! ArcDraft persistence layer.
//!
//! Entity models live in [`models`]. Business logic talks to storage only
//! through the [`store::Store`] interface, which has two implementations:
//! [`memory::MemoryStore`] (process-local, insertion-ordered) and
//! [`postgres::PgStore`] (PostgreSQL through the repositories in
//! [`repositories`]).

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{Store, StoreError, StoreResult};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
