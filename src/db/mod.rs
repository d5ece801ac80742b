pub mod queries;
pub mod transfer;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Error, Executor};

pub use queries::categories::Category;
pub use queries::questions::{NewQuestion, Question};

/// Standard trivia data set, loaded by `cli seed` and by the test harness.
pub const SEED_SQL: &str = include_str!("../../data/trivia.sql");

pub async fn establish_connection(url: &str, max_connections: u32) -> Result<SqlitePool, Error> {
    // foreign_keys is on by default in sqlx, set it anyway so the invariant is visible here
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub async fn seed(pool: &SqlitePool) -> Result<(), Error> {
    pool.execute(SEED_SQL).await?;
    Ok(())
}
