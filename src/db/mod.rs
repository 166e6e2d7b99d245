pub mod queries;

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

pub use queries::categories::Category;
pub use queries::questions::{NewQuestion, Question};

use sqlx::Error;

pub async fn establish_connection(path: &Path) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    SqlitePool::connect_with(options).await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
