use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connect to the database and create any missing tables.
///
/// An in-memory SQLite database lives inside a single connection, so the
/// pool is pinned to exactly one connection that is never recycled.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    if is_in_memory(db_url) {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(8))
            .max_lifetime(Duration::from_secs(8));
    }
    opt.sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("shelter::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

fn is_in_memory(db_url: &str) -> bool {
    db_url.starts_with("sqlite") && (db_url.contains(":memory:") || db_url.contains("mode=memory"))
}
