use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::config::BootstrapConfig;
use crate::entity::{dog_caretaker, vaccination};
use crate::repository;

fn composite_indexes() -> Vec<(&'static str, IndexCreateStatement)> {
    vec![
        // Caretaker detail: SELECT dog_id FROM dog_caretaker WHERE caretaker_id = ?
        (
            "idx_dog_caretaker_caretaker",
            Index::create()
                .if_not_exists()
                .name("idx_dog_caretaker_caretaker")
                .table(dog_caretaker::Entity)
                .col(dog_caretaker::Column::CaretakerId)
                .col(dog_caretaker::Column::DogId)
                .to_owned(),
        ),
        // Dog detail: vaccinations of one dog by date
        (
            "idx_vaccination_dog_date",
            Index::create()
                .if_not_exists()
                .name("idx_vaccination_dog_date")
                .table(vaccination::Entity)
                .col(vaccination::Column::DogId)
                .col(vaccination::Column::VaccinationDate)
                .to_owned(),
        ),
    ]
}

/// Ensure composite indexes exist.
///
/// SeaORM's schema-sync only creates single-column indexes, so these are
/// created on startup. Failures are logged and skipped.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    for (name, index) in composite_indexes() {
        let stmt = match backend {
            DbBackend::Sqlite => index.to_string(SqliteQueryBuilder),
            _ => index.to_string(PostgresQueryBuilder),
        };
        match db.execute_unprepared(&stmt).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
        }
    }
    Ok(())
}

/// Create the configured superuser unless that username already exists.
pub async fn bootstrap_superuser(db: &DatabaseConnection, bootstrap: &BootstrapConfig) {
    let (Some(username), Some(password)) = (
        bootstrap.superuser_username.as_deref(),
        bootstrap.superuser_password.as_deref(),
    ) else {
        return;
    };

    match repository::caretaker::ensure_superuser(db, username, password).await {
        Ok(true) => info!(%username, "Created superuser"),
        Ok(false) => tracing::debug!(%username, "Superuser already exists"),
        Err(e) => tracing::warn!(%username, "Failed to create superuser: {:?}", e),
    }
}
