use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::config::ServerSettings;
use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;

/// Connection to the farm database
///
/// Cloning shares the underlying pool.
#[derive(Clone)]
pub struct DatabaseConnections {
    pub farm: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect to the database named in the settings
    ///
    /// Does NOT run migrations - call `migrate()` separately.
    pub async fn init(settings: &ServerSettings) -> Result<Self, InternalError> {
        let farm = Self::connect(settings.database_url()).await?;
        Ok(Self { farm })
    }

    /// Wrap an existing connection (used by tests with in-memory SQLite)
    pub fn from_connection(farm: DatabaseConnection) -> Self {
        Self { farm }
    }

    async fn connect(database_url: &str) -> Result<DatabaseConnection, InternalError> {
        let db = Database::connect(database_url)
            .await
            .map_err(|e| InternalError::database("connect_database", e))?;

        tracing::debug!("Connected to farm database: {}", database_url);

        Ok(db)
    }

    /// Run all pending migrations
    pub async fn migrate(&self) -> Result<(), InternalError> {
        Migrator::up(&self.farm, None)
            .await
            .map_err(|e| InternalError::database("run_migrations", e))?;

        tracing::debug!("Farm database migrations completed");

        Ok(())
    }

    pub async fn begin_transaction(&self) -> Result<DatabaseTransaction, InternalError> {
        self.farm
            .begin()
            .await
            .map_err(|source| InternalError::Database(DatabaseError::TransactionBegin { source }))
    }

    pub async fn commit_transaction(txn: DatabaseTransaction) -> Result<(), InternalError> {
        txn.commit()
            .await
            .map_err(|source| InternalError::Database(DatabaseError::TransactionCommit { source }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;
    use sea_orm::{ConnectionTrait, Statement};

    #[tokio::test]
    async fn test_init_and_migrate_in_memory() {
        let env = MockEnvironment::empty().with_var("DATABASE_URL", "sqlite::memory:");
        let settings = ServerSettings::from_env_provider(&env).unwrap();

        let connections = DatabaseConnections::init(&settings).await.unwrap();
        connections.migrate().await.unwrap();

        let row = connections
            .farm
            .query_one(Statement::from_string(
                connections.farm.get_database_backend(),
                "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'cows'",
            ))
            .await
            .unwrap()
            .unwrap();
        let count: i32 = row.try_get("", "n").unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_connect_failure_is_database_error() {
        let env = MockEnvironment::empty().with_var("DATABASE_URL", "postgres-ish://nowhere");
        let settings = ServerSettings::from_env_provider(&env).unwrap();

        let result = DatabaseConnections::init(&settings).await;
        assert!(matches!(result, Err(InternalError::Database(_))));
    }
}
