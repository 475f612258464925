use sea_orm::SqlErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Starting transaction failed: {source}")]
    TransactionBegin {
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Committing transaction failed: {source}")]
    TransactionCommit {
        #[source]
        source: sea_orm::DbErr,
    },
}

impl DatabaseError {
    /// True when the failed statement hit a UNIQUE constraint
    ///
    /// Stores check uniqueness up front; this catches the race where two
    /// requests insert the same value concurrently.
    pub fn is_unique_violation(&self) -> bool {
        let source = match self {
            Self::Operation { source, .. }
            | Self::TransactionBegin { source }
            | Self::TransactionCommit { source } => source,
        };
        matches!(source.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }
}
