use thiserror::Error;

use crate::db_types::{RequestCallback, RequestId};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Request {0} ({1}) refers to subject #{2}, which does not exist")]
    SubjectMissing(RequestId, RequestCallback, i64),
    #[error("Row for {0} #{1} disappeared mid-transaction")]
    RowVanished(&'static str, i64),
}
