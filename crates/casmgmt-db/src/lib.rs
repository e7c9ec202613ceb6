mod sqlite;
pub mod fixtures;

pub use sqlite::DbRegistry;

use casmgmt_core::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("fixture file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("fixture file malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
