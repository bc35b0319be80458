use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("workspace `{0}` was already migrated")]
    AlreadyMigrated(Uuid),

    #[error("{table} `{id}` references a missing row")]
    MissingReference { table: &'static str, id: Uuid },

    #[cfg(feature = "pg")]
    #[error("sqlx `{0}`")]
    Sqlx(#[from] sqlx::Error),

    #[error("{0}")]
    Any(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
