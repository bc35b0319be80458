use crewer_store::StoreError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("workspace `{0}` was already migrated")]
    AlreadyMigrated(Uuid),

    #[error("store `{0}`")]
    Store(StoreError),
}

impl From<StoreError> for MigrationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyMigrated(workspace_id) => MigrationError::AlreadyMigrated(workspace_id),
            e => MigrationError::Store(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;
