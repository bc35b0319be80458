use async_trait::async_trait;
use dyn_clone::DynClone;
use uuid::Uuid;

use crate::{error::Result, legacy::LegacySnapshot, record::Records};

#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "pg")]
mod pg;

#[cfg(feature = "memory")]
pub use memory::*;
#[cfg(feature = "pg")]
pub use pg::*;

/// Maximum number of rows sent in a single multi-row insert.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

#[async_trait]
pub trait Engine: DynClone + Send + Sync {
    /// Legacy shows of a workspace ordered by `(start_time, id)`, together with
    /// the child rows that belong to those shows.
    async fn read_legacy(&self, workspace_id: Uuid) -> Result<LegacySnapshot>;

    async fn insert_legacy(&self, snapshot: LegacySnapshot) -> Result<()>;

    async fn has_productions(&self, workspace_id: Uuid) -> Result<bool>;

    /// Writes the marker row of `workspace_id` and every record in one
    /// transaction. Fails with [`StoreError::AlreadyMigrated`] without writing
    /// anything when a marker already exists.
    ///
    /// [`StoreError::AlreadyMigrated`]: crate::StoreError::AlreadyMigrated
    async fn write(&self, workspace_id: Uuid, records: Records) -> Result<()>;

    async fn read(&self, workspace_id: Uuid) -> Result<Records>;
}

dyn_clone::clone_trait_object!(Engine);
