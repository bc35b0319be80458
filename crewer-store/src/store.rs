use uuid::Uuid;

use crate::{engine::Engine, error::Result, legacy::LegacySnapshot, record::Records};

#[derive(Clone)]
pub struct Store {
    pub(crate) engine: Box<dyn Engine>,
}

impl Store {
    pub fn new<E: Engine + 'static>(engine: E) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    pub async fn read_legacy(&self, workspace_id: Uuid) -> Result<LegacySnapshot> {
        self.engine.read_legacy(workspace_id).await
    }

    pub async fn insert_legacy(&self, snapshot: LegacySnapshot) -> Result<()> {
        if snapshot.is_empty() {
            return Ok(());
        }

        self.engine.insert_legacy(snapshot).await
    }

    pub async fn has_productions(&self, workspace_id: Uuid) -> Result<bool> {
        self.engine.has_productions(workspace_id).await
    }

    pub async fn write(&self, workspace_id: Uuid, records: Records) -> Result<()> {
        self.engine.write(workspace_id, records).await
    }

    pub async fn read(&self, workspace_id: Uuid) -> Result<Records> {
        self.engine.read(workspace_id).await
    }
}
