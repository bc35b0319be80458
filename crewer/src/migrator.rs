use chrono::Utc;
use crewer_store::{Records, Store};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::MigrationConfig,
    error::{MigrationError, Result},
    plan::plan_migration,
};

/// Rows written by one workspace migration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub workspace_id: Uuid,
    pub shows: usize,
    pub productions: Vec<String>,
    pub templates: usize,
    pub template_required_jobs: usize,
    pub template_resources: usize,
    pub events: usize,
    pub event_crew_assignments: usize,
    pub event_resource_assignments: usize,
}

impl MigrationReport {
    fn new(workspace_id: Uuid, shows: usize, records: &Records) -> Self {
        Self {
            workspace_id,
            shows,
            productions: records.productions.iter().map(|p| p.name.to_owned()).collect(),
            templates: records.templates.len(),
            template_required_jobs: records.template_required_jobs.len(),
            template_resources: records.template_resources.len(),
            events: records.events.len(),
            event_crew_assignments: records.event_crew_assignments.len(),
            event_resource_assignments: records.event_resource_assignments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shows == 0
    }
}

/// Converts legacy shows of a workspace into productions, show templates and
/// events.
///
/// Each workspace is migrated at most once: the store writes a migration
/// marker in the same transaction as the migrated rows, so a second call (or a
/// concurrent one) fails with [`MigrationError::AlreadyMigrated`] and leaves
/// the workspace untouched.
#[derive(Clone)]
pub struct Migrator {
    store: Store,
    config: MigrationConfig,
}

impl Migrator {
    pub fn new(store: &Store) -> Self {
        Self::with_config(store, MigrationConfig::default())
    }

    pub fn with_config(store: &Store, config: MigrationConfig) -> Self {
        Self {
            store: store.clone(),
            config,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn migrate_workspace(&self, workspace_id: Uuid) -> Result<MigrationReport> {
        let legacy = self.store.read_legacy(workspace_id).await?;

        if legacy.shows.is_empty() {
            tracing::debug!("no legacy shows to migrate");

            return Ok(MigrationReport {
                workspace_id,
                ..Default::default()
            });
        }

        tracing::info!(shows = legacy.shows.len(), "migrating legacy shows");

        let records = plan_migration(workspace_id, &legacy, &self.config, Utc::now());
        let report = MigrationReport::new(workspace_id, legacy.shows.len(), &records);

        self.store.write(workspace_id, records).await?;

        tracing::info!(
            productions = report.productions.len(),
            templates = report.templates,
            events = report.events,
            crew_assignments = report.event_crew_assignments,
            resource_assignments = report.event_resource_assignments,
            "legacy shows migrated"
        );

        Ok(report)
    }

    /// True once at least one production exists in the workspace.
    pub async fn is_workspace_migrated(&self, workspace_id: Uuid) -> Result<bool> {
        Ok(self.store.has_productions(workspace_id).await?)
    }

    /// Migrates the workspace unless it already has productions. Returns
    /// `None` when nothing had to be done, including when a concurrent caller
    /// committed the migration first.
    pub async fn auto_migrate_if_needed(
        &self,
        workspace_id: Uuid,
    ) -> Result<Option<MigrationReport>> {
        if self.is_workspace_migrated(workspace_id).await? {
            return Ok(None);
        }

        match self.migrate_workspace(workspace_id).await {
            Ok(report) => Ok(Some(report)),
            Err(MigrationError::AlreadyMigrated(_)) => {
                tracing::warn!(%workspace_id, "workspace migrated by a concurrent caller");

                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
