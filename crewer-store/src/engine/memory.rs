use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use uuid::Uuid;

use crate::{
    engine::Engine,
    error::{Result, StoreError},
    legacy::LegacySnapshot,
    record::Records,
    store::Store,
};

#[derive(Debug, Default)]
struct Tables {
    legacy: LegacySnapshot,
    records: Records,
    markers: HashMap<Uuid, DateTime<Utc>>,
}

impl Tables {
    fn check_references(&self, records: &Records) -> Result<()> {
        let productions = self
            .records
            .productions
            .iter()
            .chain(records.productions.iter())
            .map(|p| p.id)
            .collect::<HashSet<_>>();

        let templates = self
            .records
            .templates
            .iter()
            .chain(records.templates.iter())
            .map(|t| t.id)
            .collect::<HashSet<_>>();

        let events = self
            .records
            .events
            .iter()
            .chain(records.events.iter())
            .map(|e| e.id)
            .collect::<HashSet<_>>();

        let missing = |table: &'static str, id: Uuid| StoreError::MissingReference { table, id };

        for template in records.templates.iter() {
            if !productions.contains(&template.production_id) {
                return Err(missing("show_template", template.id));
            }
        }

        for job in records.template_required_jobs.iter() {
            if !templates.contains(&job.template_id) {
                return Err(missing("template_required_job", job.id));
            }
        }

        for resource in records.template_resources.iter() {
            if !templates.contains(&resource.template_id) {
                return Err(missing("template_resource", resource.id));
            }
        }

        for event in records.events.iter() {
            let template_missing = event
                .template_id
                .is_some_and(|template_id| !templates.contains(&template_id));

            if !productions.contains(&event.production_id) || template_missing {
                return Err(missing("event", event.id));
            }
        }

        for assignment in records.event_crew_assignments.iter() {
            if !events.contains(&assignment.event_id) {
                return Err(missing("event_crew_assignment", assignment.id));
            }
        }

        for assignment in records.event_resource_assignments.iter() {
            if !events.contains(&assignment.event_id) {
                return Err(missing("event_resource_assignment", assignment.id));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore(Arc<RwLock<Tables>>);

impl MemoryStore {
    pub fn new() -> Store {
        Store::new(Self::default())
    }
}

#[async_trait]
impl Engine for MemoryStore {
    async fn read_legacy(&self, workspace_id: Uuid) -> Result<LegacySnapshot> {
        let data = self.0.read();

        let mut shows = data
            .legacy
            .shows
            .iter()
            .filter(|show| show.workspace_id == workspace_id)
            .cloned()
            .collect::<Vec<_>>();

        shows.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));

        let show_ids = shows.iter().map(|show| show.id).collect::<HashSet<_>>();
        let owned = |row_workspace_id: Uuid, show_id: Uuid| {
            row_workspace_id == workspace_id && show_ids.contains(&show_id)
        };

        Ok(LegacySnapshot {
            required_jobs: data
                .legacy
                .required_jobs
                .iter()
                .filter(|job| owned(job.workspace_id, job.show_id))
                .cloned()
                .collect(),
            show_resources: data
                .legacy
                .show_resources
                .iter()
                .filter(|resource| owned(resource.workspace_id, resource.show_id))
                .cloned()
                .collect(),
            crew_assignments: data
                .legacy
                .crew_assignments
                .iter()
                .filter(|assignment| owned(assignment.workspace_id, assignment.show_id))
                .cloned()
                .collect(),
            shows,
        })
    }

    async fn insert_legacy(&self, snapshot: LegacySnapshot) -> Result<()> {
        let mut data = self.0.write();

        data.legacy.shows.extend(snapshot.shows);
        data.legacy.required_jobs.extend(snapshot.required_jobs);
        data.legacy.show_resources.extend(snapshot.show_resources);
        data.legacy
            .crew_assignments
            .extend(snapshot.crew_assignments);

        Ok(())
    }

    async fn has_productions(&self, workspace_id: Uuid) -> Result<bool> {
        Ok(self
            .0
            .read()
            .records
            .productions
            .iter()
            .any(|p| p.workspace_id == workspace_id))
    }

    async fn write(&self, workspace_id: Uuid, records: Records) -> Result<()> {
        let mut data = self.0.write();

        if data.markers.contains_key(&workspace_id) {
            return Err(StoreError::AlreadyMigrated(workspace_id));
        }

        data.check_references(&records)?;
        data.markers.insert(workspace_id, Utc::now());
        data.records.extend(records);

        Ok(())
    }

    async fn read(&self, workspace_id: Uuid) -> Result<Records> {
        let data = self.0.read();
        let records = &data.records;

        Ok(Records {
            productions: records
                .productions
                .iter()
                .filter(|r| r.workspace_id == workspace_id)
                .cloned()
                .collect(),
            templates: records
                .templates
                .iter()
                .filter(|r| r.workspace_id == workspace_id)
                .cloned()
                .collect(),
            template_required_jobs: records
                .template_required_jobs
                .iter()
                .filter(|r| r.workspace_id == workspace_id)
                .cloned()
                .collect(),
            template_resources: records
                .template_resources
                .iter()
                .filter(|r| r.workspace_id == workspace_id)
                .cloned()
                .collect(),
            events: records
                .events
                .iter()
                .filter(|r| r.workspace_id == workspace_id)
                .cloned()
                .collect(),
            event_crew_assignments: records
                .event_crew_assignments
                .iter()
                .filter(|r| r.workspace_id == workspace_id)
                .cloned()
                .collect(),
            event_resource_assignments: records
                .event_resource_assignments
                .iter()
                .filter(|r| r.workspace_id == workspace_id)
                .cloned()
                .collect(),
        })
    }
}
