use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query_builder::Separated, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::{
    engine::{Engine, DEFAULT_CHUNK_SIZE},
    error::{Result, StoreError},
    legacy::{
        LegacyCrewAssignment, LegacyRequiredJob, LegacyShow, LegacyShowResource, LegacySnapshot,
    },
    record::{
        Event, EventCrewAssignment, EventResourceAssignment, Production, Records, ShowTemplate,
        TemplateRequiredJob, TemplateResource,
    },
    store::Store,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    chunk_size: usize,
}

impl PgStore {
    pub fn new(pool: &PgPool) -> Store {
        Store::new(Self {
            pool: pool.clone(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    pub fn with_chunk_size(pool: &PgPool, chunk_size: usize) -> Store {
        Store::new(Self {
            pool: pool.clone(),
            chunk_size: chunk_size.max(1),
        })
    }

    async fn insert_all<R: Row>(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        rows: &[R],
    ) -> Result<()> {
        for rows in rows.chunks(self.chunk_size) {
            let mut query_builder: QueryBuilder<Postgres> =
                QueryBuilder::new(format!("INSERT INTO {} ({}) ", R::TABLE, R::COLUMNS));

            query_builder.push_values(rows, |mut b, row| row.push_binds(&mut b));
            query_builder.build().execute(&mut **tx).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Engine for PgStore {
    async fn read_legacy(&self, workspace_id: Uuid) -> Result<LegacySnapshot> {
        let shows = sqlx::query_as::<_, LegacyShow>(
            r#"
            SELECT * FROM crewer_legacy_show
            WHERE workspace_id = $1
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        if shows.is_empty() {
            return Ok(LegacySnapshot::default());
        }

        let show_ids = shows.iter().map(|show| show.id).collect::<Vec<_>>();

        let required_jobs = sqlx::query_as::<_, LegacyRequiredJob>(
            r#"
            SELECT * FROM crewer_legacy_required_job
            WHERE workspace_id = $1 AND show_id = ANY($2)
            ORDER BY id ASC
            "#,
        )
        .bind(workspace_id)
        .bind(&show_ids)
        .fetch_all(&self.pool)
        .await?;

        let show_resources = sqlx::query_as::<_, LegacyShowResource>(
            r#"
            SELECT * FROM crewer_legacy_show_resource
            WHERE workspace_id = $1 AND show_id = ANY($2)
            ORDER BY id ASC
            "#,
        )
        .bind(workspace_id)
        .bind(&show_ids)
        .fetch_all(&self.pool)
        .await?;

        let crew_assignments = sqlx::query_as::<_, LegacyCrewAssignment>(
            r#"
            SELECT * FROM crewer_legacy_crew_assignment
            WHERE workspace_id = $1 AND show_id = ANY($2)
            ORDER BY id ASC
            "#,
        )
        .bind(workspace_id)
        .bind(&show_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(LegacySnapshot {
            shows,
            required_jobs,
            show_resources,
            crew_assignments,
        })
    }

    async fn insert_legacy(&self, snapshot: LegacySnapshot) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        self.insert_all(&mut tx, &snapshot.shows).await?;
        self.insert_all(&mut tx, &snapshot.required_jobs).await?;
        self.insert_all(&mut tx, &snapshot.show_resources).await?;
        self.insert_all(&mut tx, &snapshot.crew_assignments).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn has_productions(&self, workspace_id: Uuid) -> Result<bool> {
        let (exists,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS (SELECT 1 FROM crewer_production WHERE workspace_id = $1)",
        )
        .bind(workspace_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn write(&self, workspace_id: Uuid, records: Records) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(workspace_id.to_string())
            .execute(&mut *tx)
            .await?;

        let marker = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO crewer_migration_marker (workspace_id, migrated_at)
            VALUES ($1, $2)
            ON CONFLICT (workspace_id) DO NOTHING
            RETURNING workspace_id
            "#,
        )
        .bind(workspace_id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        if marker.is_none() {
            tx.rollback().await?;

            return Err(StoreError::AlreadyMigrated(workspace_id));
        }

        self.insert_all(&mut tx, &records.productions).await?;
        self.insert_all(&mut tx, &records.templates).await?;
        self.insert_all(&mut tx, &records.template_required_jobs)
            .await?;
        self.insert_all(&mut tx, &records.template_resources).await?;
        self.insert_all(&mut tx, &records.events).await?;
        self.insert_all(&mut tx, &records.event_crew_assignments)
            .await?;
        self.insert_all(&mut tx, &records.event_resource_assignments)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn read(&self, workspace_id: Uuid) -> Result<Records> {
        let productions = sqlx::query_as::<_, Production>(
            "SELECT * FROM crewer_production WHERE workspace_id = $1 ORDER BY name ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        let templates = sqlx::query_as::<_, ShowTemplate>(
            "SELECT * FROM crewer_show_template WHERE workspace_id = $1 ORDER BY name ASC, recurring_pattern ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        let template_required_jobs = sqlx::query_as::<_, TemplateRequiredJob>(
            "SELECT * FROM crewer_template_required_job WHERE workspace_id = $1 ORDER BY id ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        let template_resources = sqlx::query_as::<_, TemplateResource>(
            "SELECT * FROM crewer_template_resource WHERE workspace_id = $1 ORDER BY id ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM crewer_event WHERE workspace_id = $1 ORDER BY start_time ASC, id ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        let event_crew_assignments = sqlx::query_as::<_, EventCrewAssignment>(
            "SELECT * FROM crewer_event_crew_assignment WHERE workspace_id = $1 ORDER BY id ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        let event_resource_assignments = sqlx::query_as::<_, EventResourceAssignment>(
            "SELECT * FROM crewer_event_resource_assignment WHERE workspace_id = $1 ORDER BY id ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Records {
            productions,
            templates,
            template_required_jobs,
            template_resources,
            events,
            event_crew_assignments,
            event_resource_assignments,
        })
    }
}

/// A row that can be appended to a multi-row `INSERT ... VALUES` statement.
trait Row: Sync {
    const TABLE: &'static str;
    const COLUMNS: &'static str;

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>);
}

impl Row for LegacyShow {
    const TABLE: &'static str = "crewer_legacy_show";
    const COLUMNS: &'static str = "id, workspace_id, title, description, start_time, end_time, recurring_pattern, color, notes, status, created_at";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.title.to_owned())
            .push_bind(self.description.clone())
            .push_bind(self.start_time)
            .push_bind(self.end_time)
            .push_bind(self.recurring_pattern.clone())
            .push_bind(self.color.clone())
            .push_bind(self.notes.clone())
            .push_bind(self.status.to_owned())
            .push_bind(self.created_at);
    }
}

impl Row for LegacyRequiredJob {
    const TABLE: &'static str = "crewer_legacy_required_job";
    const COLUMNS: &'static str = "id, workspace_id, show_id, job_id, quantity, notes";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.show_id)
            .push_bind(self.job_id)
            .push_bind(self.quantity)
            .push_bind(self.notes.clone());
    }
}

impl Row for LegacyShowResource {
    const TABLE: &'static str = "crewer_legacy_show_resource";
    const COLUMNS: &'static str = "id, workspace_id, show_id, resource_id, quantity";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.show_id)
            .push_bind(self.resource_id)
            .push_bind(self.quantity);
    }
}

impl Row for LegacyCrewAssignment {
    const TABLE: &'static str = "crewer_legacy_crew_assignment";
    const COLUMNS: &'static str = "id, workspace_id, show_id, crew_member_id, job_id, status";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.show_id)
            .push_bind(self.crew_member_id)
            .push_bind(self.job_id)
            .push_bind(self.status.to_owned());
    }
}

impl Row for Production {
    const TABLE: &'static str = "crewer_production";
    const COLUMNS: &'static str = "id, workspace_id, name, description, color, created_at";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.name.to_owned())
            .push_bind(self.description.clone())
            .push_bind(self.color.clone())
            .push_bind(self.created_at);
    }
}

impl Row for ShowTemplate {
    const TABLE: &'static str = "crewer_show_template";
    const COLUMNS: &'static str = "id, workspace_id, production_id, name, description, duration, recurring_pattern, color, created_at";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.production_id)
            .push_bind(self.name.to_owned())
            .push_bind(self.description.clone())
            .push_bind(self.duration)
            .push_bind(self.recurring_pattern.to_owned())
            .push_bind(self.color.clone())
            .push_bind(self.created_at);
    }
}

impl Row for TemplateRequiredJob {
    const TABLE: &'static str = "crewer_template_required_job";
    const COLUMNS: &'static str = "id, workspace_id, template_id, job_id, quantity, notes";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.template_id)
            .push_bind(self.job_id)
            .push_bind(self.quantity)
            .push_bind(self.notes.clone());
    }
}

impl Row for TemplateResource {
    const TABLE: &'static str = "crewer_template_resource";
    const COLUMNS: &'static str = "id, workspace_id, template_id, resource_id, quantity";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.template_id)
            .push_bind(self.resource_id)
            .push_bind(self.quantity);
    }
}

impl Row for Event {
    const TABLE: &'static str = "crewer_event";
    const COLUMNS: &'static str = "id, workspace_id, production_id, template_id, title, description, start_time, end_time, color, notes, status, created_at";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.production_id)
            .push_bind(self.template_id)
            .push_bind(self.title.to_owned())
            .push_bind(self.description.clone())
            .push_bind(self.start_time)
            .push_bind(self.end_time)
            .push_bind(self.color.clone())
            .push_bind(self.notes.clone())
            .push_bind(self.status.to_owned())
            .push_bind(self.created_at);
    }
}

impl Row for EventCrewAssignment {
    const TABLE: &'static str = "crewer_event_crew_assignment";
    const COLUMNS: &'static str = "id, workspace_id, event_id, crew_member_id, job_id, status";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.event_id)
            .push_bind(self.crew_member_id)
            .push_bind(self.job_id)
            .push_bind(self.status.to_owned());
    }
}

impl Row for EventResourceAssignment {
    const TABLE: &'static str = "crewer_event_resource_assignment";
    const COLUMNS: &'static str = "id, workspace_id, event_id, resource_id, quantity";

    fn push_binds(&self, b: &mut Separated<'_, '_, Postgres, &'static str>) {
        b.push_bind(self.id)
            .push_bind(self.workspace_id)
            .push_bind(self.event_id)
            .push_bind(self.resource_id)
            .push_bind(self.quantity);
    }
}
