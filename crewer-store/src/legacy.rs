use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flat pre-migration broadcast slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct LegacyShow {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub recurring_pattern: Option<String>,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl LegacyShow {
    pub fn new(
        workspace_id: Uuid,
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            workspace_id,
            title: title.into(),
            description: None,
            start_time,
            end_time,
            recurring_pattern: None,
            color: None,
            notes: None,
            status: "scheduled".to_owned(),
            created_at: Utc::now(),
        }
    }

    pub fn recurring_pattern(mut self, value: impl Into<String>) -> Self {
        self.recurring_pattern = Some(value.into());

        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());

        self
    }

    pub fn color(mut self, value: impl Into<String>) -> Self {
        self.color = Some(value.into());

        self
    }

    pub fn notes(mut self, value: impl Into<String>) -> Self {
        self.notes = Some(value.into());

        self
    }

    pub fn status(mut self, value: impl Into<String>) -> Self {
        self.status = value.into();

        self
    }

    /// Empty patterns count as absent.
    pub fn pattern(&self) -> Option<&str> {
        self.recurring_pattern
            .as_deref()
            .filter(|pattern| !pattern.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct LegacyRequiredJob {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub show_id: Uuid,
    pub job_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
}

impl LegacyRequiredJob {
    pub fn new(show: &LegacyShow, job_id: Uuid, quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            workspace_id: show.workspace_id,
            show_id: show.id,
            job_id,
            quantity,
            notes: None,
        }
    }

    pub fn notes(mut self, value: impl Into<String>) -> Self {
        self.notes = Some(value.into());

        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct LegacyShowResource {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub show_id: Uuid,
    pub resource_id: Uuid,
    pub quantity: i32,
}

impl LegacyShowResource {
    pub fn new(show: &LegacyShow, resource_id: Uuid, quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            workspace_id: show.workspace_id,
            show_id: show.id,
            resource_id,
            quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct LegacyCrewAssignment {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub show_id: Uuid,
    pub crew_member_id: Uuid,
    pub job_id: Uuid,
    pub status: String,
}

impl LegacyCrewAssignment {
    pub fn new(show: &LegacyShow, crew_member_id: Uuid, job_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            workspace_id: show.workspace_id,
            show_id: show.id,
            crew_member_id,
            job_id,
            status: "pending".to_owned(),
        }
    }

    pub fn status(mut self, value: impl Into<String>) -> Self {
        self.status = value.into();

        self
    }
}

/// Every legacy row of one workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LegacySnapshot {
    pub shows: Vec<LegacyShow>,
    pub required_jobs: Vec<LegacyRequiredJob>,
    pub show_resources: Vec<LegacyShowResource>,
    pub crew_assignments: Vec<LegacyCrewAssignment>,
}

impl LegacySnapshot {
    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
            && self.required_jobs.is_empty()
            && self.show_resources.is_empty()
            && self.crew_assignments.is_empty()
    }

    pub fn show(mut self, show: LegacyShow) -> Self {
        self.shows.push(show);

        self
    }

    pub fn required_job(mut self, job: LegacyRequiredJob) -> Self {
        self.required_jobs.push(job);

        self
    }

    pub fn show_resource(mut self, resource: LegacyShowResource) -> Self {
        self.show_resources.push(resource);

        self
    }

    pub fn crew_assignment(mut self, assignment: LegacyCrewAssignment) -> Self {
        self.crew_assignments.push(assignment);

        self
    }
}
