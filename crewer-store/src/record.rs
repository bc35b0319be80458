use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct Production {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Recurrence blueprint owned by exactly one production.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct ShowTemplate {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub production_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Minutes.
    pub duration: i32,
    pub recurring_pattern: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct Event {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub production_id: Uuid,
    pub template_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct TemplateRequiredJob {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub template_id: Uuid,
    pub job_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct TemplateResource {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub template_id: Uuid,
    pub resource_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct EventCrewAssignment {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub event_id: Uuid,
    pub crew_member_id: Uuid,
    pub job_id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "pg", derive(sqlx::FromRow))]
pub struct EventResourceAssignment {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub event_id: Uuid,
    pub resource_id: Uuid,
    pub quantity: i32,
}

/// Rows of the three-tier model, in foreign key order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Records {
    pub productions: Vec<Production>,
    pub templates: Vec<ShowTemplate>,
    pub template_required_jobs: Vec<TemplateRequiredJob>,
    pub template_resources: Vec<TemplateResource>,
    pub events: Vec<Event>,
    pub event_crew_assignments: Vec<EventCrewAssignment>,
    pub event_resource_assignments: Vec<EventResourceAssignment>,
}

impl Records {
    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
            && self.templates.is_empty()
            && self.template_required_jobs.is_empty()
            && self.template_resources.is_empty()
            && self.events.is_empty()
            && self.event_crew_assignments.is_empty()
            && self.event_resource_assignments.is_empty()
    }

    pub fn extend(&mut self, other: Records) {
        self.productions.extend(other.productions);
        self.templates.extend(other.templates);
        self.template_required_jobs
            .extend(other.template_required_jobs);
        self.template_resources.extend(other.template_resources);
        self.events.extend(other.events);
        self.event_crew_assignments
            .extend(other.event_crew_assignments);
        self.event_resource_assignments
            .extend(other.event_resource_assignments);
    }

    pub fn production(&self, name: &str) -> Option<&Production> {
        self.productions.iter().find(|p| p.name == name)
    }

    pub fn templates_of(&self, production_id: Uuid) -> impl Iterator<Item = &ShowTemplate> {
        self.templates
            .iter()
            .filter(move |t| t.production_id == production_id)
    }

    pub fn events_of(&self, production_id: Uuid) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| e.production_id == production_id)
    }

    pub fn crew_assignments_of(&self, event_id: Uuid) -> impl Iterator<Item = &EventCrewAssignment> {
        self.event_crew_assignments
            .iter()
            .filter(move |a| a.event_id == event_id)
    }

    pub fn resource_assignments_of(
        &self,
        event_id: Uuid,
    ) -> impl Iterator<Item = &EventResourceAssignment> {
        self.event_resource_assignments
            .iter()
            .filter(move |a| a.event_id == event_id)
    }
}
