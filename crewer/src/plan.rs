use chrono::{DateTime, Utc};
use crewer_store::{
    Event, EventCrewAssignment, EventResourceAssignment, LegacyCrewAssignment, LegacyRequiredJob,
    LegacyShow, LegacyShowResource, LegacySnapshot, Production, Records, ShowTemplate,
    TemplateRequiredJob, TemplateResource,
};
use indexmap::IndexMap;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    config::{MigrationConfig, TitleMatching},
    title::normalize_title,
};

/// Legacy shows inferred to belong to the same production, in fetch order.
#[derive(Debug)]
pub struct ProductionGroup<'a> {
    pub name: String,
    pub shows: Vec<&'a LegacyShow>,
}

pub fn group_by_production(
    shows: &[LegacyShow],
    matching: TitleMatching,
) -> Vec<ProductionGroup<'_>> {
    let mut groups: IndexMap<String, ProductionGroup<'_>> = IndexMap::new();

    for show in shows {
        let name = normalize_title(&show.title);
        let key = match matching {
            TitleMatching::Exact => name.clone(),
            TitleMatching::IgnoreCase => name.to_lowercase(),
        };

        groups
            .entry(key)
            .or_insert_with(|| ProductionGroup {
                name,
                shows: Vec::new(),
            })
            .shows
            .push(show);
    }

    groups.into_values().collect()
}

/// Splits shows by literal recurring pattern. Shows without a pattern land in
/// the `None` partition.
pub fn partition_by_pattern<'a>(
    shows: &[&'a LegacyShow],
) -> IndexMap<Option<&'a str>, Vec<&'a LegacyShow>> {
    let mut partitions: IndexMap<Option<&'a str>, Vec<&'a LegacyShow>> = IndexMap::new();

    for &show in shows {
        partitions.entry(show.pattern()).or_default().push(show);
    }

    partitions
}

/// Whole minutes between start and end. Half minutes round up, also for
/// negative durations.
pub fn duration_minutes(show: &LegacyShow) -> i32 {
    let millis = (show.end_time - show.start_time).num_milliseconds();

    (millis as f64 / 60_000.0 + 0.5).floor() as i32
}

fn index_by_show<T>(rows: &[T], show_id: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<&T>> {
    let mut index: HashMap<Uuid, Vec<&T>> = HashMap::new();

    for row in rows {
        index.entry(show_id(row)).or_default().push(row);
    }

    index
}

struct Planner<'a> {
    workspace_id: Uuid,
    now: DateTime<Utc>,
    required_jobs: HashMap<Uuid, Vec<&'a LegacyRequiredJob>>,
    show_resources: HashMap<Uuid, Vec<&'a LegacyShowResource>>,
    crew_assignments: HashMap<Uuid, Vec<&'a LegacyCrewAssignment>>,
    records: Records,
}

impl<'a> Planner<'a> {
    fn new(workspace_id: Uuid, legacy: &'a LegacySnapshot, now: DateTime<Utc>) -> Self {
        Self {
            workspace_id,
            now,
            required_jobs: index_by_show(&legacy.required_jobs, |job| job.show_id),
            show_resources: index_by_show(&legacy.show_resources, |resource| resource.show_id),
            crew_assignments: index_by_show(&legacy.crew_assignments, |assignment| {
                assignment.show_id
            }),
            records: Records::default(),
        }
    }

    fn production(&mut self, group: &ProductionGroup<'_>) -> Uuid {
        let first = group.shows[0];
        let production = Production {
            id: Uuid::new_v4(),
            workspace_id: self.workspace_id,
            name: group.name.to_owned(),
            description: first.description.clone(),
            color: first.color.clone(),
            created_at: self.now,
        };

        let id = production.id;
        self.records.productions.push(production);

        id
    }

    /// Duration and requirements come from `first` only.
    fn template(
        &mut self,
        production_id: Uuid,
        name: &str,
        first: &LegacyShow,
        pattern: &str,
    ) -> Uuid {
        let template = ShowTemplate {
            id: Uuid::new_v4(),
            workspace_id: self.workspace_id,
            production_id,
            name: name.to_owned(),
            description: first.description.clone(),
            duration: duration_minutes(first),
            recurring_pattern: pattern.to_owned(),
            color: first.color.clone(),
            created_at: self.now,
        };

        let template_id = template.id;
        self.records.templates.push(template);

        for job in self.required_jobs.get(&first.id).into_iter().flatten() {
            self.records.template_required_jobs.push(TemplateRequiredJob {
                id: Uuid::new_v4(),
                workspace_id: self.workspace_id,
                template_id,
                job_id: job.job_id,
                quantity: job.quantity,
                notes: job.notes.clone(),
            });
        }

        for resource in self.show_resources.get(&first.id).into_iter().flatten() {
            self.records.template_resources.push(TemplateResource {
                id: Uuid::new_v4(),
                workspace_id: self.workspace_id,
                template_id,
                resource_id: resource.resource_id,
                quantity: resource.quantity,
            });
        }

        template_id
    }

    fn event(&mut self, production_id: Uuid, template_id: Option<Uuid>, show: &LegacyShow) {
        let event = Event {
            id: Uuid::new_v4(),
            workspace_id: self.workspace_id,
            production_id,
            template_id,
            title: show.title.to_owned(),
            description: show.description.clone(),
            start_time: show.start_time,
            end_time: show.end_time,
            color: show.color.clone(),
            notes: show.notes.clone(),
            status: show.status.to_owned(),
            created_at: self.now,
        };

        let event_id = event.id;
        self.records.events.push(event);

        for assignment in self.crew_assignments.get(&show.id).into_iter().flatten() {
            self.records
                .event_crew_assignments
                .push(EventCrewAssignment {
                    id: Uuid::new_v4(),
                    workspace_id: self.workspace_id,
                    event_id,
                    crew_member_id: assignment.crew_member_id,
                    job_id: assignment.job_id,
                    status: assignment.status.to_owned(),
                });
        }

        for resource in self.show_resources.get(&show.id).into_iter().flatten() {
            self.records
                .event_resource_assignments
                .push(EventResourceAssignment {
                    id: Uuid::new_v4(),
                    workspace_id: self.workspace_id,
                    event_id,
                    resource_id: resource.resource_id,
                    quantity: resource.quantity,
                });
        }
    }
}

/// Builds every production, template, event and assignment row for the
/// legacy rows of one workspace. Nothing is written.
pub fn plan_migration(
    workspace_id: Uuid,
    legacy: &LegacySnapshot,
    config: &MigrationConfig,
    now: DateTime<Utc>,
) -> Records {
    let mut planner = Planner::new(workspace_id, legacy, now);

    for group in group_by_production(&legacy.shows, config.title_matching) {
        let production_id = planner.production(&group);

        let has_pattern = group.shows.iter().any(|show| show.pattern().is_some());
        let recurring = has_pattern && (group.shows.len() > 1 || config.single_show_templates);

        tracing::debug!(
            production = %group.name,
            shows = group.shows.len(),
            recurring,
            "inferred production"
        );

        if !recurring {
            for show in group.shows.iter() {
                planner.event(production_id, None, show);
            }

            continue;
        }

        for (pattern, shows) in partition_by_pattern(&group.shows) {
            let template_id = pattern.map(|pattern| {
                tracing::debug!(
                    production = %group.name,
                    pattern,
                    events = shows.len(),
                    "inferred show template"
                );

                planner.template(production_id, &group.name, shows[0], pattern)
            });

            for show in shows {
                planner.event(production_id, template_id, show);
            }
        }
    }

    planner.records
}
