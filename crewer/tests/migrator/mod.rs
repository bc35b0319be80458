use chrono::{DateTime, TimeZone, Utc};
use crewer::{MigrationError, Migrator};
use crewer_store::{
    LegacyCrewAssignment, LegacyRequiredJob, LegacyShow, LegacyShowResource, LegacySnapshot,
    Store,
};
use futures_util::future::join_all;
use uuid::Uuid;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

pub async fn seed_talk_show(store: &Store, workspace_id: Uuid) -> anyhow::Result<()> {
    store
        .insert_legacy(
            LegacySnapshot::default()
                .show(
                    LegacyShow::new(workspace_id, "Talk Show", at(4, 20), at(4, 21))
                        .recurring_pattern("FREQ=WEEKLY;BYDAY=MO"),
                )
                .show(LegacyShow::new(workspace_id, "Talk Show", at(6, 22), at(6, 23))),
        )
        .await?;

    Ok(())
}

pub struct MorningNews {
    pub shows: Vec<LegacyShow>,
    pub camera_job: Uuid,
    pub studio: Uuid,
}

pub async fn seed_morning_news(store: &Store, workspace_id: Uuid) -> anyhow::Result<MorningNews> {
    let shows = vec![
        LegacyShow::new(workspace_id, "Morning News - Episode 12", at(1, 7), at(1, 8))
            .recurring_pattern("FREQ=DAILY")
            .description("Daily news")
            .color("#ff0000"),
        LegacyShow::new(workspace_id, "Morning News - Episode 13", at(2, 7), at(2, 9))
            .recurring_pattern("FREQ=DAILY"),
        LegacyShow::new(workspace_id, "Morning News (2024-03-03)", at(3, 7), at(3, 8))
            .recurring_pattern("FREQ=DAILY"),
    ];

    let camera_job = Uuid::new_v4();
    let studio = Uuid::new_v4();

    let mut snapshot = LegacySnapshot::default()
        .required_job(LegacyRequiredJob::new(&shows[0], camera_job, 2))
        .required_job(LegacyRequiredJob::new(&shows[1], Uuid::new_v4(), 4))
        .show_resource(LegacyShowResource::new(&shows[0], studio, 1));

    for (i, show) in shows.iter().enumerate() {
        for _ in 0..=i {
            snapshot = snapshot.crew_assignment(
                LegacyCrewAssignment::new(show, Uuid::new_v4(), camera_job).status("confirmed"),
            );
        }

        snapshot = snapshot.show_resource(LegacyShowResource::new(show, Uuid::new_v4(), 1));
    }

    for show in shows.iter() {
        snapshot = snapshot.show(show.clone());
    }

    store.insert_legacy(snapshot).await?;

    Ok(MorningNews {
        shows,
        camera_job,
        studio,
    })
}

pub async fn test_empty_workspace(store: &Store) -> anyhow::Result<()> {
    let workspace_id = Uuid::new_v4();
    let migrator = Migrator::new(store);

    let report = migrator.migrate_workspace(workspace_id).await?;

    assert!(report.is_empty());
    assert_eq!(report.workspace_id, workspace_id);
    assert!(!migrator.is_workspace_migrated(workspace_id).await?);
    assert!(store.read(workspace_id).await?.is_empty());

    migrator.migrate_workspace(workspace_id).await?;

    Ok(())
}

pub async fn test_talk_show(store: &Store) -> anyhow::Result<()> {
    let workspace_id = Uuid::new_v4();
    seed_talk_show(store, workspace_id).await?;

    let report = Migrator::new(store).migrate_workspace(workspace_id).await?;

    assert_eq!(report.shows, 2);
    assert_eq!(report.productions, vec!["Talk Show".to_owned()]);
    assert_eq!(report.templates, 1);
    assert_eq!(report.events, 2);

    let records = store.read(workspace_id).await?;
    let production = records.production("Talk Show").unwrap();
    let templates = records.templates_of(production.id).collect::<Vec<_>>();

    assert_eq!(records.productions.len(), 1);
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].recurring_pattern, "FREQ=WEEKLY;BYDAY=MO");
    assert_eq!(templates[0].duration, 60);

    let events = records.events_of(production.id).collect::<Vec<_>>();
    assert_eq!(events.len(), 2);

    let weekly = events.iter().find(|e| e.start_time == at(4, 20)).unwrap();
    let one_off = events.iter().find(|e| e.start_time == at(6, 22)).unwrap();

    assert_eq!(weekly.template_id, Some(templates[0].id));
    assert_eq!(one_off.template_id, None);

    Ok(())
}

pub async fn test_morning_news(store: &Store) -> anyhow::Result<()> {
    let workspace_id = Uuid::new_v4();
    let seeded = seed_morning_news(store, workspace_id).await?;

    let report = Migrator::new(store).migrate_workspace(workspace_id).await?;

    assert_eq!(report.productions, vec!["Morning News".to_owned()]);
    assert_eq!(report.templates, 1);
    assert_eq!(report.template_required_jobs, 1);
    assert_eq!(report.template_resources, 2);
    assert_eq!(report.events, 3);
    assert_eq!(report.event_crew_assignments, 6);
    assert_eq!(report.event_resource_assignments, 4);

    let records = store.read(workspace_id).await?;
    let production = records.production("Morning News").unwrap();

    assert_eq!(production.description.as_deref(), Some("Daily news"));
    assert_eq!(production.color.as_deref(), Some("#ff0000"));

    let template = &records.templates[0];
    assert_eq!(template.production_id, production.id);
    assert_eq!(template.duration, 60);
    assert_eq!(records.template_required_jobs[0].job_id, seeded.camera_job);
    assert_eq!(records.template_required_jobs[0].quantity, 2);
    assert_eq!(records.template_required_jobs[0].template_id, template.id);
    assert!(records
        .template_resources
        .iter()
        .any(|r| r.resource_id == seeded.studio && r.template_id == template.id));

    for (i, show) in seeded.shows.iter().enumerate() {
        let event = records
            .events
            .iter()
            .find(|e| e.start_time == show.start_time)
            .unwrap();

        assert_eq!(event.title, show.title);
        assert_eq!(event.end_time, show.end_time);
        assert_eq!(event.template_id, Some(template.id));
        assert_eq!(event.production_id, production.id);

        let crew = records.crew_assignments_of(event.id).collect::<Vec<_>>();
        assert_eq!(crew.len(), i + 1);
        assert!(crew
            .iter()
            .all(|a| a.job_id == seeded.camera_job && a.status == "confirmed"));

        let resources = records.resource_assignments_of(event.id).count();
        assert_eq!(resources, if i == 0 { 2 } else { 1 });
    }

    Ok(())
}

pub async fn test_is_workspace_migrated(store: &Store) -> anyhow::Result<()> {
    let workspace_id = Uuid::new_v4();
    let migrator = Migrator::new(store);
    seed_talk_show(store, workspace_id).await?;

    assert!(!migrator.is_workspace_migrated(workspace_id).await?);

    migrator.migrate_workspace(workspace_id).await?;

    assert!(migrator.is_workspace_migrated(workspace_id).await?);

    Ok(())
}

pub async fn test_double_migration(store: &Store) -> anyhow::Result<()> {
    let workspace_id = Uuid::new_v4();
    let migrator = Migrator::new(store);
    seed_morning_news(store, workspace_id).await?;

    migrator.migrate_workspace(workspace_id).await?;

    let err = migrator.migrate_workspace(workspace_id).await.unwrap_err();

    assert!(matches!(err, MigrationError::AlreadyMigrated(id) if id == workspace_id));

    let records = store.read(workspace_id).await?;

    assert_eq!(records.productions.len(), 1);
    assert_eq!(records.templates.len(), 1);
    assert_eq!(records.events.len(), 3);
    assert_eq!(records.event_crew_assignments.len(), 6);

    Ok(())
}

pub async fn test_auto_migrate(store: &Store) -> anyhow::Result<()> {
    let workspace_id = Uuid::new_v4();
    let migrator = Migrator::new(store);
    seed_talk_show(store, workspace_id).await?;

    let report = migrator.auto_migrate_if_needed(workspace_id).await?;

    assert_eq!(report.map(|r| r.events), Some(2));
    assert!(migrator.auto_migrate_if_needed(workspace_id).await?.is_none());
    assert_eq!(store.read(workspace_id).await?.events.len(), 2);

    Ok(())
}

pub async fn test_concurrent_auto_migrate(store: &Store) -> anyhow::Result<()> {
    let workspace_id = Uuid::new_v4();
    let migrator = Migrator::new(store);
    seed_morning_news(store, workspace_id).await?;

    let results = join_all(vec![
        migrator.auto_migrate_if_needed(workspace_id),
        migrator.auto_migrate_if_needed(workspace_id),
        migrator.auto_migrate_if_needed(workspace_id),
    ])
    .await;

    let mut migrated = 0;

    for result in results {
        if result?.is_some() {
            migrated += 1;
        }
    }

    assert_eq!(migrated, 1);

    let records = store.read(workspace_id).await?;

    assert_eq!(records.productions.len(), 1);
    assert_eq!(records.templates.len(), 1);
    assert_eq!(records.events.len(), 3);

    Ok(())
}

pub async fn test_workspace_isolation(store: &Store) -> anyhow::Result<()> {
    let workspace_id = Uuid::new_v4();
    let other_workspace_id = Uuid::new_v4();
    let migrator = Migrator::new(store);

    seed_talk_show(store, workspace_id).await?;
    seed_talk_show(store, other_workspace_id).await?;

    migrator.migrate_workspace(workspace_id).await?;

    assert!(!migrator.is_workspace_migrated(other_workspace_id).await?);
    assert!(store.read(other_workspace_id).await?.is_empty());

    let records = store.read(workspace_id).await?;
    assert_eq!(records.productions.len(), 1);
    assert_eq!(records.events.len(), 2);
    assert!(records.events.iter().all(|e| e.workspace_id == workspace_id));

    migrator.migrate_workspace(other_workspace_id).await?;

    assert_eq!(store.read(other_workspace_id).await?.events.len(), 2);
    assert_eq!(store.read(workspace_id).await?.events.len(), 2);

    Ok(())
}
