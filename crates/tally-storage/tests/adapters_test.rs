//! Adapter tests: the core collaborator traits over a real SQLite database.

use std::sync::Arc;

use tally_core::config::StorageConfig;
use tally_core::errors::StorageError;
use tally_core::models::{Component, MeasureId, MeasureRecord, MetricId, SnapshotId};
use tally_core::traits::{MeasureDataLoader, MeasureWriter, RuleFinder, SnapshotResolver};
use tally_storage::queries::{measure_data, measures, rules};
use tally_storage::{
    DatabaseManager, SqliteMeasureDataLoader, SqliteMeasureWriter, SqliteRuleFinder,
    SqliteSnapshotResolver,
};

fn memory_db() -> Arc<DatabaseManager> {
    Arc::new(DatabaseManager::open_in_memory().unwrap())
}

fn registered(db: &Arc<DatabaseManager>, component: &Component) -> SnapshotId {
    SqliteSnapshotResolver::new(Arc::clone(db), "run-1")
        .register(component)
        .unwrap()
}

#[test]
fn resolver_only_sees_its_own_run() {
    let db = memory_db();
    let foo = Component::project("foo");
    let sid = registered(&db, &foo);

    let same_run = SqliteSnapshotResolver::new(Arc::clone(&db), "run-1");
    let other_run = SqliteSnapshotResolver::new(Arc::clone(&db), "run-2");
    assert_eq!(same_run.snapshot_id(&foo).unwrap(), Some(sid));
    assert_eq!(other_run.snapshot_id(&foo).unwrap(), None);
    assert_eq!(same_run.snapshot_id(&Component::file("Bar.java")).unwrap(), None);
}

#[test]
fn rule_finder_resolves_registered_rules() {
    let db = memory_db();
    db.with_writer(|conn| rules::insert_rule(conn, "pmd", "AvoidNull", None))
        .unwrap();

    let finder = SqliteRuleFinder::new(Arc::clone(&db));
    assert!(finder.find_by_key("pmd", "AvoidNull").unwrap().is_some());
    assert!(finder.find_by_key("pmd", "Other").unwrap().is_none());
}

#[test]
fn insert_assigns_measure_and_data_ids() {
    let db = memory_db();
    let sid = registered(&db, &Component::project("foo"));
    let writer = SqliteMeasureWriter::new(Arc::clone(&db));

    let long = "0123456789".repeat(20);
    let mut record = MeasureRecord::new(sid, MetricId(7));
    record.set_text(Some(&long), 96);

    let id = writer.insert(&mut record).unwrap();
    assert_eq!(record.id, Some(id));
    let data_id = record.data_id().unwrap();

    let loader = SqliteMeasureDataLoader::new(Arc::clone(&db));
    assert_eq!(loader.load_data(data_id).unwrap().as_deref(), Some(long.as_str()));

    let stored = db
        .with_reader(|conn| measure_data::get_for_measure(conn, id.get()))
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, data_id);
}

#[test]
fn update_replaces_spill_over_row() {
    let db = memory_db();
    let sid = registered(&db, &Component::project("foo"));
    let writer = SqliteMeasureWriter::new(Arc::clone(&db));

    let mut record = MeasureRecord::new(sid, MetricId(7));
    record.set_text(Some(&"a".repeat(200)), 96);
    writer.insert(&mut record).unwrap();
    let first_data_id = record.data_id().unwrap();

    record.set_text(Some(&"b".repeat(300)), 96);
    writer.update(&mut record).unwrap();
    let second_data_id = record.data_id().unwrap();
    assert_ne!(first_data_id, second_data_id);

    record.set_text(Some("inline now"), 96);
    writer.update(&mut record).unwrap();

    let (data_rows, row) = db
        .with_reader(|conn| {
            let rows = measure_data::count(conn)?;
            let row = measures::get_measure(conn, record.id.map_or(0, MeasureId::get))?;
            Ok((rows, row))
        })
        .unwrap();
    assert_eq!(data_rows, 0);
    assert_eq!(row.unwrap().text_value.as_deref(), Some("inline now"));
}

#[test]
fn update_without_id_is_rejected() {
    let db = memory_db();
    let sid = registered(&db, &Component::project("foo"));
    let writer = SqliteMeasureWriter::new(db);

    let mut record = MeasureRecord::new(sid, MetricId(7));
    assert!(matches!(
        writer.update(&mut record),
        Err(StorageError::NotFound { entity: "measure", .. })
    ));
}

#[test]
fn failed_insert_leaves_record_without_ids() {
    let db = memory_db();
    let writer = SqliteMeasureWriter::new(Arc::clone(&db));

    let mut record = MeasureRecord::new(SnapshotId(999), MetricId(7));
    record.set_text(Some(&"x".repeat(200)), 96);

    assert!(writer.insert(&mut record).is_err());
    assert!(record.id.is_none());
    assert!(record.data_id().is_none());
    let rows = db.with_reader(measures::count).unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn file_backed_database_reads_through_the_pool() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");
    let config = StorageConfig {
        read_pool_size: Some(2),
        ..Default::default()
    };

    let db = Arc::new(DatabaseManager::open_with(&path, &config).unwrap());
    assert_eq!(db.path(), Some(path.as_path()));
    let sid = registered(&db, &Component::project("foo"));

    let writer = SqliteMeasureWriter::new(Arc::clone(&db));
    let mut record = MeasureRecord::new(sid, MetricId(1));
    record.value = Some(1234.0);
    let id = writer.insert(&mut record).unwrap();
    db.checkpoint().unwrap();

    let row = db
        .with_reader(|conn| measures::get_measure(conn, id.get()))
        .unwrap()
        .unwrap();
    assert_eq!(row.value, Some(1234.0));
    drop(db);

    // Reopening runs migrations again without touching existing rows.
    let reopened = DatabaseManager::open(&path).unwrap();
    assert_eq!(reopened.with_reader(measures::count).unwrap(), 1);
}
