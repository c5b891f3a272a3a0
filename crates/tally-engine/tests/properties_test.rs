//! Property tests for admission and delayed-mode coalescing.

mod common;

use std::collections::HashMap;

use common::*;
use proptest::prelude::*;
use tally_core::models::{
    Component, Measure, MeasureHandle, Metric, PersistenceMode, Qualifier, ValueType,
};
use tally_engine::{should_persist, PendingKey, WriteBuffer};

fn qualifier() -> impl Strategy<Value = Qualifier> {
    prop_oneof![
        Just(Qualifier::Project),
        Just(Qualifier::Module),
        Just(Qualifier::Directory),
        Just(Qualifier::Package),
        Just(Qualifier::File),
        Just(Qualifier::Class),
        Just(Qualifier::UnitTestFile),
        Just(Qualifier::Library),
    ]
}

fn mode() -> impl Strategy<Value = PersistenceMode> {
    prop_oneof![
        Just(PersistenceMode::Memory),
        Just(PersistenceMode::Database),
        Just(PersistenceMode::Persistent),
    ]
}

fn any_measure() -> impl Strategy<Value = Measure> {
    (
        mode(),
        prop::option::of(-10.0f64..10.0),
        prop::option::of("[a-z]{0,8}"),
        prop::option::of(-5.0f64..5.0),
        any::<bool>(),
    )
        .prop_map(|(mode, value, data, variation1, optimized)| {
            let mut metric = Metric::new(2, "coverage", ValueType::Percent);
            if optimized {
                metric = metric.with_optimized_best_value(0.0);
            }
            let mut measure = Measure::new(metric).with_persistence_mode(mode);
            measure.value = value;
            measure.data = data;
            measure.variations[0] = variation1;
            measure
        })
}

proptest! {
    #[test]
    fn memory_measures_are_never_admitted(q in qualifier(), mut m in any_measure()) {
        m.persistence_mode = PersistenceMode::Memory;
        prop_assert!(!should_persist(&Component::new("c", q), &m));
    }

    #[test]
    fn everything_else_is_admitted_above_file_level(q in qualifier(), m in any_measure()) {
        prop_assume!(!q.is_file_level());
        prop_assume!(m.persistence_mode != PersistenceMode::Memory);
        prop_assert!(should_persist(&Component::new("c", q), &m));
    }

    #[test]
    fn best_value_on_files_is_dropped(
        q in qualifier(),
        variation1 in prop::option::of(0.0f64..5.0),
    ) {
        prop_assume!(q.is_file_level());
        let mut m = Measure::new(coverage()).with_value(100.0);
        m.variations[0] = variation1;
        prop_assert!(!should_persist(&Component::new("c", q), &m));

        m.value = None;
        prop_assert!(!should_persist(&Component::new("c", q), &m));
    }

    #[test]
    fn buffer_keeps_one_entry_per_key_with_last_value(
        submissions in prop::collection::vec((0usize..3, 0i64..3, -100.0f64..100.0), 1..40),
    ) {
        let mut buffer = WriteBuffer::new();
        let mut expected: HashMap<PendingKey, f64> = HashMap::new();

        for (component, metric, value) in submissions {
            let component = Component::project(format!("c{component}"));
            let measure = Measure::new(Metric::new(metric, format!("m{metric}"), ValueType::Float))
                .with_value(value);
            expected.insert(PendingKey::of(&component, &measure), value);
            buffer.submit(component, MeasureHandle::new(measure));
        }

        prop_assert_eq!(buffer.len(), expected.len());
        for entry in buffer.take() {
            let measure = entry.measure.borrow();
            let key = PendingKey::of(&entry.component, &measure);
            prop_assert_eq!(measure.value, expected.get(&key).copied());
        }
    }

    #[test]
    fn delayed_writes_wait_for_dump_then_land_once(
        submissions in prop::collection::vec((0usize..2, -100.0f64..100.0), 1..20),
    ) {
        let snapshots = FakeSnapshots::with(&[("c0", 1), ("c1", 2)]);
        let rules = FakeRules::default();
        let writer = FakeWriter::default();
        let mut persister = persister(&snapshots, &rules, &writer, delayed());

        let mut last = HashMap::new();
        for (component, value) in submissions {
            let key = format!("c{component}");
            let measure = MeasureHandle::new(Measure::new(ncloc()).with_value(value));
            persister.save_measure(&Component::project(key.clone()), &measure).unwrap();
            last.insert(key, value);
        }
        prop_assert_eq!(writer.writes(), 0);

        let report = persister.dump().unwrap();
        prop_assert_eq!(report.flushed, last.len());
        prop_assert_eq!(writer.row_count(), last.len());
        prop_assert_eq!(persister.optimizer().evictions.len(), last.len());
        for row in writer.rows.borrow().iter() {
            let key = format!("c{}", row.snapshot_id.get() - 1);
            prop_assert_eq!(row.value, last.get(&key).copied());
        }
    }
}
