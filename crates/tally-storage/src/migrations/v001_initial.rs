//! V001: Initial schema.
//! snapshots, rules, project_measures, measure_data.

pub const MIGRATION_SQL: &str = r#"
-- One row per component per analysis run.
CREATE TABLE IF NOT EXISTS snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    analysis_id TEXT NOT NULL,
    component_key TEXT NOT NULL,
    qualifier TEXT NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    UNIQUE(analysis_id, component_key)
) STRICT;

CREATE TABLE IF NOT EXISTS rules (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    repository TEXT NOT NULL,
    rule_key TEXT NOT NULL,
    name TEXT,
    UNIQUE(repository, rule_key)
) STRICT;

-- Measures. Text up to the inline limit lives in text_value; longer text
-- lives in measure_data.
CREATE TABLE IF NOT EXISTS project_measures (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    snapshot_id INTEGER NOT NULL REFERENCES snapshots(id),
    metric_id INTEGER NOT NULL,
    rule_id INTEGER REFERENCES rules(id),
    rule_priority TEXT,
    characteristic_id INTEGER,
    person_id INTEGER,
    value REAL,
    text_value TEXT,
    alert_status TEXT,
    alert_text TEXT,
    description TEXT,
    url TEXT,
    tendency INTEGER,
    variation_value_1 REAL,
    variation_value_2 REAL,
    variation_value_3 REAL,
    variation_value_4 REAL,
    variation_value_5 REAL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    updated_at INTEGER
) STRICT;

CREATE INDEX IF NOT EXISTS idx_project_measures_snapshot
    ON project_measures(snapshot_id);
CREATE INDEX IF NOT EXISTS idx_project_measures_metric
    ON project_measures(metric_id);

-- Spill-over text for measures.
CREATE TABLE IF NOT EXISTS measure_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    measure_id INTEGER NOT NULL REFERENCES project_measures(id) ON DELETE CASCADE,
    snapshot_id INTEGER NOT NULL,
    data TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_measure_data_measure
    ON measure_data(measure_id);
"#;
