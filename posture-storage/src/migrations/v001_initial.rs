//! V001: initial schema.
//! controls, the four-level organization tables, baseline_entries,
//! assessments.

pub const MIGRATION_SQL: &str = r#"
-- Control reference data: Function -> Category -> Subcategory.
-- Loaded once from the framework dataset, read-only afterwards.
CREATE TABLE IF NOT EXISTS controls (
    control_id INTEGER PRIMARY KEY,
    subcategory_code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    function_code TEXT NOT NULL,
    function_name TEXT NOT NULL,
    function_order INTEGER NOT NULL,
    category_code TEXT NOT NULL,
    category_name TEXT NOT NULL,
    default_risk TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_controls_function
    ON controls(function_code);

-- Organization containment: capability centre -> framework -> product
-- -> system. Deleting a node deletes everything beneath it.
CREATE TABLE IF NOT EXISTS capability_centres (
    capability_centre_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS frameworks (
    framework_id INTEGER PRIMARY KEY AUTOINCREMENT,
    capability_centre_id INTEGER NOT NULL
        REFERENCES capability_centres(capability_centre_id) ON DELETE CASCADE,
    name TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_frameworks_centre
    ON frameworks(capability_centre_id);

CREATE TABLE IF NOT EXISTS products (
    product_id INTEGER PRIMARY KEY AUTOINCREMENT,
    framework_id INTEGER NOT NULL
        REFERENCES frameworks(framework_id) ON DELETE CASCADE,
    name TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_products_framework
    ON products(framework_id);

CREATE TABLE IF NOT EXISTS systems (
    system_id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL
        REFERENCES products(product_id) ON DELETE CASCADE,
    name TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_systems_product
    ON systems(product_id);

-- Baseline: which controls apply to a product. One row per pair.
CREATE TABLE IF NOT EXISTS baseline_entries (
    product_id INTEGER NOT NULL
        REFERENCES products(product_id) ON DELETE CASCADE,
    control_id INTEGER NOT NULL
        REFERENCES controls(control_id),
    applicable INTEGER NOT NULL DEFAULT 1,
    priority INTEGER,
    PRIMARY KEY (product_id, control_id)
) STRICT;

-- Assessments: one row per (system, control) pair at most. Absence of
-- a row reads as Not Assessed.
CREATE TABLE IF NOT EXISTS assessments (
    assessment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    system_id INTEGER NOT NULL
        REFERENCES systems(system_id) ON DELETE CASCADE,
    control_id INTEGER NOT NULL
        REFERENCES controls(control_id),
    status TEXT NOT NULL,
    risk_level TEXT,
    notes TEXT,
    evidence TEXT,
    remediation_plan TEXT,
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    updated_at INTEGER NOT NULL DEFAULT (unixepoch()),
    UNIQUE (system_id, control_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_assessments_system
    ON assessments(system_id);
CREATE INDEX IF NOT EXISTS idx_assessments_control
    ON assessments(control_id);
"#;
