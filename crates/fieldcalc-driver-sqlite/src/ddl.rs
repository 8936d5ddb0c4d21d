/// Store tables. Created idempotently on `push_schema`.
pub(crate) const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS table_meta (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS field (
    id TEXT PRIMARY KEY,
    table_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    type TEXT NOT NULL,
    is_lookup INTEGER NOT NULL DEFAULT 0,
    is_primary INTEGER NOT NULL DEFAULT 0,
    options TEXT NOT NULL,
    lookup_options TEXT,
    has_error INTEGER NOT NULL DEFAULT 0,
    version INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS field_table_id ON field (table_id);

CREATE TABLE IF NOT EXISTS reference (
    from_field_id TEXT NOT NULL,
    to_field_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    PRIMARY KEY (from_field_id, to_field_id, kind)
);

CREATE INDEX IF NOT EXISTS reference_to_field_id ON reference (to_field_id);

CREATE TABLE IF NOT EXISTS view (
    id TEXT PRIMARY KEY,
    table_id TEXT NOT NULL,
    name TEXT NOT NULL,
    column_order TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS view_table_id ON view (table_id);

CREATE TABLE IF NOT EXISTS cell (
    table_id TEXT NOT NULL,
    record_id TEXT NOT NULL,
    field_id TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (record_id, field_id)
);

CREATE INDEX IF NOT EXISTS cell_field_id ON cell (field_id);

CREATE TABLE IF NOT EXISTS pending_calculation (
    field_id TEXT PRIMARY KEY,
    table_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS field_op (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    table_id TEXT NOT NULL,
    field_id TEXT NOT NULL,
    op TEXT NOT NULL
);
";

pub(crate) const FIELD_COLUMNS: &str = "id, table_id, name, description, type, is_lookup, \
    is_primary, options, lookup_options, has_error, version";

/// Quotes an identifier that is not known at compile time (junction tables
/// and their key columns).
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `?, ?, ?` for an `IN` list of `n` values.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
