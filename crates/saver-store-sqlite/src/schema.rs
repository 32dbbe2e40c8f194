//! SQL schema for the resources store.
//!
//! Executed on every open. `CREATE TABLE IF NOT EXISTS` keeps it idempotent,
//! and the table layout matches databases written by earlier deployments.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS resources (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    url         TEXT NOT NULL UNIQUE,
    type        TEXT NOT NULL,           -- free-form: 'article', 'youtube', ...
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS resources_created_idx ON resources(created_at);
";

pub const SELECT_COLUMNS: &str = "SELECT id, title, url, type, created_at FROM resources";

/// Rewrites `YYYY-MM-DD HH:MM:SS` values (SQLite's `CURRENT_TIMESTAMP` form)
/// into the fixed-width form the store writes, so text order matches time
/// order. Unparseable values are left alone.
pub const NORMALISE_LEGACY_TIMESTAMPS: &str = "
UPDATE resources
   SET created_at = strftime('%Y-%m-%dT%H:%M:%f', created_at) || '000Z'
 WHERE created_at NOT LIKE '%T%'
   AND strftime('%Y-%m-%dT%H:%M:%f', created_at) IS NOT NULL
";
