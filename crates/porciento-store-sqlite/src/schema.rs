//! SQL schema for the calculation store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per (x, y) ever requested. Rows are never deleted.
CREATE TABLE IF NOT EXISTS calculations (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    x               INTEGER NOT NULL,
    y               INTEGER NOT NULL,
    count           INTEGER NOT NULL CHECK (count >= 1),
    explanation     TEXT    NOT NULL,   -- fixed at insert
    url             TEXT,               -- NULL until promotion; then permanent
    last_calculated TEXT    NOT NULL,   -- ISO 8601 UTC
    UNIQUE (x, y)
);

-- Derived projection of promoted urls; rebuilt wholesale.
CREATE TABLE IF NOT EXISTS sitemap_urls (
    url TEXT PRIMARY KEY
);

CREATE INDEX IF NOT EXISTS calculations_count_idx ON calculations(count);

PRAGMA user_version = 1;
";
