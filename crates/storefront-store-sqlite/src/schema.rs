//! SQL schema for the storefront SQLite store.
//!
//! Executed once at connection startup. Every statement is idempotent, so
//! reopening an existing database is a no-op.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Raw interaction log. Append-only: no UPDATE or DELETE is ever issued.
CREATE TABLE IF NOT EXISTS events (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id  TEXT,                       -- NULL for anonymous sessions
    event    TEXT NOT NULL,              -- 'add_to_cart' | 'checkout' | ...
    item_id  TEXT,
    price    REAL NOT NULL DEFAULT 0,
    note     TEXT NOT NULL DEFAULT '',
    ts       TEXT NOT NULL               -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS contacts (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    TEXT,
    name       TEXT NOT NULL DEFAULT '',
    email      TEXT NOT NULL,
    phone      TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reviews (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL DEFAULT '',
    rating        INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    comment       TEXT NOT NULL DEFAULT '',
    favorite_item TEXT,
    ts            TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS events_kind_item_idx ON events(event, item_id);

PRAGMA user_version = 1;
";
