//! SQL schema for the trailhead SQLite store.
//!
//! Executed at connection startup. `PRAGMA user_version` records the schema
//! revision; nothing here ever drops or alters an existing table.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Reference data, seeded once.
CREATE TABLE IF NOT EXISTS partitions (
    code  TEXT PRIMARY KEY,
    name  TEXT NOT NULL
);

-- Scalar fields are replaced on every sync (last write wins).
CREATE TABLE IF NOT EXISTS entities (
    code          TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    designation   TEXT NOT NULL DEFAULT '',
    description   TEXT NOT NULL DEFAULT '',
    url           TEXT NOT NULL DEFAULT '',
    weather_info  TEXT NOT NULL DEFAULT ''
);

-- Links are only ever inserted, never updated or deleted.
CREATE TABLE IF NOT EXISTS partition_entities (
    partition_code  TEXT NOT NULL REFERENCES partitions(code),
    entity_code     TEXT NOT NULL REFERENCES entities(code),
    PRIMARY KEY (partition_code, entity_code)
);

-- tag_id is assigned by the sync run, not by SQLite.
CREATE TABLE IF NOT EXISTS tags (
    tag_id  INTEGER PRIMARY KEY,
    name    TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS entity_tags (
    entity_code  TEXT NOT NULL REFERENCES entities(code),
    tag_id       INTEGER NOT NULL REFERENCES tags(tag_id),
    PRIMARY KEY (entity_code, tag_id)
);

-- Owned rows; replaced as a set per entity.
CREATE TABLE IF NOT EXISTS media_items (
    media_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    entity_code  TEXT NOT NULL REFERENCES entities(code),
    title        TEXT NOT NULL DEFAULT '',
    caption      TEXT NOT NULL DEFAULT '',
    url          TEXT NOT NULL,
    credit       TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS people (
    person_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    entity_code  TEXT NOT NULL REFERENCES entities(code),
    name         TEXT NOT NULL,
    role         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS partition_entities_entity_idx ON partition_entities(entity_code);
CREATE INDEX IF NOT EXISTS entity_tags_tag_idx           ON entity_tags(tag_id);
CREATE INDEX IF NOT EXISTS entities_designation_idx      ON entities(designation);
CREATE INDEX IF NOT EXISTS media_items_entity_idx        ON media_items(entity_code);
CREATE INDEX IF NOT EXISTS people_entity_idx             ON people(entity_code);

PRAGMA user_version = 1;
";
