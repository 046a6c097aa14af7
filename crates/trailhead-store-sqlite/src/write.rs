//! Write policies and the per-park write sequence.
//!
//! Every table is written through one of two explicit policies:
//!
//! - [`upsert_replace`]: insert, or overwrite the non-key columns of the row
//!   with the same key.
//! - [`insert_if_absent`]: insert, or do nothing if the key already exists.
//!
//! The upsert is an `ON CONFLICT DO UPDATE`, not `INSERT OR REPLACE`: the
//! latter deletes the old row first, which the foreign keys of existing links
//! would reject.

use rusqlite::{Connection, ToSql, params};
use trailhead_core::park::NormalizedPark;

/// A table as seen by the write policies. Key columns come first in
/// `columns`.
pub struct Table {
  pub name:    &'static str,
  /// Number of leading key columns. Only [`upsert_replace`] reads it;
  /// [`insert_if_absent`] relies on the table's own unique constraints.
  pub key:     usize,
  pub columns: &'static [&'static str],
}

impl Table {
  fn insert_prefix(&self, verb: &str) -> String {
    let placeholders: Vec<String> =
      (1..=self.columns.len()).map(|i| format!("?{i}")).collect();
    format!(
      "{verb} INTO {} ({}) VALUES ({})",
      self.name,
      self.columns.join(", "),
      placeholders.join(", "),
    )
  }
}

pub const PARTITIONS: Table = Table {
  name:    "partitions",
  key:     1,
  columns: &["code", "name"],
};

pub const ENTITIES: Table = Table {
  name:    "entities",
  key:     1,
  columns: &["code", "name", "designation", "description", "url", "weather_info"],
};

pub const TAGS: Table = Table {
  name:    "tags",
  key:     1,
  columns: &["tag_id", "name"],
};

pub const PARTITION_ENTITIES: Table = Table {
  name:    "partition_entities",
  key:     2,
  columns: &["partition_code", "entity_code"],
};

pub const ENTITY_TAGS: Table = Table {
  name:    "entity_tags",
  key:     2,
  columns: &["entity_code", "tag_id"],
};

/// Insert a row, overwriting the non-key columns if the key exists.
///
/// `table` must have at least one non-key column; a key-only table is
/// written with [`insert_if_absent`].
pub fn upsert_replace(
  conn:   &Connection,
  table:  &Table,
  values: &[&dyn ToSql],
) -> rusqlite::Result<usize> {
  let (key, rest) = table.columns.split_at(table.key);
  let updates: Vec<String> =
    rest.iter().map(|c| format!("{c} = excluded.{c}")).collect();
  let sql = format!(
    "{} ON CONFLICT ({}) DO UPDATE SET {}",
    table.insert_prefix("INSERT"),
    key.join(", "),
    updates.join(", "),
  );
  conn.prepare_cached(&sql)?.execute(values)
}

/// Insert a row unless one with the same key (or any unique column) exists.
pub fn insert_if_absent(
  conn:   &Connection,
  table:  &Table,
  values: &[&dyn ToSql],
) -> rusqlite::Result<usize> {
  let sql = table.insert_prefix("INSERT OR IGNORE");
  conn.prepare_cached(&sql)?.execute(values)
}

/// Write one park and everything it owns or links to.
///
/// The order keeps every foreign key satisfiable: the entity and its tags
/// exist before any link to them is written. Callers run this inside a
/// transaction.
pub fn apply_park(conn: &Connection, record: &NormalizedPark) -> rusqlite::Result<()> {
  let park = &record.park;
  upsert_replace(conn, &ENTITIES, &[
    &park.code,
    &park.name,
    &park.designation,
    &park.description,
    &park.url,
    &park.weather_info,
  ])?;

  for tag in &record.tags {
    insert_if_absent(conn, &TAGS, &[&tag.id, &tag.name])?;
  }

  for partition in &record.partitions {
    insert_if_absent(conn, &PARTITION_ENTITIES, &[partition, &park.code])?;
  }

  for tag in &record.tags {
    insert_if_absent(conn, &ENTITY_TAGS, &[&park.code, &tag.id])?;
  }

  conn.execute("DELETE FROM media_items WHERE entity_code = ?1", params![park.code])?;
  {
    let mut stmt = conn.prepare_cached(
      "INSERT INTO media_items (entity_code, title, caption, url, credit)
       VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for item in &record.media {
      stmt.execute(params![park.code, item.title, item.caption, item.url, item.credit])?;
    }
  }

  conn.execute("DELETE FROM people WHERE entity_code = ?1", params![park.code])?;
  let mut stmt = conn.prepare_cached(
    "INSERT INTO people (entity_code, name, role) VALUES (?1, ?2, ?3)",
  )?;
  for person in &record.people {
    stmt.execute(params![park.code, person.name, person.role])?;
  }

  Ok(())
}
