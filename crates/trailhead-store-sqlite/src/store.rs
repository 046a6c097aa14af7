//! [`SqliteStore`] — the SQLite implementation of [`ParkStore`].

use std::{collections::BTreeMap, path::Path};

use rusqlite::OptionalExtension as _;
use trailhead_core::{
  park::{MediaItem, NormalizedPark, Park, ParkDetail, Person, TableCounts},
  partition::Partition,
  store::ParkStore,
  tags::TagIndex,
};

use crate::{
  Error, Result,
  schema::SCHEMA,
  write::{self, PARTITIONS, insert_if_absent},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A park catalog backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

fn park_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Park> {
  Ok(Park {
    code:         row.get(0)?,
    name:         row.get(1)?,
    designation:  row.get(2)?,
    description:  row.get(3)?,
    url:          row.get(4)?,
    weather_info: row.get(5)?,
  })
}

const PARK_COLUMNS: &str =
  "e.code, e.name, e.designation, e.description, e.url, e.weather_info";

impl SqliteStore {
  /// Open (or create) a store at `path` and ensure the schema exists.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Create every table and index that does not exist yet. Safe to call
  /// repeatedly.
  pub async fn ensure_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Read contract ─────────────────────────────────────────────────────────

  /// A park with its tags, partitions, media and people. `None` if the code
  /// is unknown.
  pub async fn get_park(&self, code: &str) -> Result<Option<ParkDetail>> {
    let code = code.to_owned();

    let detail = self
      .conn
      .call(move |conn| {
        let park = conn
          .query_row(
            &format!("SELECT {PARK_COLUMNS} FROM entities e WHERE e.code = ?1"),
            rusqlite::params![code],
            park_from_row,
          )
          .optional()?;
        let Some(park) = park else {
          return Ok(None);
        };

        let tags = conn
          .prepare(
            "SELECT t.name FROM tags t
             JOIN entity_tags et ON et.tag_id = t.tag_id
             WHERE et.entity_code = ?1
             ORDER BY t.name",
          )?
          .query_map(rusqlite::params![code], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;

        let partitions = conn
          .prepare(
            "SELECT partition_code FROM partition_entities
             WHERE entity_code = ?1
             ORDER BY partition_code",
          )?
          .query_map(rusqlite::params![code], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;

        let media = conn
          .prepare(
            "SELECT title, caption, url, credit FROM media_items
             WHERE entity_code = ?1
             ORDER BY media_id",
          )?
          .query_map(rusqlite::params![code], |row| {
            Ok(MediaItem {
              title:   row.get(0)?,
              caption: row.get(1)?,
              url:     row.get(2)?,
              credit:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let people = conn
          .prepare(
            "SELECT name, role FROM people
             WHERE entity_code = ?1
             ORDER BY person_id",
          )?
          .query_map(rusqlite::params![code], |row| {
            Ok(Person { name: row.get(0)?, role: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(ParkDetail { park, tags, partitions, media, people }))
      })
      .await?;

    Ok(detail)
  }

  /// Parks linked to `partition`, optionally restricted to one designation,
  /// ordered by name.
  pub async fn parks_in_partition(
    &self,
    partition:   &str,
    designation: Option<&str>,
  ) -> Result<Vec<Park>> {
    let partition   = partition.to_ascii_uppercase();
    let designation = designation.map(str::to_owned);

    let parks = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PARK_COLUMNS} FROM entities e
           JOIN partition_entities pe ON pe.entity_code = e.code
           WHERE pe.partition_code = ?1
             AND (?2 IS NULL OR e.designation = ?2)
           ORDER BY e.name, e.code"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![partition, designation], park_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(parks)
  }

  /// Every partition that has at least one park, mapped to its parks
  /// ordered by name. Optionally restricted to one designation.
  pub async fn parks_by_partition(
    &self,
    designation: Option<&str>,
  ) -> Result<BTreeMap<String, Vec<Park>>> {
    let designation = designation.map(str::to_owned);

    let grouped = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT pe.partition_code, {PARK_COLUMNS} FROM entities e
           JOIN partition_entities pe ON pe.entity_code = e.code
           WHERE ?1 IS NULL OR e.designation = ?1
           ORDER BY pe.partition_code, e.name, e.code"
        ))?;
        let mut rows = stmt.query(rusqlite::params![designation])?;

        let mut grouped: BTreeMap<String, Vec<Park>> = BTreeMap::new();
        while let Some(row) = rows.next()? {
          let partition: String = row.get(0)?;
          let park = Park {
            code:         row.get(1)?,
            name:         row.get(2)?,
            designation:  row.get(3)?,
            description:  row.get(4)?,
            url:          row.get(5)?,
            weather_info: row.get(6)?,
          };
          grouped.entry(partition).or_default().push(park);
        }
        Ok(grouped)
      })
      .await?;

    Ok(grouped)
  }

  /// Every non-empty designation in the store, sorted.
  pub async fn designations(&self) -> Result<Vec<String>> {
    let designations = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT designation FROM entities
           WHERE designation <> ''
           ORDER BY designation",
        )?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(designations)
  }

  /// Row counts of every table.
  pub async fn table_counts(&self) -> Result<TableCounts> {
    let counts = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<u64> {
          conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get::<_, i64>(0)
          })
          .map(|n| n as u64)
        };
        Ok(TableCounts {
          partitions:         count("partitions")?,
          entities:           count("entities")?,
          partition_entities: count("partition_entities")?,
          tags:               count("tags")?,
          entity_tags:        count("entity_tags")?,
          media_items:        count("media_items")?,
          people:             count("people")?,
        })
      })
      .await?;

    Ok(counts)
  }

  /// Number of rows that reference a missing parent row. Zero on a healthy
  /// store.
  pub async fn foreign_key_violations(&self) -> Result<u64> {
    let violations = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
        let mut rows = stmt.query([])?;
        let mut n = 0u64;
        while rows.next()?.is_some() {
          n += 1;
        }
        Ok(n)
      })
      .await?;

    Ok(violations)
  }
}

// ─── ParkStore impl ──────────────────────────────────────────────────────────

impl ParkStore for SqliteStore {
  type Error = Error;

  async fn seed_partitions(&self, partitions: &[Partition]) -> Result<()> {
    let partitions = partitions.to_vec();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for p in &partitions {
          insert_if_absent(&tx, &PARTITIONS, &[&p.code, &p.name])?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn load_tag_index(&self) -> Result<TagIndex> {
    let tags: Vec<(i64, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT tag_id, name FROM tags")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(TagIndex::from_existing(tags))
  }

  async fn apply_park(&self, park: NormalizedPark) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        write::apply_park(&tx, &park)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
