//! [`SqliteStore`]: the SQLite implementation of [`ResourceStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, ffi};

use saver_core::{
  resource::{ImportResource, NewResource, Resource},
  store::ResourceStore,
};

use crate::{
  encode::{RawResource, encode_dt},
  schema::{NORMALISE_LEGACY_TIMESTAMPS, SCHEMA, SELECT_COLUMNS},
  Error, Result,
};

// ─── Write outcomes ──────────────────────────────────────────────────────────

/// What a write closure observed, decided on the database thread.
enum Written {
  Row(RawResource),
  /// The write went through but the row could not be read back.
  Missing,
  UrlTaken,
  IdTaken,
}

/// Classify a constraint failure raised by a write.
fn constraint_violation(err: &rusqlite::Error) -> Option<Written> {
  match err {
    rusqlite::Error::SqliteFailure(e, _) => match e.extended_code {
      ffi::SQLITE_CONSTRAINT_UNIQUE => Some(Written::UrlTaken),
      ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Some(Written::IdTaken),
      _ => None,
    },
    _ => None,
  }
}

/// `julianday` compares instants whatever the text form; the raw text breaks
/// sub-millisecond ties among fixed-width values.
const NEWEST_FIRST: &str = "julianday(created_at) DESC, created_at DESC, id ASC";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A resource store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection handle is reference-counted. Every
/// operation runs as one closure on the connection thread, so the connection
/// is released as soon as that operation finishes, on success or error.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let shown = path.as_ref().display().to_string();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %shown, "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        // Readers proceed while a writer holds the log; a crash may lose the
        // most recent transaction.
        let mode: String = conn.pragma_update_and_check(
          None,
          "journal_mode",
          "WAL",
          |row| row.get(0),
        )?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(SCHEMA)?;
        let rewritten = conn.execute(NORMALISE_LEGACY_TIMESTAMPS, [])?;
        if rewritten > 0 {
          tracing::info!(rows = rewritten, "rewrote legacy created_at values");
        }
        tracing::debug!(journal_mode = %mode, "schema initialised");
        Ok(())
      })
      .await?;
    Ok(())
  }

  fn finish(url: String, id: Option<i64>, written: Written) -> Result<Resource> {
    match written {
      Written::Row(raw) => raw.into_resource(),
      Written::Missing => {
        tracing::error!(%url, "resource missing immediately after write");
        Err(saver_core::Error::NotFoundAfterWrite { url }.into())
      }
      Written::UrlTaken => Err(saver_core::Error::Conflict { url }.into()),
      Written::IdTaken => match id {
        Some(id) => Err(saver_core::Error::IdTaken(id).into()),
        None => Err(saver_core::Error::Conflict { url }.into()),
      },
    }
  }
}

// ─── ResourceStore impl ──────────────────────────────────────────────────────

impl ResourceStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, input: NewResource) -> Result<Resource> {
    input.validate()?;

    let NewResource { title, url, kind } = input;
    let created_at = encode_dt(Utc::now());
    let url_key = url.clone();

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let inserted = tx.execute(
          "INSERT INTO resources (title, url, type, created_at) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![title, url, kind, created_at],
        );
        if let Err(e) = inserted {
          return match constraint_violation(&e) {
            Some(outcome) => Ok(outcome),
            None => Err(e.into()),
          };
        }

        let id = tx.last_insert_rowid();
        let raw = tx
          .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            rusqlite::params![id],
            RawResource::from_row,
          )
          .optional()?;
        tx.commit()?;

        Ok(raw.map_or(Written::Missing, Written::Row))
      })
      .await?;

    Self::finish(url_key, None, written)
  }

  async fn upsert(&self, input: ImportResource) -> Result<Resource> {
    input.validate()?;

    let ImportResource { id, title, url, kind, created_at } = input;
    let supplied_at = created_at.map(encode_dt);
    let insert_at = supplied_at.clone().unwrap_or_else(|| encode_dt(Utc::now()));
    let url_key = url.clone();

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
          .query_row(
            "SELECT id FROM resources WHERE url = ?1",
            rusqlite::params![url],
            |row| row.get(0),
          )
          .optional()?;

        // A supplied id/created_at overwrites; an omitted one keeps the
        // existing row's value.
        let changed = match existing {
          Some(_) => tx.execute(
            "UPDATE resources SET
               id         = COALESCE(?1, id),
               title      = ?2,
               type       = ?3,
               created_at = COALESCE(?4, created_at)
             WHERE url = ?5",
            rusqlite::params![id, title, kind, supplied_at, url],
          ),
          None => tx.execute(
            "INSERT INTO resources (id, title, url, type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id, title, url, kind, insert_at],
          ),
        };
        if let Err(e) = changed {
          return match constraint_violation(&e) {
            Some(outcome) => Ok(outcome),
            None => Err(e.into()),
          };
        }

        let raw = tx
          .query_row(
            &format!("{SELECT_COLUMNS} WHERE url = ?1"),
            rusqlite::params![url],
            RawResource::from_row,
          )
          .optional()?;
        tx.commit()?;

        Ok(raw.map_or(Written::Missing, Written::Row))
      })
      .await?;

    Self::finish(url_key, id, written)
  }

  async fn get(&self, id: i64) -> Result<Option<Resource>> {
    let raw: Option<RawResource> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            rusqlite::params![id],
            RawResource::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawResource::into_resource).transpose()
  }

  async fn list_all(&self) -> Result<Vec<Resource>> {
    let raws: Vec<RawResource> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("{SELECT_COLUMNS} ORDER BY {NEWEST_FIRST}"))?;
        let rows = stmt
          .query_map([], RawResource::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawResource::into_resource).collect()
  }

  async fn delete_by_id(&self, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM resources WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }
}
