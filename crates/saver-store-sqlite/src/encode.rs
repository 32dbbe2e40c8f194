//! Conversions between SQLite rows and [`Resource`].
//!
//! Timestamps are stored in the fixed-width RFC 3339 form produced by
//! [`format_timestamp`]; rows carrying SQLite's `CURRENT_TIMESTAMP` form are
//! still decoded.

use chrono::{DateTime, Utc};
use saver_core::resource::{Resource, format_timestamp, parse_timestamp};

use crate::Result;

pub fn encode_dt(dt: DateTime<Utc>) -> String { format_timestamp(dt) }

/// Raw values read directly from a `resources` row.
pub struct RawResource {
  pub id:         i64,
  pub title:      String,
  pub url:        String,
  pub kind:       String,
  pub created_at: String,
}

impl RawResource {
  /// Column order must match [`crate::schema::SELECT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawResource {
      id:         row.get(0)?,
      title:      row.get(1)?,
      url:        row.get(2)?,
      kind:       row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_resource(self) -> Result<Resource> {
    Ok(Resource {
      id:         self.id,
      title:      self.title,
      url:        self.url,
      kind:       self.kind,
      created_at: parse_timestamp(&self.created_at)?,
    })
  }
}
