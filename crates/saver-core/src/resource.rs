//! The resource record and the inputs that create it.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A saved resource, exactly as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
  pub id:         i64,
  pub title:      String,
  pub url:        String,
  /// Free-form tag such as `"article"`, `"youtube"` or `"tool"`.
  #[serde(rename = "type")]
  pub kind:       String,
  pub created_at: DateTime<Utc>,
}

/// Input to a standard save. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewResource {
  pub title: String,
  pub url:   String,
  pub kind:  String,
}

impl NewResource {
  pub fn new(
    title: impl Into<String>,
    url: impl Into<String>,
    kind: impl Into<String>,
  ) -> Self {
    Self { title: title.into(), url: url.into(), kind: kind.into() }
  }

  pub fn validate(&self) -> Result<()> {
    validate_fields(&self.title, &self.url, &self.kind)
  }
}

/// Input to an administrative import. Supplied `id` and `created_at` are
/// stored verbatim.
#[derive(Debug, Clone)]
pub struct ImportResource {
  pub id:         Option<i64>,
  pub title:      String,
  pub url:        String,
  pub kind:       String,
  pub created_at: Option<DateTime<Utc>>,
}

impl ImportResource {
  pub fn validate(&self) -> Result<()> {
    validate_fields(&self.title, &self.url, &self.kind)
  }
}

impl From<NewResource> for ImportResource {
  fn from(r: NewResource) -> Self {
    ImportResource {
      id:         None,
      title:      r.title,
      url:        r.url,
      kind:       r.kind,
      created_at: None,
    }
  }
}

fn validate_fields(title: &str, url: &str, kind: &str) -> Result<()> {
  // `url` first: it is the uniqueness key.
  for (name, value) in [("url", url), ("title", title), ("type", kind)] {
    if value.trim().is_empty() {
      return Err(Error::EmptyField(name));
    }
  }
  Ok(())
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// Render a timestamp in the fixed-width form used for storage, so that
/// lexical order equals chronological order.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 timestamp, or the `YYYY-MM-DD HH:MM:SS[.f]` form SQLite
/// writes for `CURRENT_TIMESTAMP` (taken as UTC).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
    .map(|naive| naive.and_utc())
    .map_err(|_| Error::InvalidTimestamp(s.to_owned()))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn resource_serialises_kind_as_type() {
    let r = Resource {
      id:         1,
      title:      "How to Build X".into(),
      url:        "https://ex.com/a".into(),
      kind:       "article".into(),
      created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    };
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["type"], "article");
    assert!(json.get("kind").is_none());
  }

  #[test]
  fn empty_url_is_rejected_first() {
    let err = NewResource::new("", " ", "").validate().unwrap_err();
    assert!(matches!(err, Error::EmptyField("url")));
  }

  #[test]
  fn whitespace_title_is_rejected() {
    let err = NewResource::new("  ", "https://ex.com", "tool")
      .validate()
      .unwrap_err();
    assert!(matches!(err, Error::EmptyField("title")));
  }

  #[test]
  fn free_form_type_is_accepted() {
    NewResource::new("Podcast", "https://ex.com/p", "podcast-episode")
      .validate()
      .unwrap();
  }

  #[test]
  fn parse_accepts_rfc3339_and_sqlite_forms() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(parse_timestamp("2024-01-02T03:04:05Z").unwrap(), expected);
    assert_eq!(parse_timestamp("2024-01-02T05:04:05+02:00").unwrap(), expected);
    assert_eq!(parse_timestamp("2024-01-02 03:04:05").unwrap(), expected);
  }

  #[test]
  fn parse_rejects_garbage() {
    let err = parse_timestamp("yesterday").unwrap_err();
    assert!(matches!(err, Error::InvalidTimestamp(s) if s == "yesterday"));
  }

  #[test]
  fn formatted_timestamps_sort_chronologically() {
    let a = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let b = a + chrono::Duration::microseconds(1);
    let c = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 6).unwrap();
    let (fa, fb, fc) = (format_timestamp(a), format_timestamp(b), format_timestamp(c));
    assert_eq!(fa.len(), fb.len());
    assert!(fa < fb && fb < fc);
    assert_eq!(parse_timestamp(&fb).unwrap(), b);
  }
}
