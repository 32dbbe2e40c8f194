//! Error types for `saver-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A resource with this URL is already stored.
  #[error("resource with url {url:?} already exists")]
  Conflict { url: String },

  /// An import supplied an id that already belongs to a different URL.
  #[error("resource id {0} is already taken by another url")]
  IdTaken(i64),

  /// A write reported success but the row could not be read back.
  #[error("resource with url {url:?} missing after write")]
  NotFoundAfterWrite { url: String },

  #[error("field {0:?} must not be empty")]
  EmptyField(&'static str),

  #[error("invalid timestamp: {0:?}")]
  InvalidTimestamp(String),

  /// Any failure of the storage engine itself.
  #[error("storage backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
