//! Error type for `saver-notify`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
  /// Connection failure, timeout, or an invalid endpoint.
  #[error("webhook transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("webhook rejected delivery with status {0}")]
  Rejected(StatusCode),
}

pub type Result<T, E = NotifyError> = std::result::Result<T, E>;
