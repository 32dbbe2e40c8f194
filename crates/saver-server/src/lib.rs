//! HTTP server assembly for the Resource Saver.
//!
//! Holds the runtime [`ServerConfig`] and wraps the API router in the
//! middleware every deployment needs.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use axum::Router;
use config::{Config, ConfigError, Environment, File};
use saver_notify::NotifierConfig;
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

/// Prefix for environment overrides, e.g. `SAVER_WEBHOOK_URL`.
pub const ENV_PREFIX: &str = "SAVER";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered as built-in defaults, then the optional TOML file, then `SAVER_*`
/// environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub database_path:        PathBuf,
  pub webhook_url:          Option<String>,
  pub webhook_token:        Option<String>,
  pub default_user_email:   Option<String>,
  pub webhook_timeout_secs: u64,
}

impl ServerConfig {
  /// Load from `file` (if it exists) and the process environment.
  pub fn load(file: &Path) -> Result<Self, ConfigError> {
    Self::from_sources(file, Environment::with_prefix(ENV_PREFIX))
  }

  pub fn from_sources(file: &Path, env: Environment) -> Result<Self, ConfigError> {
    Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8080_i64)?
      .set_default("database_path", "resources.db")?
      .set_default("webhook_timeout_secs", 10_i64)?
      .add_source(File::from(file).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  /// The database path with a leading `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.database_path) }

  pub fn notifier_config(&self) -> NotifierConfig {
    NotifierConfig {
      webhook_url:        self.webhook_url.clone(),
      webhook_token:      self.webhook_token.clone(),
      default_user_email: self.default_user_email.clone(),
      timeout:            Duration::from_secs(self.webhook_timeout_secs),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Middleware ───────────────────────────────────────────────────────────────

/// Wrap the API router with request tracing and a permissive CORS policy;
/// the browser extension calls from its own origin.
pub fn app(api: Router) -> Router {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods(Any)
    .allow_headers(Any);

  api.layer(TraceLayer::new_for_http()).layer(cors)
}
