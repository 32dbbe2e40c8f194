//! JSON REST API for the Resource Saver.
//!
//! Exposes an axum [`Router`] backed by any [`ResourceStore`] and a
//! [`Notifier`]. CORS, tracing middleware, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = saver_api::api_router(AppState::new(store, notifier));
//! ```

pub mod error;
pub mod health;
pub mod resources;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use saver_core::store::ResourceStore;
use saver_notify::Notifier;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub notifier: Arc<Notifier>,
}

impl<S> AppState<S> {
  pub fn new(store: S, notifier: Notifier) -> Self {
    Self { store: Arc::new(store), notifier: Arc::new(notifier) }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), notifier: Arc::clone(&self.notifier) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ResourceStore + 'static,
{
  Router::new()
    .route("/", get(health::handler))
    .route("/save", post(resources::save::<S>))
    .route("/import", post(resources::import::<S>))
    .route("/resources", get(resources::list::<S>))
    .route("/resources/{id}", delete(resources::delete_one::<S>))
    .with_state(state)
}
