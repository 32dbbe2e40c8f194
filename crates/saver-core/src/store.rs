//! The `ResourceStore` trait.
//!
//! Implemented by storage backends (e.g. `saver-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::resource::{ImportResource, NewResource, Resource};

/// Abstraction over a resource store backend.
///
/// Every write returns the row as re-read from storage after the write, never
/// an echo of the input. Each call acquires and releases its own handle on the
/// backend; no call holds storage resources after its future resolves.
///
/// Backend errors must convert into [`crate::Error`] so callers can tell a
/// duplicate URL from a genuine failure without knowing the engine.
pub trait ResourceStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Append a new resource with a store-assigned id and timestamp.
  ///
  /// Fails with [`crate::Error::Conflict`] if the URL is already stored.
  fn insert(
    &self,
    input: NewResource,
  ) -> impl Future<Output = Result<Resource, Self::Error>> + Send + '_;

  /// Insert or replace the resource keyed by URL, keeping any supplied `id`
  /// and `created_at` verbatim.
  fn upsert(
    &self,
    input: ImportResource,
  ) -> impl Future<Output = Result<Resource, Self::Error>> + Send + '_;

  /// Retrieve a resource by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Resource>, Self::Error>> + Send + '_;

  /// All resources, newest first; equal timestamps keep insertion order.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Resource>, Self::Error>> + Send + '_;

  /// Remove the resource with `id`. Returns whether a row was removed.
  fn delete_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
