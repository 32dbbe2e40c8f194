//! Handler for `GET /`.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:  &'static str,
  pub service: &'static str,
  pub version: &'static str,
}

/// `GET /`: liveness probe. Touches neither the store nor the webhook.
pub async fn handler() -> Json<Health> {
  Json(Health {
    status:  "healthy",
    service: "Resource Saver API",
    version: env!("CARGO_PKG_VERSION"),
  })
}
