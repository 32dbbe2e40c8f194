//! Handlers for resource endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/save` | Body: [`SaveBody`]; 409 if the URL is already saved |
//! | `POST`   | `/import` | Body: [`ImportBody`]; overwrites by URL |
//! | `GET`    | `/resources` | Newest first, with a count |
//! | `DELETE` | `/resources/{id}` | 404 if absent |

use axum::{
  Json,
  extract::{Path, State},
};
use saver_core::{
  resource::{ImportResource, NewResource, Resource, parse_timestamp},
  store::ResourceStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

pub const SAVED_MESSAGE: &str = "Resource saved successfully!";

// ─── Save ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /save`.
#[derive(Debug, Deserialize)]
pub struct SaveBody {
  pub title:      String,
  pub url:        String,
  #[serde(rename = "type")]
  pub kind:       String,
  #[serde(rename = "userEmail", default)]
  pub user_email: Option<String>,
}

/// The stored resource plus a confirmation message.
#[derive(Debug, Serialize)]
pub struct SavedResponse {
  #[serde(flatten)]
  pub resource: Resource,
  pub message:  &'static str,
}

/// `POST /save`: store a new resource, then notify the webhook.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SaveBody>,
) -> Result<Json<SavedResponse>, ApiError>
where
  S: ResourceStore,
{
  tracing::info!(
    title = %body.title,
    url = %body.url,
    kind = %body.kind,
    "new resource received"
  );

  let SaveBody { title, url, kind, user_email } = body;
  let input = NewResource::new(title, url, kind);
  input
    .validate()
    .map_err(|e| ApiError::classify(e, "save resource"))?;

  let resource = state
    .store
    .insert(input)
    .await
    .map_err(|e| ApiError::classify(e, "save resource"))?;

  // The store call has returned, so no database handle is held here.
  state.notifier.notify(&resource, user_email.as_deref()).await;

  Ok(Json(SavedResponse { resource, message: SAVED_MESSAGE }))
}

// ─── Import ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /import`.
///
/// `created_at` accepts RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC).
#[derive(Debug, Deserialize)]
pub struct ImportBody {
  pub id:         Option<i64>,
  pub title:      String,
  pub url:        String,
  #[serde(rename = "type")]
  pub kind:       String,
  pub created_at: Option<String>,
  #[serde(rename = "userEmail", default)]
  pub user_email: Option<String>,
}

impl TryFrom<ImportBody> for ImportResource {
  type Error = saver_core::Error;

  fn try_from(b: ImportBody) -> Result<Self, Self::Error> {
    Ok(ImportResource {
      id:         b.id,
      title:      b.title,
      url:        b.url,
      kind:       b.kind,
      created_at: b.created_at.as_deref().map(parse_timestamp).transpose()?,
    })
  }
}

/// `POST /import`: administrative restore. Returns the raw stored row.
pub async fn import<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<ImportBody>,
) -> Result<Json<Resource>, ApiError>
where
  S: ResourceStore,
{
  let user_email = body.user_email.clone();
  let input = ImportResource::try_from(body)
    .map_err(|e| ApiError::classify(e, "import resource"))?;

  let resource = state
    .store
    .upsert(input)
    .await
    .map_err(|e| ApiError::classify(e, "import resource"))?;

  tracing::info!(id = resource.id, url = %resource.url, "resource imported");
  state.notifier.notify(&resource, user_email.as_deref()).await;

  Ok(Json(resource))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResourceList {
  pub resources: Vec<Resource>,
  pub count:     usize,
}

/// `GET /resources`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<ResourceList>, ApiError>
where
  S: ResourceStore,
{
  let resources = state
    .store
    .list_all()
    .await
    .map_err(|e| ApiError::classify(e, "list resources"))?;
  let count = resources.len();
  Ok(Json(ResourceList { resources, count }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Message {
  pub message: String,
}

/// `DELETE /resources/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Message>, ApiError>
where
  S: ResourceStore,
{
  let removed = state
    .store
    .delete_by_id(id)
    .await
    .map_err(|e| ApiError::classify(e, "delete resource"))?;

  if !removed {
    return Err(ApiError::NotFound("Resource not found".to_owned()));
  }

  tracing::info!(id, "resource deleted");
  Ok(Json(Message { message: format!("Resource {id} deleted successfully") }))
}
