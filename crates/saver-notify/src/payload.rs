//! JSON body posted to the webhook.

use chrono::{DateTime, Utc};
use saver_core::resource::Resource;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload<'a> {
  pub id:         i64,
  pub title:      &'a str,
  pub url:        &'a str,
  #[serde(rename = "type")]
  pub kind:       &'a str,
  pub created_at: DateTime<Utc>,
  #[serde(rename = "userEmail", skip_serializing_if = "Option::is_none")]
  pub user_email: Option<&'a str>,
}

impl<'a> WebhookPayload<'a> {
  pub fn new(resource: &'a Resource, user_email: Option<&'a str>) -> Self {
    Self {
      id: resource.id,
      title: &resource.title,
      url: &resource.url,
      kind: &resource.kind,
      created_at: resource.created_at,
      user_email,
    }
  }
}
