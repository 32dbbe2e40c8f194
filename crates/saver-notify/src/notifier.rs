//! [`Notifier`]: posts stored resources to the configured webhook.

use std::time::Duration;

use reqwest::StatusCode;
use saver_core::resource::Resource;

use crate::{
  error::{NotifyError, Result},
  payload::WebhookPayload,
};

/// Upper bound on a single webhook call, connect time included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook settings. Every field except `timeout` may be absent.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
  pub webhook_url:        Option<String>,
  /// Sent as `Authorization: Bearer <token>`.
  pub webhook_token:      Option<String>,
  /// Used as `userEmail` when a request does not carry one.
  pub default_user_email: Option<String>,
  pub timeout:            Duration,
}

impl Default for NotifierConfig {
  fn default() -> Self {
    Self {
      webhook_url:        None,
      webhook_token:      None,
      default_user_email: None,
      timeout:            DEFAULT_TIMEOUT,
    }
  }
}

/// Result of a delivery attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
  /// No webhook is configured.
  Skipped,
  /// The webhook answered with a 2xx status.
  Sent(StatusCode),
}

#[derive(Debug, Clone)]
struct Endpoint {
  client: reqwest::Client,
  url:    String,
  token:  Option<String>,
}

/// Relays stored resources to an external collector.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct Notifier {
  endpoint:           Option<Endpoint>,
  default_user_email: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

impl Notifier {
  /// Build a notifier. The HTTP client is only constructed when a webhook URL
  /// is configured.
  pub fn new(config: NotifierConfig) -> Result<Self> {
    let endpoint = match non_empty(config.webhook_url) {
      Some(url) => {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Some(Endpoint { client, url, token: non_empty(config.webhook_token) })
      }
      None => None,
    };

    Ok(Self {
      endpoint,
      default_user_email: non_empty(config.default_user_email),
    })
  }

  /// A notifier with no webhook; every call is a no-op.
  pub fn disabled() -> Self {
    Self { endpoint: None, default_user_email: None }
  }

  pub fn is_enabled(&self) -> bool { self.endpoint.is_some() }

  /// Post `resource` to the webhook once, reporting the outcome.
  ///
  /// `user_email` falls back to the configured default; an empty string counts
  /// as absent.
  pub async fn deliver(
    &self,
    resource: &Resource,
    user_email: Option<&str>,
  ) -> Result<Delivery> {
    let Some(endpoint) = &self.endpoint else {
      return Ok(Delivery::Skipped);
    };

    let user_email = user_email
      .filter(|e| !e.trim().is_empty())
      .or(self.default_user_email.as_deref());
    let payload = WebhookPayload::new(resource, user_email);

    let mut req = endpoint.client.post(&endpoint.url).json(&payload);
    if let Some(token) = &endpoint.token {
      req = req.bearer_auth(token);
    }

    let status = req.send().await?.status();
    if status.is_success() {
      Ok(Delivery::Sent(status))
    } else {
      Err(NotifyError::Rejected(status))
    }
  }

  /// Fire-and-forget delivery: failures are logged and swallowed.
  ///
  /// The resource is already stored when this runs; nothing here may change
  /// the outcome the client sees.
  pub async fn notify(&self, resource: &Resource, user_email: Option<&str>) {
    match self.deliver(resource, user_email).await {
      Ok(Delivery::Skipped) => {
        tracing::debug!(id = resource.id, "no webhook configured; skipping");
      }
      Ok(Delivery::Sent(status)) => {
        tracing::debug!(id = resource.id, %status, "webhook delivered");
      }
      Err(err) => {
        tracing::warn!(
          id = resource.id,
          url = %resource.url,
          error = %err,
          "webhook delivery failed"
        );
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use serde_json::{Value, json};
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
  };

  use super::*;

  fn sample() -> Resource {
    Resource {
      id:         1,
      title:      "How to Build X".into(),
      url:        "https://ex.com/a".into(),
      kind:       "article".into(),
      created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
  }

  fn notifier(server: &MockServer, token: Option<&str>, default_email: Option<&str>) -> Notifier {
    Notifier::new(NotifierConfig {
      webhook_url:        Some(format!("{}/hook", server.uri())),
      webhook_token:      token.map(str::to_owned),
      default_user_email: default_email.map(str::to_owned),
      timeout:            Duration::from_secs(2),
    })
    .unwrap()
  }

  async fn only_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests[0].body_json().unwrap()
  }

  #[tokio::test]
  async fn posts_payload_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/hook"))
      .and(header("authorization", "Bearer s3cret"))
      .and(body_partial_json(json!({
        "id": 1,
        "title": "How to Build X",
        "url": "https://ex.com/a",
        "type": "article",
        "userEmail": "me@ex.com",
      })))
      .respond_with(ResponseTemplate::new(200))
      .expect(1)
      .mount(&server)
      .await;

    let outcome = notifier(&server, Some("s3cret"), None)
      .deliver(&sample(), Some("me@ex.com"))
      .await
      .unwrap();
    assert_eq!(outcome, Delivery::Sent(StatusCode::OK));
  }

  #[tokio::test]
  async fn falls_back_to_default_user_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(204))
      .mount(&server)
      .await;

    notifier(&server, None, Some("owner@ex.com"))
      .deliver(&sample(), Some(""))
      .await
      .unwrap();

    let body = only_body(&server).await;
    assert_eq!(body["userEmail"], "owner@ex.com");
    assert_eq!(body["created_at"], "2024-05-01T12:00:00Z");
  }

  #[tokio::test]
  async fn omits_user_email_and_auth_when_unset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200))
      .mount(&server)
      .await;

    notifier(&server, None, None).deliver(&sample(), None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    let body = only_body(&server).await;
    assert!(body.get("userEmail").is_none());
  }

  #[tokio::test]
  async fn non_success_status_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(500))
      .expect(1)
      .mount(&server)
      .await;

    let err = notifier(&server, None, None)
      .deliver(&sample(), None)
      .await
      .unwrap_err();
    assert!(matches!(err, NotifyError::Rejected(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
  }

  #[tokio::test]
  async fn slow_webhook_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
      .mount(&server)
      .await;

    let n = Notifier::new(NotifierConfig {
      webhook_url: Some(server.uri()),
      timeout: Duration::from_millis(100),
      ..NotifierConfig::default()
    })
    .unwrap();

    let err = n.deliver(&sample(), None).await.unwrap_err();
    assert!(matches!(err, NotifyError::Transport(ref e) if e.is_timeout()), "{err:?}");
  }

  #[tokio::test]
  async fn notify_swallows_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(503))
      .expect(1)
      .mount(&server)
      .await;

    notifier(&server, None, None).notify(&sample(), None).await;

    let unreachable = Notifier::new(NotifierConfig {
      webhook_url: Some("http://127.0.0.1:9/hook".into()),
      timeout: Duration::from_millis(500),
      ..NotifierConfig::default()
    })
    .unwrap();
    unreachable.notify(&sample(), None).await;
  }

  #[tokio::test]
  async fn unconfigured_notifier_skips() {
    let n = Notifier::new(NotifierConfig {
      webhook_url: Some("   ".into()),
      ..NotifierConfig::default()
    })
    .unwrap();
    assert!(!n.is_enabled());
    assert_eq!(n.deliver(&sample(), None).await.unwrap(), Delivery::Skipped);
    assert!(!Notifier::disabled().is_enabled());
  }
}
