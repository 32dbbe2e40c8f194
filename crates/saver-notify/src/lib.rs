//! Best-effort webhook delivery of saved resources.
//!
//! A [`Notifier`] relays each stored [`Resource`](saver_core::resource::Resource)
//! to an operator-configured collector. Delivery is at-most-once: there is no
//! retry or queueing, and failures never reach the caller of
//! [`Notifier::notify`].

mod notifier;
mod payload;

pub mod error;

pub use error::NotifyError;
pub use notifier::{DEFAULT_TIMEOUT, Delivery, Notifier, NotifierConfig};
pub use payload::WebhookPayload;
