//! Outbound notification channel for trading signals.
//!
//! A [`Notifier`] makes exactly one delivery attempt per call. Retrying is the
//! caller's decision and lives in [`retry::deliver_with_retry`], so fakes and
//! real channels share the same backoff behaviour.

pub mod errors;
pub mod retry;
pub mod telegram;

use async_trait::async_trait;

pub use errors::DeliveryError;
pub use retry::{RetryPolicy, deliver_with_retry};
pub use telegram::TelegramNotifier;

/// A destination that can receive a plain-text message.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Makes a single delivery attempt.
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Box<T> {
    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        (**self).send(text).await
    }
}
