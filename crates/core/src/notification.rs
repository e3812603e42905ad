//! Outbound user notification interface.
//!
//! Actual delivery (push, email, ...) is a deployment concern; the backend
//! only depends on this trait. [`LogNotifier`] is the default when no
//! provider is configured, [`MockNotifier`] records messages for tests.

use async_trait::async_trait;

use crate::types::DbId;

/// Capability to deliver a short message to a single user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` to the user identified by `target`.
    ///
    /// Returns `false` when delivery failed. Delivery is best-effort:
    /// callers log failures but never fail a request over them.
    async fn send(&self, target: DbId, message: &str, payload: Option<&serde_json::Value>)
        -> bool;
}

/// Notifier that only logs the message.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        target: DbId,
        message: &str,
        _payload: Option<&serde_json::Value>,
    ) -> bool {
        tracing::info!(%target, message, "notification");
        true
    }
}

/// Notifier that records every message, for assertions in tests.
#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: std::sync::Mutex<Vec<(DbId, String)>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, in order.
    pub fn sent(&self) -> Vec<(DbId, String)> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(
        &self,
        target: DbId,
        message: &str,
        _payload: Option<&serde_json::Value>,
    ) -> bool {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push((target, message.to_string()));
        true
    }
}
