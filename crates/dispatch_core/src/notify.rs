//! Notification sink: append-only per-recipient message log.
//!
//! The engine writes assignment notifications here as a best-effort side
//! channel. There is no delivery guarantee beyond the durable append and no
//! read-state tracking; presentation layers poll.

use std::sync::Mutex;

use thiserror::Error;

use crate::model::{Notification, Recipient};

/// The sink could not persist the append. The state transition that produced
/// the notification is unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("notification append failed: {0}")]
pub struct SinkError(pub String);

pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: &Notification) -> Result<(), SinkError>;
}

/// Process-local sink backed by a vector; never fails, never drops.
#[derive(Debug, Default)]
pub struct InMemorySink {
    log: Mutex<Vec<Notification>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications for one recipient, oldest first.
    pub fn for_recipient(&self, recipient: Recipient) -> Vec<Notification> {
        let log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.iter()
            .filter(|n| n.recipient == recipient)
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for InMemorySink {
    fn deliver(&self, notification: &Notification) -> Result<(), SinkError> {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.push(notification.clone());
        Ok(())
    }
}
