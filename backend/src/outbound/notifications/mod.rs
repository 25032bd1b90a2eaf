//! Notification dispatchers.
//!
//! [`TracingNotificationDispatcher`] writes each notification to the log,
//! standing in for a mail channel. [`FanOutNotificationDispatcher`] forwards
//! to several channels and fails if any of them failed, after trying all.
//! The database inbox lives with the other Diesel adapters.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Notification;
use crate::domain::ports::{NotificationDispatchError, NotificationDispatcher};

/// Logs notifications as structured events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationDispatcher;

#[async_trait]
impl NotificationDispatcher for TracingNotificationDispatcher {
    async fn dispatch(&self, notification: &Notification) -> Result<(), NotificationDispatchError> {
        info!(
            recipient = %notification.recipient,
            event = notification.event.kind(),
            message = %notification.event.message(),
            "notification sent"
        );
        Ok(())
    }
}

/// Delivers every notification to each inner channel in order.
#[derive(Clone, Default)]
pub struct FanOutNotificationDispatcher {
    channels: Vec<Arc<dyn NotificationDispatcher>>,
}

impl FanOutNotificationDispatcher {
    /// Fan out to `channels`.
    pub fn new(channels: Vec<Arc<dyn NotificationDispatcher>>) -> Self {
        Self { channels }
    }

    /// Add a channel.
    #[must_use]
    pub fn with(mut self, channel: Arc<dyn NotificationDispatcher>) -> Self {
        self.channels.push(channel);
        self
    }
}

#[async_trait]
impl NotificationDispatcher for FanOutNotificationDispatcher {
    async fn dispatch(&self, notification: &Notification) -> Result<(), NotificationDispatchError> {
        let mut failures = Vec::new();
        for channel in &self.channels {
            if let Err(err) = channel.dispatch(notification).await {
                failures.push(err.to_string());
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotificationDispatchError::delivery(failures.join("; ")))
        }
    }
}

/// Records notifications in memory so tests can inspect them.
#[derive(Default)]
pub struct RecordingNotificationDispatcher {
    sent: std::sync::Mutex<Vec<Notification>>,
}

impl RecordingNotificationDispatcher {
    /// Start with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything dispatched so far, oldest first.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotificationDispatcher {
    async fn dispatch(&self, notification: &Notification) -> Result<(), NotificationDispatchError> {
        self.sent
            .lock()
            .map_err(|_| NotificationDispatchError::delivery("recording lock poisoned"))?
            .push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockNotificationDispatcher;
    use crate::domain::{BookingEvent, UserId};

    fn notification() -> Notification {
        Notification::new(
            UserId::random(),
            BookingEvent::ReservationsDeleted {
                doctor_name: "Allison Cameron".into(),
                specialization: None,
            },
        )
    }

    #[tokio::test]
    async fn fan_out_tries_every_channel() {
        let mut failing = MockNotificationDispatcher::new();
        failing
            .expect_dispatch()
            .times(1)
            .returning(|_| Err(NotificationDispatchError::delivery("smtp down")));
        let recorder = Arc::new(RecordingNotificationDispatcher::new());
        let fan_out = FanOutNotificationDispatcher::default()
            .with(Arc::new(failing))
            .with(recorder.clone());

        let err = fan_out.dispatch(&notification()).await.expect_err("one channel failed");

        assert!(err.to_string().contains("smtp down"));
        assert_eq!(recorder.sent().len(), 1);
    }

    #[tokio::test]
    async fn tracing_channel_always_succeeds() {
        assert!(TracingNotificationDispatcher.dispatch(&notification()).await.is_ok());
    }
}
