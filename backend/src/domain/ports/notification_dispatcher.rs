//! Port for delivering lifecycle notifications.

use async_trait::async_trait;

use crate::domain::Notification;

use super::define_port_error;

define_port_error! {
    /// Errors raised while delivering a notification.
    pub enum NotificationDispatchError {
        /// The delivery channel refused or lost the message.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

/// Delivers notifications to their recipients.
///
/// Delivery is best effort: services log failures and carry on, so a broken
/// channel never undoes a committed booking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver one notification.
    async fn dispatch(&self, notification: &Notification) -> Result<(), NotificationDispatchError>;
}
