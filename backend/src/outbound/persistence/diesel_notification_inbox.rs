//! Stores booking notifications in the `notifications` table so clients can
//! read them in-app.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::Notification;
use crate::domain::ports::{NotificationDispatchError, NotificationDispatcher};

use super::error_mapping::classify;
use super::models::NewNotificationRow;
use super::pool::DbPool;
use super::schema::notifications;

/// [`NotificationDispatcher`] that persists each notification.
#[derive(Clone)]
pub struct DieselNotificationInbox {
    pool: DbPool,
}

impl DieselNotificationInbox {
    /// Create an inbox writer over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_for(notification: &Notification) -> Result<NewNotificationRow<'_>, NotificationDispatchError> {
    let payload = serde_json::to_value(&notification.event)
        .map_err(|err| NotificationDispatchError::delivery(err.to_string()))?;
    Ok(NewNotificationRow {
        id: Uuid::new_v4(),
        recipient_id: *notification.recipient.as_uuid(),
        kind: notification.event.kind(),
        payload,
        message: notification.event.message(),
    })
}

#[async_trait]
impl NotificationDispatcher for DieselNotificationInbox {
    async fn dispatch(&self, notification: &Notification) -> Result<(), NotificationDispatchError> {
        let row = row_for(notification)?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| NotificationDispatchError::delivery(err.message()))?;
        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| NotificationDispatchError::delivery(format!("{:?}", classify(err))))?;
        Ok(())
    }
}
