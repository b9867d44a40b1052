// Per-account notification feed. The push transport itself lives outside
// this crate; it is consumed through the NotificationSource interface.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::client::error::ClientError;
use crate::client::PortalClient;
use crate::types::NotificationEvent;

/// External push transport delivering `{id, message, timestamp}` events
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Begin delivery of push events for one account
    async fn subscribe(
        &self,
        account_id: &str,
    ) -> Result<mpsc::Receiver<NotificationEvent>, ClientError>;

    /// Stop delivery for the account
    async fn unsubscribe(&self, account_id: &str);
}

/// Notification list for one account, newest first
pub struct NotificationFeed {
    client: PortalClient,
    account_id: String,
    notifications: Vec<NotificationEvent>,
}

impl NotificationFeed {
    /// Fetch the stored notifications for the account
    pub async fn load(
        client: PortalClient,
        account_id: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let account_id = account_id.into();
        let mut notifications = client.notifications(&account_id).await?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Self {
            client,
            account_id,
            notifications,
        })
    }

    pub fn notifications(&self) -> &[NotificationEvent] {
        &self.notifications
    }

    pub fn has_unread(&self) -> bool {
        self.notifications.iter().any(|n| !n.has_read)
    }

    /// Merge one push event into the feed, keeping newest-first order.
    /// Events without an id are dropped rather than treated as errors.
    pub fn push(&mut self, event: NotificationEvent) {
        if event.notification_id.is_empty() {
            tracing::warn!("skipping push notification without an id");
            return;
        }
        let position = self
            .notifications
            .iter()
            .position(|n| n.created_at <= event.created_at)
            .unwrap_or(self.notifications.len());
        self.notifications.insert(position, event);
    }

    pub async fn mark_read(&mut self, notification_id: &str) -> Result<(), ClientError> {
        self.client
            .mark_notification_read(notification_id, &self.account_id)
            .await?;
        if let Some(notification) = self
            .notifications
            .iter_mut()
            .find(|n| n.notification_id == notification_id)
        {
            notification.has_read = true;
        }
        Ok(())
    }

    pub async fn mark_all_read(&mut self) -> Result<(), ClientError> {
        self.client
            .mark_all_notifications_read(&self.account_id)
            .await?;
        for notification in &mut self.notifications {
            notification.has_read = true;
        }
        Ok(())
    }
}
