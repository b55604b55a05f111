//! Notification recording. Delivery channels (email/SMS/push) are an
//! external collaborator; this service only persists the event.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::notification::Notification;
use crate::repositories::notification_repository::NotificationRepository;
use crate::utils::errors::AppResult;

pub struct NotificationService {
    notifications: NotificationRepository,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            notifications: NotificationRepository::new(pool),
        }
    }

    pub async fn record(
        &self,
        user_id: Uuid,
        message: &str,
        notification_type: &str,
    ) -> AppResult<Notification> {
        let notification = self.notifications.insert(user_id, message, notification_type).await?;
        tracing::debug!(
            user_id = %user_id,
            notification_type,
            "Notification recorded"
        );
        Ok(notification)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        self.notifications.list_by_user(user_id).await
    }
}
