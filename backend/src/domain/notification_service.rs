//! Notification use-case service.
//!
//! Writes go to the repository first; the realtime publisher only sees rows
//! that were actually persisted, so subscribers can trust every event has a
//! backing row.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::error::Error;
use super::identity::UserId;
use super::notification::{NewNotification, Notification};
use super::ports::{
    NotificationPublisher, NotificationRepository, NotificationRepositoryError,
    NotificationService,
};

/// Notification service implementing the [`NotificationService`] port.
#[derive(Clone)]
pub struct NotificationServiceImpl {
    repository: Arc<dyn NotificationRepository>,
    publisher: Arc<dyn NotificationPublisher>,
}

fn map_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => Error::service_unavailable(message),
        NotificationRepositoryError::Query { message } => Error::internal(message),
    }
}

impl NotificationServiceImpl {
    /// Create the service with its repository and realtime publisher.
    #[must_use]
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }
}

#[async_trait]
impl NotificationService for NotificationServiceImpl {
    async fn notify(&self, notification: NewNotification) -> Result<Notification, Error> {
        let row = self
            .repository
            .insert(notification)
            .await
            .map_err(map_error)?;
        self.publisher.publish(&row);
        Ok(row)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>, Error> {
        self.repository
            .list_for_user(user_id)
            .await
            .map_err(map_error)
    }

    async fn unread_count(&self, user_id: &UserId) -> Result<i64, Error> {
        self.repository
            .unread_count(user_id)
            .await
            .map_err(map_error)
    }

    async fn mark_read(&self, id: Uuid, user_id: &UserId) -> Result<(), Error> {
        let updated = self
            .repository
            .mark_read(id, user_id)
            .await
            .map_err(map_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found("notification not found"))
        }
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<(), Error> {
        self.repository
            .mark_all_read(user_id)
            .await
            .map_err(map_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::domain::ports::MockNotificationRepository;
    use crate::domain::{ErrorCode, NotificationKind};

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<Notification>>,
    }

    impl NotificationPublisher for RecordingPublisher {
        fn publish(&self, notification: &Notification) {
            self.published
                .lock()
                .expect("lock")
                .push(notification.clone());
        }
    }

    fn row(user_id: UserId) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            title: "Booking received".into(),
            message: "msg".into(),
            kind: NotificationKind::Booking,
            related_booking_id: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn notify_persists_then_publishes() {
        let user = UserId::random();
        let persisted = row(user);
        let mut repo = MockNotificationRepository::new();
        let returned = persisted.clone();
        repo.expect_insert()
            .times(1)
            .returning(move |_| Ok(returned.clone()));
        let publisher = Arc::new(RecordingPublisher::default());
        let service = NotificationServiceImpl::new(Arc::new(repo), publisher.clone());

        let result = service
            .notify(NewNotification {
                user_id: user,
                title: "Booking received".into(),
                message: "msg".into(),
                kind: NotificationKind::Booking,
                related_booking_id: None,
            })
            .await
            .expect("notify succeeds");
        assert_eq!(result, persisted);
        assert_eq!(publisher.published.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn failed_insert_is_not_published() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(NotificationRepositoryError::query("boom")));
        let publisher = Arc::new(RecordingPublisher::default());
        let service = NotificationServiceImpl::new(Arc::new(repo), publisher.clone());

        let err = service
            .notify(NewNotification {
                user_id: UserId::random(),
                title: "t".into(),
                message: "m".into(),
                kind: NotificationKind::System,
                related_booking_id: None,
            })
            .await
            .expect_err("insert failure propagates");
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(publisher.published.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn mark_read_requires_an_owned_row() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read().returning(|_, _| Ok(false));
        let service =
            NotificationServiceImpl::new(Arc::new(repo), Arc::new(RecordingPublisher::default()));
        let err = service
            .mark_read(Uuid::new_v4(), &UserId::random())
            .await
            .expect_err("missing row is not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
