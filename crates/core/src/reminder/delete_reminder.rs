use crate::error::LembraError;
use crate::notification::NotificationCoordinator;
use crate::shared::usecase::UseCase;
use crate::sync::SyncReconciler;
use lembra_domain::{Reminder, ReminderIdentity};
use lembra_infra::{LembraContext, StoreError};
use tracing::warn;

/// Removes a reminder everywhere it exists: the device trigger first, then
/// the remote copy, then the local record. Deleting an identity that is
/// already gone is a no-op, so the operation stays idempotent.
#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub identity: ReminderIdentity,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError(StoreError),
}

impl From<UseCaseError> for LembraError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError(e) => Self::Storage(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for DeleteReminderUseCase {
    type Response = Option<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &LembraContext) -> Result<Self::Response, Self::Error> {
        let current = match ctx.repos.reminders.find_by(&self.identity).await {
            Some(reminder) => reminder,
            None => return Ok(None),
        };

        if let Some(handle) = &current.notification_handle {
            NotificationCoordinator::new(ctx).cancel(handle).await;
        }

        let remote_removed = SyncReconciler::new(ctx)
            .push_delete(current.durable_id.as_deref())
            .await;
        if !remote_removed {
            warn!(
                "Remote copy of reminder {} could not be removed and stays behind on the mirror",
                current.id
            );
        }

        ctx.repos
            .reminders
            .remove(&self.identity)
            .await
            .map_err(UseCaseError::StorageError)?;

        Ok(Some(current))
    }
}
