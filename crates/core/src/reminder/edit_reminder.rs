use crate::error::LembraError;
use crate::notification::{NotificationCoordinator, ScheduleError};
use crate::shared::usecase::UseCase;
use crate::sync::SyncReconciler;
use chrono::{DateTime, Utc};
use lembra_domain::{Reminder, ReminderIdentity, ReminderPatch, SyncStatus};
use lembra_infra::{LembraContext, StoreError};

/// Applies field updates to an existing reminder, re-pushes the record if
/// it has synced before, and replaces its device trigger.
#[derive(Debug)]
pub struct EditReminderUseCase {
    pub identity: ReminderIdentity,
    pub patch: ReminderPatch,
}

#[derive(Debug)]
pub struct EditedReminder {
    pub reminder: Reminder,
    /// Whether the edited content reached the remote mirror in this call
    pub synced: bool,
    /// Present when the record ended up with no active trigger
    pub schedule_failure: Option<ScheduleError>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ReminderIdentity),
    EmptyTitle,
    InvalidTriggerInstant(String),
    StorageError(StoreError),
}

impl From<UseCaseError> for LembraError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(identity) => {
                Self::NotFound(format!("The reminder with identity {} was not found.", identity))
            }
            UseCaseError::EmptyTitle => {
                Self::BadClientData("A reminder needs a non-empty title".into())
            }
            UseCaseError::InvalidTriggerInstant(e) => Self::BadClientData(format!(
                "The new trigger instant could not be parsed: {}",
                e
            )),
            UseCaseError::StorageError(e) => Self::Storage(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for EditReminderUseCase {
    type Response = EditedReminder;

    type Error = UseCaseError;

    const NAME: &'static str = "EditReminder";

    async fn execute(&mut self, ctx: &LembraContext) -> Result<Self::Response, Self::Error> {
        let current = ctx
            .repos
            .reminders
            .find_by(&self.identity)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.identity.clone()))?;

        let mut updated = current.clone();
        if let Some(title) = &self.patch.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(UseCaseError::EmptyTitle);
            }
            updated.title = title.to_string();
        }
        if let Some(notes) = &self.patch.notes {
            updated.notes = if notes.is_empty() {
                None
            } else {
                Some(notes.clone())
            };
        }
        if let Some(datetime_iso) = &self.patch.datetime_iso {
            updated.trigger_at = DateTime::parse_from_rfc3339(datetime_iso)
                .map_err(|e| UseCaseError::InvalidTriggerInstant(e.to_string()))?
                .with_timezone(&Utc)
                .timestamp_millis();
        }

        if updated.sync_status == SyncStatus::Synced && !updated.same_content(&current) {
            updated.sync_status = SyncStatus::Dirty;
        }

        ctx.repos
            .reminders
            .replace(&self.identity, &updated)
            .await
            .map_err(UseCaseError::StorageError)?;

        // Committed locally; the remote update only degrades the response
        let synced = SyncReconciler::new(ctx).push_update(&updated).await;

        let identity = ReminderIdentity::Ephemeral(updated.id.clone());
        let mut refreshed = ctx
            .repos
            .reminders
            .find_by(&identity)
            .await
            .unwrap_or_else(|| updated.clone());

        let coordinator = NotificationCoordinator::new(ctx);
        let schedule_result = match refreshed.notification_handle.clone() {
            Some(old_handle) => coordinator.reschedule(&refreshed, &old_handle).await,
            None => coordinator.schedule(&refreshed).await,
        };
        let schedule_failure = match schedule_result {
            Ok(handle) => {
                refreshed.notification_handle = Some(handle);
                None
            }
            Err(e) => {
                refreshed.notification_handle = None;
                Some(e)
            }
        };

        if let Err(e) = ctx.repos.reminders.replace(&identity, &refreshed).await {
            // Keep the trigger registry consistent with what is persisted
            if let Some(handle) = &refreshed.notification_handle {
                coordinator.cancel(handle).await;
            }
            return Err(UseCaseError::StorageError(e));
        }

        Ok(EditedReminder {
            reminder: refreshed,
            synced,
            schedule_failure,
        })
    }
}
