use crate::error::LembraError;
use crate::notification::{NotificationCoordinator, ScheduleError};
use crate::shared::usecase::UseCase;
use crate::sync::SyncReconciler;
use chrono_tz::Tz;
use lembra_domain::{DraftReminder, Reminder, ReminderIdentity, SyncStatus, ID};
use lembra_infra::{LembraContext, StoreError};
use tracing::warn;

/// Turns a validated draft from the parsing collaborator into a persisted,
/// mirrored and scheduled reminder. Local persistence is the only hard
/// requirement: remote push and trigger registration are attempted in the
/// same call but their failures only degrade the response.
#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub draft: DraftReminder,
}

#[derive(Debug)]
pub struct CreatedReminder {
    pub reminder: Reminder,
    /// Whether the record reached the remote mirror in this call
    pub synced: bool,
    /// Present when no trigger could be registered; the record is still
    /// persisted
    pub schedule_failure: Option<ScheduleError>,
}

#[derive(Debug)]
pub enum UseCaseError {
    RejectedDraft(String),
    EmptyTitle,
    InvalidTriggerInstant(String),
    StorageError(StoreError),
}

impl From<UseCaseError> for LembraError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::RejectedDraft(reason) => Self::BadClientData(format!(
                "The draft was rejected by the parser: {}",
                reason
            )),
            UseCaseError::EmptyTitle => {
                Self::BadClientData("A reminder needs a non-empty title".into())
            }
            UseCaseError::InvalidTriggerInstant(e) => Self::BadClientData(format!(
                "The draft trigger instant could not be parsed: {}",
                e
            )),
            UseCaseError::StorageError(e) => Self::Storage(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for CreateReminderUseCase {
    type Response = CreatedReminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &LembraContext) -> Result<Self::Response, Self::Error> {
        if !self.draft.success {
            let reason = self
                .draft
                .error
                .clone()
                .unwrap_or_else(|| "Parser reported failure without a reason".to_string());
            return Err(UseCaseError::RejectedDraft(reason));
        }

        let title = self.draft.title.trim();
        if title.is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }

        let trigger_at = self
            .draft
            .trigger_instant()
            .map_err(|e| UseCaseError::InvalidTriggerInstant(e.to_string()))?
            .timestamp_millis();

        let timezone = match self.draft.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "Draft carries unknown timezone `{}`, falling back to UTC",
                    self.draft.timezone
                );
                chrono_tz::UTC
            }
        };

        let reminder = Reminder {
            id: ID::new(),
            durable_id: None,
            title: title.to_string(),
            notes: self.draft.notes.clone().filter(|n| !n.is_empty()),
            trigger_at,
            timezone,
            created_at: ctx.sys.get_timestamp_millis(),
            notification_handle: None,
            sync_status: SyncStatus::Local,
        };

        ctx.repos
            .reminders
            .append(&reminder)
            .await
            .map_err(UseCaseError::StorageError)?;

        // Committed locally; everything below degrades instead of failing
        let synced = SyncReconciler::new(ctx).push(&reminder).await;

        let identity = ReminderIdentity::Ephemeral(reminder.id.clone());
        let coordinator = NotificationCoordinator::new(ctx);
        let schedule_failure = match coordinator.schedule(&reminder).await {
            Ok(handle) => match ctx.repos.reminders.find_by(&identity).await {
                Some(mut current) => {
                    current.notification_handle = Some(handle.clone());
                    if let Err(e) = ctx.repos.reminders.replace(&identity, &current).await {
                        warn!(
                            "Unable to record notification handle for reminder {}: {}",
                            reminder.id, e
                        );
                        // Keep the registry consistent with what persisted
                        coordinator.cancel(&handle).await;
                    }
                    None
                }
                None => {
                    // Deleted while the trigger was being registered
                    coordinator.cancel(&handle).await;
                    None
                }
            },
            Err(e) => Some(e),
        };

        let reminder = ctx
            .repos
            .reminders
            .find_by(&identity)
            .await
            .unwrap_or(reminder);

        Ok(CreatedReminder {
            reminder,
            synced,
            schedule_failure,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::{Duration, Utc};
    use lembra_infra::InMemoryRemoteMirror;
    use std::sync::Arc;

    struct TestContext {
        ctx: LembraContext,
        remote: Arc<InMemoryRemoteMirror>,
    }

    fn setup() -> TestContext {
        let remote = Arc::new(InMemoryRemoteMirror::new());
        let ctx = LembraContext::create_inmemory();
        let ctx = LembraContext {
            remote: remote.clone(),
            ..ctx
        };
        TestContext { ctx, remote }
    }

    fn draft(title: &str) -> DraftReminder {
        DraftReminder {
            title: title.into(),
            notes: Some("Before lunch".into()),
            datetime_iso: (Utc::now() + Duration::hours(2)).to_rfc3339(),
            timezone: "Europe/Oslo".into(),
            success: true,
            error: None,
        }
    }

    #[tokio::test]
    async fn creates_synced_and_scheduled_reminder() {
        let TestContext { ctx, .. } = setup();

        let usecase = CreateReminderUseCase {
            draft: draft("Call the dentist"),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert!(res.synced);
        assert!(res.schedule_failure.is_none());
        assert!(res.reminder.durable_id.is_some());
        assert!(res.reminder.notification_handle.is_some());
        assert_eq!(res.reminder.sync_status, SyncStatus::Synced);
    }

    #[tokio::test]
    async fn creation_persists_locally_when_mirror_is_unreachable() {
        let TestContext { ctx, remote } = setup();
        remote.set_available(false);

        let usecase = CreateReminderUseCase {
            draft: draft("Water the plants"),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert!(!res.synced);
        assert!(res.reminder.durable_id.is_none());
        assert_eq!(res.reminder.sync_status, SyncStatus::Local);
        // The trigger registration does not depend on the network
        assert!(res.reminder.notification_handle.is_some());

        let stored = ctx.repos.reminders.list().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Water the plants");
    }

    #[tokio::test]
    async fn round_trips_draft_fields() {
        let TestContext { ctx, .. } = setup();

        let d = draft("Ship the release");
        let expected_trigger = d.trigger_instant().unwrap().timestamp_millis();
        let usecase = CreateReminderUseCase { draft: d };
        let res = execute(usecase, &ctx).await.unwrap();

        let stored = ctx
            .repos
            .reminders
            .find_by(&ReminderIdentity::Ephemeral(res.reminder.id.clone()))
            .await
            .unwrap();
        assert_eq!(stored.title, "Ship the release");
        assert_eq!(stored.notes.as_deref(), Some("Before lunch"));
        assert_eq!(stored.trigger_at, expected_trigger);
        assert_eq!(stored.timezone.name(), "Europe/Oslo");
    }

    #[tokio::test]
    async fn rejects_unsuccessful_draft() {
        let TestContext { ctx, .. } = setup();

        let usecase = CreateReminderUseCase {
            draft: DraftReminder {
                title: String::new(),
                notes: None,
                datetime_iso: String::new(),
                timezone: "UTC".into(),
                success: false,
                error: Some("No time found in the request".into()),
            },
        };
        let res = execute(usecase, &ctx).await;

        match res {
            Err(UseCaseError::RejectedDraft(reason)) => {
                assert!(reason.contains("No time found"))
            }
            other => panic!("expected RejectedDraft, got {:?}", other),
        }
        assert!(ctx.repos.reminders.list().await.is_empty());
    }

    #[tokio::test]
    async fn rejects_blank_title() {
        let TestContext { ctx, .. } = setup();

        let mut d = draft("   ");
        d.title = "   ".into();
        let res = execute(CreateReminderUseCase { draft: d }, &ctx).await;

        assert!(matches!(res, Err(UseCaseError::EmptyTitle)));
    }

    #[tokio::test]
    async fn rejects_malformed_trigger_instant() {
        let TestContext { ctx, .. } = setup();

        let mut d = draft("Check servers");
        d.datetime_iso = "next tuesday".into();
        let res = execute(CreateReminderUseCase { draft: d }, &ctx).await;

        assert!(matches!(res, Err(UseCaseError::InvalidTriggerInstant(_))));
        assert!(ctx.repos.reminders.list().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_timezone_falls_back_to_utc() {
        let TestContext { ctx, .. } = setup();

        let mut d = draft("Check servers");
        d.timezone = "Mars/Olympus_Mons".into();
        let res = execute(CreateReminderUseCase { draft: d }, &ctx)
            .await
            .unwrap();

        assert_eq!(res.reminder.timezone, chrono_tz::UTC);
    }
}
