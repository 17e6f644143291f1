use lembra_domain::Reminder;
use lembra_infra::{LembraContext, ScheduledTrigger, TriggerRequest};
use thiserror::Error;
use tracing::warn;

const FALLBACK_SHIFT_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// The trigger instant was in the past and remained in the past after the
/// single 24 hour fallback shift.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "Trigger instant {requested} is still in the past after a 24 hour shift to {shifted} (now: {now})"
)]
pub struct UnschedulableError {
    pub requested: i64,
    pub shifted: i64,
    pub now: i64,
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Unschedulable(#[from] UnschedulableError),
    #[error("The trigger scheduling capability failed: {0}")]
    Capability(String),
}

/// Keeps at most one active device trigger per reminder by funneling every
/// registration and cancellation through one place.
pub struct NotificationCoordinator<'a> {
    ctx: &'a LembraContext,
}

impl<'a> NotificationCoordinator<'a> {
    pub fn new(ctx: &'a LembraContext) -> Self {
        Self { ctx }
    }

    /// Registers a trigger for the reminder and returns the capability's
    /// handle. A past trigger instant is shifted forward by 24 hours
    /// exactly once; if it is still not in the future the reminder is
    /// unschedulable. The caller must persist the returned handle on the
    /// record.
    pub async fn schedule(&self, reminder: &Reminder) -> Result<String, ScheduleError> {
        let now = self.ctx.sys.get_timestamp_millis();
        let mut fire_at = reminder.trigger_at;
        if fire_at <= now {
            let shifted = fire_at + FALLBACK_SHIFT_MILLIS;
            if shifted <= now {
                return Err(UnschedulableError {
                    requested: reminder.trigger_at,
                    shifted,
                    now,
                }
                .into());
            }
            warn!(
                "Trigger instant {} of reminder {} is in the past, shifting it 24 hours to {}",
                fire_at, reminder.id, shifted
            );
            fire_at = shifted;
        }

        let request = TriggerRequest {
            title: reminder.title.clone(),
            body: reminder
                .notes
                .clone()
                .unwrap_or_else(|| "Reminder".to_string()),
            fire_at,
            reminder_id: reminder.id.clone(),
        };

        self.ctx
            .triggers
            .schedule(&request)
            .await
            .map_err(|e| ScheduleError::Capability(e.to_string()))
    }

    /// Cancelling an already-fired or already-cancelled handle is a no-op.
    pub async fn cancel(&self, handle: &str) {
        if let Err(e) = self.ctx.triggers.cancel(handle).await {
            warn!("Unable to cancel trigger {}: {:?}", handle, e);
        }
    }

    /// Cancels the old trigger, then registers a new one. When the second
    /// step fails the old trigger is not restored: the reminder is left
    /// with no active trigger, never with two.
    pub async fn reschedule(
        &self,
        reminder: &Reminder,
        old_handle: &str,
    ) -> Result<String, ScheduleError> {
        self.cancel(old_handle).await;
        self.schedule(reminder).await
    }

    /// Drops every registered trigger. Callers own clearing the
    /// `notification_handle` fields of affected records.
    pub async fn cancel_all(&self) {
        if let Err(e) = self.ctx.triggers.cancel_all().await {
            warn!("Unable to cancel all triggers: {:?}", e);
        }
    }

    pub async fn list_active(&self) -> Vec<ScheduledTrigger> {
        self.ctx.triggers.list_active().await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::UTC;
    use lembra_domain::{SyncStatus, ID};
    use lembra_infra::StaticTimeSys;
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000_000;
    const HOUR: i64 = 60 * 60 * 1000;

    fn setup() -> LembraContext {
        let ctx = LembraContext::create_inmemory();
        LembraContext {
            sys: Arc::new(StaticTimeSys(NOW)),
            ..ctx
        }
    }

    fn reminder_at(trigger_at: i64) -> Reminder {
        Reminder {
            id: ID::new(),
            durable_id: None,
            title: "Stretch".into(),
            notes: None,
            trigger_at,
            timezone: UTC,
            created_at: NOW,
            notification_handle: None,
            sync_status: SyncStatus::Local,
        }
    }

    #[tokio::test]
    async fn schedules_future_instant_as_requested() {
        let ctx = setup();
        let coordinator = NotificationCoordinator::new(&ctx);

        let handle = coordinator.schedule(&reminder_at(NOW + HOUR)).await.unwrap();

        let active = coordinator.list_active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].handle, handle);
        assert_eq!(active[0].request.fire_at, NOW + HOUR);
    }

    #[tokio::test]
    async fn past_instant_gets_one_day_shift() {
        let ctx = setup();
        let coordinator = NotificationCoordinator::new(&ctx);

        let requested = NOW - 60 * 1000;
        coordinator.schedule(&reminder_at(requested)).await.unwrap();

        let active = coordinator.list_active().await;
        assert_eq!(active[0].request.fire_at, requested + 24 * HOUR);
    }

    #[tokio::test]
    async fn far_past_instant_is_unschedulable() {
        let ctx = setup();
        let coordinator = NotificationCoordinator::new(&ctx);

        let res = coordinator.schedule(&reminder_at(NOW - 25 * HOUR)).await;

        match res {
            Err(ScheduleError::Unschedulable(e)) => {
                assert_eq!(e.requested, NOW - 25 * HOUR);
                assert_eq!(e.shifted, NOW - HOUR);
            }
            other => panic!("expected Unschedulable, got {:?}", other),
        }
        assert!(coordinator.list_active().await.is_empty());
    }

    #[tokio::test]
    async fn reschedule_never_leaves_two_triggers() {
        let ctx = setup();
        let coordinator = NotificationCoordinator::new(&ctx);

        let reminder = reminder_at(NOW + HOUR);
        let first = coordinator.schedule(&reminder).await.unwrap();
        let second = coordinator.reschedule(&reminder, &first).await.unwrap();

        let active = coordinator.list_active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].handle, second);
    }

    #[tokio::test]
    async fn failed_reschedule_leaves_no_trigger() {
        let ctx = setup();
        let coordinator = NotificationCoordinator::new(&ctx);

        let handle = coordinator.schedule(&reminder_at(NOW + HOUR)).await.unwrap();
        let res = coordinator
            .reschedule(&reminder_at(NOW - 25 * HOUR), &handle)
            .await;

        assert!(res.is_err());
        assert!(coordinator.list_active().await.is_empty());
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let ctx = setup();
        let coordinator = NotificationCoordinator::new(&ctx);

        let handle = coordinator.schedule(&reminder_at(NOW + HOUR)).await.unwrap();
        coordinator.cancel(&handle).await;
        coordinator.cancel(&handle).await;
        coordinator.cancel("never-issued").await;

        assert!(coordinator.list_active().await.is_empty());
    }
}
