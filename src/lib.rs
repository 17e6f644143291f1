//! Offline-first persistence and sync layer for a personal reminder
//! assistant. A chat or calendar UI hands this crate parsed reminder
//! drafts; the crate keeps the local cache, the remote mirror and the
//! device trigger registry consistent with each other, tolerating the
//! network going away at any point.

mod telemetry;

use lembra_core::{
    execute, ClearRemindersUseCase, CreateReminderUseCase, DeleteReminderUseCase,
    EditReminderUseCase, GetReminderUseCase, ListRemindersUseCase, ResyncRemindersUseCase,
    start_resync_job,
};
pub use lembra_core::{
    CreatedReminder, EditedReminder, LembraError, NotificationCoordinator, ScheduleError,
    SyncReconciler, UnschedulableError,
};
pub use lembra_domain::{DraftReminder, Reminder, ReminderIdentity, ReminderPatch, SyncStatus, ID};
pub use lembra_infra::{
    setup_context, Config, INotificationScheduler, IRemoteMirror, IReminderStore,
    InMemoryNotificationScheduler, InMemoryRemoteMirror, InMemoryReminderStore, LembraContext,
    ScheduledTrigger, TriggerRequest,
};
pub use telemetry::{get_subscriber, init_subscriber};

/// The surface exposed to the UI layer. Every operation succeeds or fails
/// on its local effect; remote sync and trigger registration degrade
/// gracefully and are reported alongside the result, never as a failure of
/// the operation itself.
pub struct ReminderAssistant {
    ctx: LembraContext,
}

impl ReminderAssistant {
    pub fn new(ctx: LembraContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &LembraContext {
        &self.ctx
    }

    /// Persist a parsed draft, mirror it remotely and register its device
    /// trigger. The returned record carries whatever durable id and
    /// notification handle could be obtained in this call.
    pub async fn create_reminder(
        &self,
        draft: DraftReminder,
    ) -> Result<CreatedReminder, LembraError> {
        execute(CreateReminderUseCase { draft }, &self.ctx)
            .await
            .map_err(LembraError::from)
    }

    /// All current reminders ordered by trigger instant, refreshed from
    /// the remote mirror when it is reachable.
    pub async fn list_reminders(&self) -> Result<Vec<Reminder>, LembraError> {
        execute(ListRemindersUseCase, &self.ctx)
            .await
            .map_err(LembraError::from)
    }

    /// Look up a record by a raw identifier, trying the ephemeral id
    /// before the durable one.
    pub async fn find_reminder(&self, raw_identity: &str) -> Result<Reminder, LembraError> {
        execute(
            GetReminderUseCase {
                raw_identity: raw_identity.to_string(),
            },
            &self.ctx,
        )
        .await
        .map_err(LembraError::from)
    }

    pub async fn edit_reminder(
        &self,
        identity: ReminderIdentity,
        patch: ReminderPatch,
    ) -> Result<EditedReminder, LembraError> {
        execute(EditReminderUseCase { identity, patch }, &self.ctx)
            .await
            .map_err(LembraError::from)
    }

    /// Cascading delete: trigger, remote copy, local record. Returns the
    /// removed record, or `None` when the identity was already gone.
    pub async fn delete_reminder(
        &self,
        identity: ReminderIdentity,
    ) -> Result<Option<Reminder>, LembraError> {
        execute(DeleteReminderUseCase { identity }, &self.ctx)
            .await
            .map_err(LembraError::from)
    }

    /// Retry every record the remote mirror has not confirmed yet and
    /// report how many synced in this sweep.
    pub async fn resync(&self) -> usize {
        execute(ResyncRemindersUseCase, &self.ctx)
            .await
            .unwrap_or(0)
    }

    /// Drop the local cache and all registered triggers. The remote
    /// mirror keeps its rows.
    pub async fn clear_local(&self) -> Result<(), LembraError> {
        execute(ClearRemindersUseCase, &self.ctx)
            .await
            .map_err(LembraError::from)
    }

    pub async fn remote_reachable(&self) -> bool {
        self.ctx.remote.ping().await
    }

    /// Start the periodic background sweep on the current runtime.
    pub fn start_background_sync(&self) {
        start_resync_job(self.ctx.clone());
    }
}
