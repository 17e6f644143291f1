use futures::future::join_all;
use lembra_domain::{Reminder, ReminderIdentity, SyncStatus};
use lembra_infra::{LembraContext, RemoteMirrorError, RemoteReminderAttributes, StoreError};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PullError {
    #[error(transparent)]
    Remote(#[from] RemoteMirrorError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Moves records between the local store and the remote mirror. Remote
/// failures are swallowed here and reported as plain booleans: the store
/// keeps at least one copy of every record at all times, and anything that
/// never reached the mirror is retried by a later sweep.
pub struct SyncReconciler<'a> {
    ctx: &'a LembraContext,
}

impl<'a> SyncReconciler<'a> {
    pub fn new(ctx: &'a LembraContext) -> Self {
        Self { ctx }
    }

    /// First insert of a record the mirror has never seen. On success the
    /// stored record gains the assigned durable id. `Synced` is recorded
    /// only after the mirror confirmed the insert, never optimistically,
    /// and only if the record was not edited while the insert was in
    /// flight.
    pub async fn push(&self, reminder: &Reminder) -> bool {
        let attributes = RemoteReminderAttributes::from_reminder(reminder);
        let durable_id = match self.ctx.remote.insert(&attributes).await {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    "Unable to push reminder {} to the remote mirror: {}",
                    reminder.id, e
                );
                return false;
            }
        };

        let identity = ReminderIdentity::Ephemeral(reminder.id.clone());
        match self.ctx.repos.reminders.find_by(&identity).await {
            Some(mut current) => {
                current.durable_id = Some(durable_id);
                current.sync_status = if current.same_content(reminder) {
                    SyncStatus::Synced
                } else {
                    // An edit won the race; the newer content still needs
                    // a remote update
                    SyncStatus::Dirty
                };
                let synced = current.sync_status == SyncStatus::Synced;
                if let Err(e) = self.ctx.repos.reminders.replace(&identity, &current).await {
                    warn!(
                        "Unable to record durable id for reminder {}: {}",
                        reminder.id, e
                    );
                    return false;
                }
                synced
            }
            None => {
                // Deleted while the insert was in flight; take the remote
                // copy down again to finish that delete's cascade
                if let Err(e) = self.ctx.remote.delete(&durable_id).await {
                    warn!(
                        "Unable to remove remote copy {} of a deleted reminder: {}",
                        durable_id, e
                    );
                }
                false
            }
        }
    }

    /// Remote update for a record that has synced before. A record with no
    /// durable id has nothing to update remotely, which is not an error,
    /// it simply stays local until the next sweep inserts it.
    pub async fn push_update(&self, reminder: &Reminder) -> bool {
        let durable_id = match &reminder.durable_id {
            Some(id) => id.clone(),
            None => return false,
        };

        let attributes = RemoteReminderAttributes::from_reminder(reminder);
        if let Err(e) = self.ctx.remote.update(&durable_id, &attributes).await {
            warn!(
                "Unable to push update for reminder {} to the remote mirror: {}",
                reminder.id, e
            );
            return false;
        }

        let identity = ReminderIdentity::Durable(durable_id);
        match self.ctx.repos.reminders.find_by(&identity).await {
            Some(mut current) if current.same_content(reminder) => {
                if current.sync_status != SyncStatus::Synced {
                    current.sync_status = SyncStatus::Synced;
                    if let Err(e) = self.ctx.repos.reminders.replace(&identity, &current).await {
                        warn!(
                            "Unable to mark reminder {} as synced: {}",
                            reminder.id, e
                        );
                        return false;
                    }
                }
                true
            }
            // Edited or deleted while the update was in flight
            _ => false,
        }
    }

    /// Removes the remote copy as part of a delete cascade. No durable id
    /// means the mirror never saw the record and there is nothing to do.
    pub async fn push_delete(&self, durable_id: Option<&str>) -> bool {
        let durable_id = match durable_id {
            Some(id) => id,
            None => return true,
        };
        match self.ctx.remote.delete(durable_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Unable to remove remote copy {}: {}", durable_id, e);
                false
            }
        }
    }

    /// Reconciles the full remote list into the store. Records the mirror
    /// knows replace their local equivalent (the mirror is authoritative),
    /// records the mirror has never seen are preserved untouched, so a
    /// pull can never discard offline-created reminders.
    pub async fn pull(&self) -> Result<(), PullError> {
        let rows = self.ctx.remote.fetch_all().await?;
        let locals = self.ctx.repos.reminders.list().await;

        let mut remote_ids = Vec::with_capacity(rows.len());
        for row in rows {
            let durable_id = row.id.clone();
            // The row exists remotely even if it cannot be decoded, so it
            // must never count as gone
            remote_ids.push(durable_id.clone());
            let mut incoming = match row.into_reminder() {
                Ok(reminder) => reminder,
                Err(e) => {
                    warn!("Skipping remote row during pull: {}", e);
                    continue;
                }
            };

            let identity = ReminderIdentity::Durable(durable_id);
            match locals.iter().find(|l| l.is_identified_by(&identity)) {
                Some(local) => {
                    // Trigger registrations are device local, keep ours
                    incoming.notification_handle = local.notification_handle.clone();
                    match self.ctx.repos.reminders.replace(&identity, &incoming).await {
                        Ok(()) => {}
                        Err(StoreError::NotFound(_)) => {
                            // Deleted between the snapshot and the write
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                None => self.ctx.repos.reminders.append(&incoming).await?,
            }
        }

        // Durable records the mirror no longer lists are gone for good
        for local in locals {
            if let Some(durable_id) = &local.durable_id {
                if !remote_ids.iter().any(|id| id == durable_id) {
                    self.ctx
                        .repos
                        .reminders
                        .remove(&ReminderIdentity::Durable(durable_id.clone()))
                        .await?;
                }
            }
        }

        Ok(())
    }

    /// Retries every record that never reached the mirror, isolating
    /// per-record failures. Returns how many records became `Synced` in
    /// this sweep.
    pub async fn resync_all(&self) -> usize {
        let pending: Vec<Reminder> = self
            .ctx
            .repos
            .reminders
            .list()
            .await
            .into_iter()
            .filter(|r| r.sync_status != SyncStatus::Synced)
            .collect();

        let results = join_all(pending.iter().map(|r| self.sync_pending(r))).await;
        results.into_iter().filter(|synced| *synced).count()
    }

    async fn sync_pending(&self, reminder: &Reminder) -> bool {
        match reminder.durable_id {
            None => self.push(reminder).await,
            Some(_) => self.push_update(reminder).await,
        }
    }
}
