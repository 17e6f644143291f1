mod inmemory;
mod rest_api;

use chrono::{DateTime, TimeZone, Utc};
pub use inmemory::InMemoryRemoteMirror;
use lembra_domain::{Reminder, SyncStatus, ID};
pub use rest_api::RestRemoteMirror;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version of the `meta` snapshot layout. Bumped whenever the snapshot
/// gains or changes fields, so an old client never half-decodes a newer
/// row into a lossy record.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RemoteMirrorError {
    #[error("Remote mirror could not be reached: {0}")]
    Network(String),
    #[error("Remote mirror rejected the credentials")]
    Unauthorized,
    #[error("Remote mirror request failed with status {0}")]
    Server(u16),
    #[error("Remote mirror returned a malformed row: {0}")]
    Decode(String),
}

/// Full snapshot of the local record at push time, stored in the mirror's
/// `meta` column so reconstruction after a pull is total rather than a
/// best-effort merge of the narrow columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderSnapshot {
    pub schema_version: u32,
    pub ephemeral_id: ID,
    pub created_at: i64,
    pub notification_handle: Option<String>,
}

/// The writable columns of a remote reminder row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteReminderAttributes {
    pub title: String,
    pub notes: String,
    pub trigger_at: String,
    pub timezone: String,
    pub meta: ReminderSnapshot,
}

impl RemoteReminderAttributes {
    pub fn from_reminder(reminder: &Reminder) -> Self {
        Self {
            title: reminder.title.clone(),
            notes: reminder.notes.clone().unwrap_or_default(),
            trigger_at: Utc.timestamp_millis(reminder.trigger_at).to_rfc3339(),
            timezone: reminder.timezone.name().to_string(),
            meta: ReminderSnapshot {
                schema_version: SNAPSHOT_SCHEMA_VERSION,
                ephemeral_id: reminder.id.clone(),
                created_at: reminder.created_at,
                notification_handle: reminder.notification_handle.clone(),
            },
        }
    }
}

/// A row as returned by the remote mirror, columns plus server-assigned id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteReminderRow {
    pub id: String,
    pub title: String,
    pub notes: String,
    pub trigger_at: String,
    pub timezone: String,
    pub meta: ReminderSnapshot,
}

impl RemoteReminderRow {
    /// Rebuilds the local record this row mirrors. The result always
    /// carries the row's durable id and reports as `Synced`; the
    /// notification handle is left empty because trigger registrations are
    /// device-local state the mirror cannot vouch for.
    pub fn into_reminder(self) -> Result<Reminder, RemoteMirrorError> {
        if self.meta.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(RemoteMirrorError::Decode(format!(
                "Unsupported snapshot schema version: {}",
                self.meta.schema_version
            )));
        }

        let trigger_at = DateTime::parse_from_rfc3339(&self.trigger_at)
            .map(|dt| dt.with_timezone(&Utc).timestamp_millis())
            .map_err(|e| {
                RemoteMirrorError::Decode(format!(
                    "Row {} has a malformed trigger instant `{}`: {}",
                    self.id, self.trigger_at, e
                ))
            })?;
        let timezone = self.timezone.parse().map_err(|_| {
            RemoteMirrorError::Decode(format!(
                "Row {} has an unknown timezone `{}`",
                self.id, self.timezone
            ))
        })?;

        Ok(Reminder {
            id: self.meta.ephemeral_id,
            durable_id: Some(self.id),
            title: self.title,
            notes: if self.notes.is_empty() {
                None
            } else {
                Some(self.notes)
            },
            trigger_at,
            timezone,
            created_at: self.meta.created_at,
            notification_handle: None,
            sync_status: SyncStatus::Synced,
        })
    }
}

/// The authoritative remote table of reminders. Source of truth whenever
/// it is reachable; every operation may fail with `RemoteMirrorError` and
/// callers are expected to treat that as a retryable, non-fatal condition.
#[async_trait::async_trait]
pub trait IRemoteMirror: Send + Sync {
    /// Inserts a new row and returns the id the mirror assigned to it
    async fn insert(
        &self,
        attributes: &RemoteReminderAttributes,
    ) -> Result<String, RemoteMirrorError>;
    async fn update(
        &self,
        durable_id: &str,
        attributes: &RemoteReminderAttributes,
    ) -> Result<(), RemoteMirrorError>;
    async fn delete(&self, durable_id: &str) -> Result<(), RemoteMirrorError>;
    async fn fetch_all(&self) -> Result<Vec<RemoteReminderRow>, RemoteMirrorError>;
    /// Cheap reachability probe
    async fn ping(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use lembra_domain::ReminderIdentity;

    fn reminder() -> Reminder {
        Reminder {
            id: ID::new(),
            durable_id: None,
            title: "Standup".into(),
            notes: Some("Bring the burndown chart".into()),
            trigger_at: 1_760_000_000_000,
            timezone: "Europe/Oslo".parse::<Tz>().unwrap(),
            created_at: 1_750_000_000_000,
            notification_handle: Some("handle-1".into()),
            sync_status: SyncStatus::Local,
        }
    }

    #[test]
    fn row_reconstruction_is_lossless() {
        let original = reminder();
        let attributes = RemoteReminderAttributes::from_reminder(&original);
        let row = RemoteReminderRow {
            id: "17".into(),
            title: attributes.title,
            notes: attributes.notes,
            trigger_at: attributes.trigger_at,
            timezone: attributes.timezone,
            meta: attributes.meta,
        };

        let rebuilt = row.into_reminder().unwrap();
        assert_eq!(rebuilt.id, original.id);
        assert_eq!(rebuilt.durable_id.as_deref(), Some("17"));
        assert_eq!(rebuilt.title, original.title);
        assert_eq!(rebuilt.notes, original.notes);
        assert_eq!(rebuilt.trigger_at, original.trigger_at);
        assert_eq!(rebuilt.timezone, original.timezone);
        assert_eq!(rebuilt.created_at, original.created_at);
        assert_eq!(rebuilt.sync_status, SyncStatus::Synced);
        // Trigger registrations are device local and never travel back
        assert!(rebuilt.notification_handle.is_none());
    }

    #[test]
    fn unknown_snapshot_version_is_rejected() {
        let mut attributes = RemoteReminderAttributes::from_reminder(&reminder());
        attributes.meta.schema_version = SNAPSHOT_SCHEMA_VERSION + 1;
        let row = RemoteReminderRow {
            id: "17".into(),
            title: attributes.title,
            notes: attributes.notes,
            trigger_at: attributes.trigger_at,
            timezone: attributes.timezone,
            meta: attributes.meta,
        };

        match row.into_reminder() {
            Err(RemoteMirrorError::Decode(_)) => {}
            other => panic!("expected Decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn inmemory_mirror_assigns_ids_and_round_trips() {
        let mirror = InMemoryRemoteMirror::new();
        let original = reminder();

        let id = mirror
            .insert(&RemoteReminderAttributes::from_reminder(&original))
            .await
            .unwrap();

        let rows = mirror.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        let rebuilt = rows.into_iter().next().unwrap().into_reminder().unwrap();
        assert!(rebuilt.is_identified_by(&ReminderIdentity::Durable(id)));
        assert_eq!(rebuilt.title, original.title);
    }

    #[tokio::test]
    async fn unavailable_mirror_fails_every_operation() {
        let mirror = InMemoryRemoteMirror::new();
        mirror.set_available(false);

        let attributes = RemoteReminderAttributes::from_reminder(&reminder());
        assert!(mirror.insert(&attributes).await.is_err());
        assert!(mirror.fetch_all().await.is_err());
        assert!(mirror.delete("1").await.is_err());
        assert!(!mirror.ping().await);
    }
}
