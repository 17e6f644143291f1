use crate::shared::entity::{ReminderIdentity, ID};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Where a `Reminder` stands with respect to the remote mirror.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SyncStatus {
    /// Never reached the remote mirror
    Local,
    /// `durable_id` is assigned and the last known remote copy matches
    Synced,
    /// Edited locally after having been synced, remote update pending
    Dirty,
}

/// A `Reminder` is a single scheduled notification intent: a title and an
/// absolute trigger instant, cached locally and mirrored to the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Assigned at local creation time, unique within the store
    pub id: ID,
    /// Assigned by the remote mirror on the first successful insert.
    /// Once present it is never cleared except by deletion.
    pub durable_id: Option<String>,
    pub title: String,
    pub notes: Option<String>,
    /// The instant the reminder should fire, in millis since the epoch.
    pub trigger_at: i64,
    /// The timezone the trigger instant was expressed in. Carried for
    /// display only, scheduling always operates on `trigger_at`.
    pub timezone: Tz,
    pub created_at: i64,
    /// Token returned by the device trigger capability. Present exactly
    /// while an active trigger is registered for this record.
    pub notification_handle: Option<String>,
    pub sync_status: SyncStatus,
}

impl Reminder {
    pub fn is_identified_by(&self, identity: &ReminderIdentity) -> bool {
        match identity {
            ReminderIdentity::Ephemeral(id) => self.id == *id,
            ReminderIdentity::Durable(durable_id) => {
                self.durable_id.as_deref() == Some(durable_id.as_str())
            }
        }
    }

    /// True when the given record describes the same content as this one,
    /// ignoring sync bookkeeping and the notification handle.
    pub fn same_content(&self, other: &Reminder) -> bool {
        self.title == other.title
            && self.notes == other.notes
            && self.trigger_at == other.trigger_at
            && self.timezone == other.timezone
    }
}

/// Field updates applied by the edit flow. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub notes: Option<String>,
    /// New trigger instant as an RFC 3339 datetime string
    pub datetime_iso: Option<String>,
}

impl ReminderPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.notes.is_none() && self.datetime_iso.is_none()
    }
}
