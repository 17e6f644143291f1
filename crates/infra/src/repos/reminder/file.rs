use super::{IReminderStore, StoreError};
use lembra_domain::{Reminder, ReminderIdentity};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::warn;

/// Store backed by a single JSON blob on disk holding the full ordered list
/// of records.
///
/// The mutex guards the whole read-modify-write cycle, not just the final
/// write: the in-memory working copy is only swapped in after the new blob
/// has been flushed, so a failed flush leaves the previously committed list
/// untouched.
pub struct FileReminderStore {
    path: PathBuf,
    reminders: Mutex<Vec<Reminder>>,
}

impl FileReminderStore {
    /// Reads the persisted blob, treating a corrupt payload as an empty
    /// list so a previous bad write cannot make the store permanently
    /// unusable.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let reminders = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<Reminder>>(&bytes) {
                Ok(reminders) => reminders,
                Err(e) => {
                    warn!(
                        "Persisted reminder payload at {:?} could not be decoded, starting empty: {}",
                        path, e
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Persistence(format!(
                    "Unable to read reminder storage at {:?}: {}",
                    path, e
                )))
            }
        };

        Ok(Self {
            path,
            reminders: Mutex::new(reminders),
        })
    }

    async fn flush(&self, reminders: &[Reminder]) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(reminders).map_err(|e| {
            StoreError::Persistence(format!("Unable to encode reminder list: {}", e))
        })?;

        // Write to a sibling file and rename, so a crash mid-write cannot
        // leave a half-written blob as the committed state.
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, &payload).await.map_err(|e| {
            StoreError::Persistence(format!(
                "Unable to write reminder storage at {:?}: {}",
                tmp_path, e
            ))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            StoreError::Persistence(format!(
                "Unable to commit reminder storage at {:?}: {}",
                self.path, e
            ))
        })
    }
}

#[async_trait::async_trait]
impl IReminderStore for FileReminderStore {
    async fn append(&self, reminder: &Reminder) -> Result<(), StoreError> {
        let mut reminders = self.reminders.lock().await;
        let mut updated = reminders.clone();
        updated.push(reminder.clone());
        self.flush(&updated).await?;
        *reminders = updated;
        Ok(())
    }

    async fn list(&self) -> Vec<Reminder> {
        self.reminders.lock().await.clone()
    }

    async fn find_by(&self, identity: &ReminderIdentity) -> Option<Reminder> {
        let reminders = self.reminders.lock().await;
        reminders
            .iter()
            .find(|r| r.is_identified_by(identity))
            .cloned()
    }

    async fn replace(
        &self,
        identity: &ReminderIdentity,
        updated_record: &Reminder,
    ) -> Result<(), StoreError> {
        let mut reminders = self.reminders.lock().await;
        let position = reminders.iter().position(|r| r.is_identified_by(identity));
        let i = match position {
            Some(i) => i,
            None => return Err(StoreError::NotFound(identity.clone())),
        };

        let mut updated = reminders.clone();
        updated[i] = updated_record.clone();
        self.flush(&updated).await?;
        *reminders = updated;
        Ok(())
    }

    async fn remove(&self, identity: &ReminderIdentity) -> Result<(), StoreError> {
        let mut reminders = self.reminders.lock().await;
        let mut updated = reminders.clone();
        updated.retain(|r| !r.is_identified_by(identity));
        if updated.len() == reminders.len() {
            return Ok(());
        }
        self.flush(&updated).await?;
        *reminders = updated;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut reminders = self.reminders.lock().await;
        self.flush(&[]).await?;
        reminders.clear();
        Ok(())
    }
}
