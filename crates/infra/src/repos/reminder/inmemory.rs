use super::{IReminderStore, StoreError};
use lembra_domain::{Reminder, ReminderIdentity};
use std::sync::Mutex;

/// Store backed by a plain in-process list. Used by tests and as the
/// cold-start fallback when no storage path is configured.
pub struct InMemoryReminderStore {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryReminderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderStore for InMemoryReminderStore {
    async fn append(&self, reminder: &Reminder) -> Result<(), StoreError> {
        let mut reminders = self.reminders.lock().unwrap();
        reminders.push(reminder.clone());
        Ok(())
    }

    async fn list(&self) -> Vec<Reminder> {
        self.reminders.lock().unwrap().clone()
    }

    async fn find_by(&self, identity: &ReminderIdentity) -> Option<Reminder> {
        let reminders = self.reminders.lock().unwrap();
        reminders
            .iter()
            .find(|r| r.is_identified_by(identity))
            .cloned()
    }

    async fn replace(
        &self,
        identity: &ReminderIdentity,
        updated: &Reminder,
    ) -> Result<(), StoreError> {
        let mut reminders = self.reminders.lock().unwrap();
        for i in 0..reminders.len() {
            if reminders[i].is_identified_by(identity) {
                reminders[i] = updated.clone();
                return Ok(());
            }
        }
        Err(StoreError::NotFound(identity.clone()))
    }

    async fn remove(&self, identity: &ReminderIdentity) -> Result<(), StoreError> {
        let mut reminders = self.reminders.lock().unwrap();
        reminders.retain(|r| !r.is_identified_by(identity));
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.reminders.lock().unwrap().clear();
        Ok(())
    }
}
