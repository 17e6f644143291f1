mod reminder;

pub use reminder::{FileReminderStore, IReminderStore, InMemoryReminderStore, StoreError};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderStore>,
}

impl Repos {
    pub async fn create_file_backed(storage_path: PathBuf) -> Result<Self, StoreError> {
        Ok(Self {
            reminders: Arc::new(FileReminderStore::load(storage_path).await?),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderStore::new()),
        }
    }
}
