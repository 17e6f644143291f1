mod file;
mod inmemory;

pub use file::FileReminderStore;
pub use inmemory::InMemoryReminderStore;
use lembra_domain::{Reminder, ReminderIdentity};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying medium could not be read or written. The caller must
    /// assume the mutation did not happen.
    #[error("Local reminder storage is unavailable: {0}")]
    Persistence(String),
    #[error("No reminder found for identity {0}")]
    NotFound(ReminderIdentity),
}

/// Durable local cache of `Reminder` records. The single source of truth
/// whenever the remote mirror is unreachable.
///
/// Implementations serialize every mutation across the whole
/// read-modify-write cycle, so overlapping calls against the same store
/// cannot drop each other's change.
#[async_trait::async_trait]
pub trait IReminderStore: Send + Sync {
    async fn append(&self, reminder: &Reminder) -> Result<(), StoreError>;
    async fn list(&self) -> Vec<Reminder>;
    async fn find_by(&self, identity: &ReminderIdentity) -> Option<Reminder>;
    /// Replaces the record matching `identity` wholesale. Fails with
    /// `NotFound` when the identity is absent, it never inserts.
    async fn replace(&self, identity: &ReminderIdentity, updated: &Reminder)
        -> Result<(), StoreError>;
    /// Removing an absent identity is a no-op, so deletes stay idempotent.
    async fn remove(&self, identity: &ReminderIdentity) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::UTC;
    use lembra_domain::{SyncStatus, ID};
    use std::sync::Arc;

    fn reminder(title: &str) -> Reminder {
        Reminder {
            id: ID::new(),
            durable_id: None,
            title: title.into(),
            notes: None,
            trigger_at: 1_700_000_000_000,
            timezone: UTC,
            created_at: 1_699_999_000_000,
            notification_handle: None,
            sync_status: SyncStatus::Local,
        }
    }

    async fn stores(dir: &tempfile::TempDir) -> Vec<Arc<dyn IReminderStore>> {
        let path = dir.path().join("reminders.json");
        vec![
            Arc::new(InMemoryReminderStore::new()),
            Arc::new(FileReminderStore::load(path).await.unwrap()),
        ]
    }

    #[tokio::test]
    async fn append_then_find_by_either_identity() {
        let dir = tempfile::tempdir().unwrap();
        for store in stores(&dir).await {
            let mut r = reminder("Water the plants");
            r.durable_id = Some("42".into());
            store.append(&r).await.unwrap();

            let by_ephemeral = store
                .find_by(&ReminderIdentity::Ephemeral(r.id.clone()))
                .await
                .expect("to find by ephemeral id");
            assert_eq!(by_ephemeral.title, r.title);

            let by_durable = store
                .find_by(&ReminderIdentity::Durable("42".into()))
                .await
                .expect("to find by durable id");
            assert_eq!(by_durable.id, r.id);
        }
    }

    #[tokio::test]
    async fn replace_rejects_unknown_identity() {
        let dir = tempfile::tempdir().unwrap();
        for store in stores(&dir).await {
            let r = reminder("Ghost");
            let res = store
                .replace(&ReminderIdentity::Ephemeral(r.id.clone()), &r)
                .await;
            match res {
                Err(StoreError::NotFound(_)) => {}
                other => panic!("expected NotFound, got {:?}", other),
            }
            assert!(store.list().await.is_empty());
        }
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        for store in stores(&dir).await {
            let r = reminder("Take out the trash");
            store.append(&r).await.unwrap();

            let identity = ReminderIdentity::Ephemeral(r.id.clone());
            store.remove(&identity).await.unwrap();
            assert!(store.list().await.is_empty());

            // Second removal of the same identity is not an error
            store.remove(&identity).await.unwrap();
        }
    }

    #[tokio::test]
    async fn overlapping_appends_are_all_kept() {
        let dir = tempfile::tempdir().unwrap();
        for store in stores(&dir).await {
            let mut handles = Vec::new();
            for i in 0..10 {
                let store = store.clone();
                handles.push(tokio::spawn(async move {
                    store.append(&reminder(&format!("Task {}", i))).await
                }));
            }
            for handle in handles {
                handle.await.unwrap().unwrap();
            }
            assert_eq!(store.list().await.len(), 10);
        }
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");

        let r = reminder("Persisted");
        {
            let store = FileReminderStore::load(path.clone()).await.unwrap();
            store.append(&r).await.unwrap();
        }

        let reopened = FileReminderStore::load(path).await.unwrap();
        let records = reopened.list().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, r.id);
        assert_eq!(records[0].title, "Persisted");
    }

    #[tokio::test]
    async fn corrupt_payload_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.json");
        tokio::fs::write(&path, b"{ not json ]").await.unwrap();

        let store = FileReminderStore::load(path).await.unwrap();
        assert!(store.list().await.is_empty());

        // The store is usable again after the corrupt load
        store.append(&reminder("Fresh start")).await.unwrap();
        assert_eq!(store.list().await.len(), 1);
    }
}
