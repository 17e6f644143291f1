use super::{IRemoteMirror, RemoteMirrorError, RemoteReminderAttributes, RemoteReminderRow};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mirror backed by an in-process table. Availability can be toggled so
/// tests can exercise offline and degraded-sync behavior.
pub struct InMemoryRemoteMirror {
    rows: Mutex<Vec<RemoteReminderRow>>,
    next_id: AtomicUsize,
    available: AtomicBool,
}

impl InMemoryRemoteMirror {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RemoteMirrorError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RemoteMirrorError::Network("Remote mirror is offline".into()))
        }
    }
}

impl Default for InMemoryRemoteMirror {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IRemoteMirror for InMemoryRemoteMirror {
    async fn insert(
        &self,
        attributes: &RemoteReminderAttributes,
    ) -> Result<String, RemoteMirrorError> {
        self.check_available()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let mut rows = self.rows.lock().unwrap();
        rows.push(RemoteReminderRow {
            id: id.clone(),
            title: attributes.title.clone(),
            notes: attributes.notes.clone(),
            trigger_at: attributes.trigger_at.clone(),
            timezone: attributes.timezone.clone(),
            meta: attributes.meta.clone(),
        });
        Ok(id)
    }

    async fn update(
        &self,
        durable_id: &str,
        attributes: &RemoteReminderAttributes,
    ) -> Result<(), RemoteMirrorError> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut() {
            if row.id == durable_id {
                row.title = attributes.title.clone();
                row.notes = attributes.notes.clone();
                row.trigger_at = attributes.trigger_at.clone();
                row.timezone = attributes.timezone.clone();
                row.meta = attributes.meta.clone();
                return Ok(());
            }
        }
        Err(RemoteMirrorError::Server(404))
    }

    async fn delete(&self, durable_id: &str) -> Result<(), RemoteMirrorError> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|row| row.id != durable_id);
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<RemoteReminderRow>, RemoteMirrorError> {
        self.check_available()?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn ping(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
