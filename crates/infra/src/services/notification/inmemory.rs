use super::{INotificationScheduler, ScheduledTrigger, TriggerRequest};
use std::sync::Mutex;
use uuid::Uuid;

/// Trigger registry backed by an in-process list. Stands in for the device
/// notification center in tests and headless deployments; embedders wire a
/// platform-backed implementation of `INotificationScheduler` instead.
pub struct InMemoryNotificationScheduler {
    triggers: Mutex<Vec<ScheduledTrigger>>,
}

impl InMemoryNotificationScheduler {
    pub fn new() -> Self {
        Self {
            triggers: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryNotificationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationScheduler for InMemoryNotificationScheduler {
    async fn schedule(&self, request: &TriggerRequest) -> anyhow::Result<String> {
        let handle = Uuid::new_v4().to_string();
        let mut triggers = self.triggers.lock().unwrap();
        triggers.push(ScheduledTrigger {
            handle: handle.clone(),
            request: request.clone(),
        });
        Ok(handle)
    }

    async fn cancel(&self, handle: &str) -> anyhow::Result<()> {
        let mut triggers = self.triggers.lock().unwrap();
        triggers.retain(|t| t.handle != handle);
        Ok(())
    }

    async fn cancel_all(&self) -> anyhow::Result<()> {
        self.triggers.lock().unwrap().clear();
        Ok(())
    }

    async fn list_active(&self) -> Vec<ScheduledTrigger> {
        self.triggers.lock().unwrap().clone()
    }
}
