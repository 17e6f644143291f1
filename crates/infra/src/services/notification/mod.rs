mod inmemory;

pub use inmemory::InMemoryNotificationScheduler;
use lembra_domain::ID;

/// Content and instant for a device trigger registration
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerRequest {
    pub title: String,
    pub body: String,
    /// Absolute instant to fire at, millis since the epoch
    pub fire_at: i64,
    /// Carried as notification payload so the UI can resolve the record
    /// when the user taps the notification
    pub reminder_id: ID,
}

/// A trigger currently registered with the scheduling capability
#[derive(Debug, Clone)]
pub struct ScheduledTrigger {
    pub handle: String,
    pub request: TriggerRequest,
}

/// The platform trigger-scheduling capability. Handles are opaque tokens,
/// this layer never interprets them. Validation of the trigger instant is
/// the coordinator's concern, not the capability's.
#[async_trait::async_trait]
pub trait INotificationScheduler: Send + Sync {
    async fn schedule(&self, request: &TriggerRequest) -> anyhow::Result<String>;
    /// Cancelling an already-fired or unknown handle is not an error
    async fn cancel(&self, handle: &str) -> anyhow::Result<()>;
    async fn cancel_all(&self) -> anyhow::Result<()>;
    async fn list_active(&self) -> Vec<ScheduledTrigger>;
}
