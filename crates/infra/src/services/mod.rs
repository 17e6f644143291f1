mod notification;
mod remote_mirror;

pub use notification::{
    INotificationScheduler, InMemoryNotificationScheduler, ScheduledTrigger, TriggerRequest,
};
pub use remote_mirror::{
    IRemoteMirror, InMemoryRemoteMirror, RemoteMirrorError, RemoteReminderAttributes,
    RemoteReminderRow, ReminderSnapshot, RestRemoteMirror, SNAPSHOT_SCHEMA_VERSION,
};
