mod coordinator;

pub use coordinator::{NotificationCoordinator, ScheduleError, UnschedulableError};
