mod error;
mod job_schedulers;
mod notification;
pub mod reminder;
mod shared;
mod sync;

pub use error::LembraError;
pub use job_schedulers::start_resync_job;
pub use notification::{NotificationCoordinator, ScheduleError, UnschedulableError};
pub use reminder::{
    ClearRemindersUseCase, CreateReminderUseCase, CreatedReminder, DeleteReminderUseCase,
    EditReminderUseCase, EditedReminder, GetReminderUseCase, ListRemindersUseCase,
    ResyncRemindersUseCase,
};
pub use shared::usecase::{execute, UseCase};
pub use sync::{PullError, SyncReconciler};
