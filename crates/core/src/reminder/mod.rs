pub mod clear_reminders;
pub mod create_reminder;
pub mod delete_reminder;
pub mod edit_reminder;
pub mod get_reminder;
pub mod list_reminders;
pub mod resync_reminders;

pub use clear_reminders::ClearRemindersUseCase;
pub use create_reminder::{CreateReminderUseCase, CreatedReminder};
pub use delete_reminder::DeleteReminderUseCase;
pub use edit_reminder::{EditReminderUseCase, EditedReminder};
pub use get_reminder::GetReminderUseCase;
pub use list_reminders::ListRemindersUseCase;
pub use resync_reminders::ResyncRemindersUseCase;
