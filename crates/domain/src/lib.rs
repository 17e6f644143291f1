mod draft;
mod reminder;
mod shared;

pub use draft::DraftReminder;
pub use reminder::{Reminder, ReminderPatch, SyncStatus};
pub use shared::entity::{InvalidIDError, ReminderIdentity, ID};
