use crate::error::LembraError;
use crate::shared::usecase::UseCase;
use lembra_domain::{Reminder, ReminderIdentity, ID};
use lembra_infra::LembraContext;

/// Resolves a raw identifier against the store. Ephemeral ids are tried
/// first, then durable ids, since a caller may hold either depending on
/// where it learned about the record.
#[derive(Debug)]
pub struct GetReminderUseCase {
    pub raw_identity: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(String),
}

impl From<UseCaseError> for LembraError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(raw) => {
                Self::NotFound(format!("The reminder with id: {}, was not found.", raw))
            }
        }
    }
}

#[async_trait::async_trait]
impl UseCase for GetReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminder";

    async fn execute(&mut self, ctx: &LembraContext) -> Result<Self::Response, Self::Error> {
        if let Ok(id) = self.raw_identity.parse::<ID>() {
            if let Some(reminder) = ctx
                .repos
                .reminders
                .find_by(&ReminderIdentity::Ephemeral(id))
                .await
            {
                return Ok(reminder);
            }
        }

        ctx.repos
            .reminders
            .find_by(&ReminderIdentity::Durable(self.raw_identity.clone()))
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.raw_identity.clone()))
    }
}
