use crate::error::LembraError;
use crate::notification::NotificationCoordinator;
use crate::shared::usecase::UseCase;
use lembra_infra::{LembraContext, StoreError};

/// Maintenance operation that drops the whole local cache and every
/// registered trigger with it. The remote mirror is left untouched.
#[derive(Debug)]
pub struct ClearRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    StorageError(StoreError),
}

impl From<UseCaseError> for LembraError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError(e) => Self::Storage(e.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for ClearRemindersUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "ClearReminders";

    async fn execute(&mut self, ctx: &LembraContext) -> Result<Self::Response, Self::Error> {
        NotificationCoordinator::new(ctx).cancel_all().await;
        ctx.repos
            .reminders
            .clear()
            .await
            .map_err(UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use crate::shared::usecase::execute;
    use chrono::{Duration, Utc};
    use lembra_domain::DraftReminder;

    #[tokio::test]
    async fn clears_records_and_triggers_but_not_the_mirror() {
        let ctx = LembraContext::create_inmemory();
        let usecase = CreateReminderUseCase {
            draft: DraftReminder {
                title: "Soon gone locally".into(),
                notes: None,
                datetime_iso: (Utc::now() + Duration::hours(2)).to_rfc3339(),
                timezone: "UTC".into(),
                success: true,
                error: None,
            },
        };
        execute(usecase, &ctx).await.unwrap();

        execute(ClearRemindersUseCase, &ctx).await.unwrap();

        assert!(ctx.repos.reminders.list().await.is_empty());
        assert!(ctx.triggers.list_active().await.is_empty());
        assert_eq!(ctx.remote.fetch_all().await.unwrap().len(), 1);
    }
}
