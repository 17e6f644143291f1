use crate::error::LembraError;
use crate::shared::usecase::UseCase;
use crate::sync::{PullError, SyncReconciler};
use lembra_domain::Reminder;
use lembra_infra::{LembraContext, StoreError};
use tracing::warn;

/// Lists the current reminders. The remote mirror is consulted first to
/// refresh the local cache; when it is unreachable the cache is served as
/// is. Records are returned ordered by trigger instant for presentation.
#[derive(Debug)]
pub struct ListRemindersUseCase;

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
impl UseCase for ListRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "ListReminders";

    async fn execute(&mut self, ctx: &LembraContext) -> Result<Self::Response, Self::Error> {
        match SyncReconciler::new(ctx).pull().await {
            Ok(()) => {}
            Err(PullError::Remote(e)) => {
                warn!("Serving the local cache, remote refresh failed: {}", e)
            }
            Err(PullError::Store(e)) => return Err(UseCaseError::StorageError(e)),
        }

        let mut reminders = ctx.repos.reminders.list().await;
        reminders.sort_by_key(|r| r.trigger_at);
        Ok(reminders)
    }
}
