use crate::error::LembraError;
use crate::shared::usecase::UseCase;
use crate::sync::SyncReconciler;
use lembra_infra::LembraContext;

/// Retries every record that never reached the remote mirror. Per-record
/// failures are isolated inside the sweep; the use case itself only ever
/// reports how many records became synced.
#[derive(Debug)]
pub struct ResyncRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for LembraError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait]
impl UseCase for ResyncRemindersUseCase {
    type Response = usize;

    type Error = UseCaseError;

    const NAME: &'static str = "ResyncReminders";

    async fn execute(&mut self, ctx: &LembraContext) -> Result<Self::Response, Self::Error> {
        Ok(SyncReconciler::new(ctx).resync_all().await)
    }
}
