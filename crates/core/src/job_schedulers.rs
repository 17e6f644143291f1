use crate::reminder::ResyncRemindersUseCase;
use crate::shared::usecase::execute;
use lembra_infra::LembraContext;
use std::time::Duration;
use tracing::info;

/// Spawns the periodic resync sweep that retries every record which never
/// reached the remote mirror. The cadence comes from the context config.
pub fn start_resync_job(ctx: LembraContext) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(ctx.config.resync_interval_secs));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Ok(count) = execute(ResyncRemindersUseCase, &ctx).await {
                if count > 0 {
                    info!("Background sweep pushed {} reminder(s) to the remote mirror", count);
                }
            }
        }
    });
}
