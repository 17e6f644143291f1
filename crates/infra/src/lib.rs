mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{
    FileReminderStore, IReminderStore, InMemoryReminderStore, Repos, StoreError,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};

#[derive(Clone)]
pub struct LembraContext {
    pub repos: Repos,
    /// Authoritative remote table, source of truth when reachable
    pub remote: Arc<dyn IRemoteMirror>,
    /// Device trigger capability
    pub triggers: Arc<dyn INotificationScheduler>,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

struct ContextParams {
    pub remote_base_url: String,
    pub remote_api_key: String,
}

impl LembraContext {
    async fn create(params: ContextParams) -> Self {
        let config = Config::new();
        let repos = Repos::create_file_backed(config.storage_path.clone())
            .await
            .expect("Reminder storage path must be readable");
        Self {
            repos,
            remote: Arc::new(RestRemoteMirror::new(
                params.remote_base_url,
                params.remote_api_key,
            )),
            triggers: Arc::new(InMemoryNotificationScheduler::new()),
            config,
            sys: Arc::new(RealSys {}),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            remote: Arc::new(InMemoryRemoteMirror::new()),
            triggers: Arc::new(InMemoryNotificationScheduler::new()),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }

    /// Swap in a platform-backed trigger capability. The default context
    /// carries the in-process registry.
    pub fn with_scheduler(mut self, triggers: Arc<dyn INotificationScheduler>) -> Self {
        self.triggers = triggers;
        self
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> LembraContext {
    LembraContext::create(ContextParams {
        remote_base_url: get_env_var("LEMBRA_REMOTE_URL"),
        remote_api_key: get_env_var("LEMBRA_REMOTE_API_KEY"),
    })
    .await
}

fn get_env_var(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{} env var to be present.", name))
}
