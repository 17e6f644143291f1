use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the local reminder blob lives on disk
    pub storage_path: PathBuf,
    /// How often the background sweep retries records that never reached
    /// the remote mirror
    pub resync_interval_secs: u64,
}

impl Config {
    pub fn new() -> Self {
        let default_storage_path = "lembra_reminders.json";
        let storage_path = std::env::var("LEMBRA_STORAGE_PATH")
            .unwrap_or_else(|_| default_storage_path.into());

        let default_resync_interval = "300";
        let resync_interval = std::env::var("LEMBRA_RESYNC_INTERVAL_SECS")
            .unwrap_or_else(|_| default_resync_interval.into());
        let resync_interval_secs = match resync_interval.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "The given LEMBRA_RESYNC_INTERVAL_SECS: {} is not valid, falling back to the default: {}.",
                    resync_interval, default_resync_interval
                );
                default_resync_interval.parse::<u64>().unwrap()
            }
        };

        Self {
            storage_path: PathBuf::from(storage_path),
            resync_interval_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
