use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "wordveil";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("wordveil_config.json"))
    }

    pub fn log_dir() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", APP_NAME) {
            pd.cache_dir().join("logs")
        } else {
            std::env::temp_dir().join(APP_NAME).join("logs")
        }
    }
}
