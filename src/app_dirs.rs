use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Path of the persisted timer document inside the per-user data dir.
    pub fn document_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tickup")
            .map(|proj_dirs| proj_dirs.data_local_dir().join("timer_log.json"))
    }
}
