use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_dirs::AppDirs;
use crate::icon::DisplayMode;
use crate::recent::RecentTargets;
use crate::session::SessionRecord;
use crate::timer::{clamp_target_minutes, DEFAULT_TARGET_MINUTES};

/// The full durable state: session history, recent targets, active target
/// and overlay mode. Rewritten as a whole after every state-changing
/// operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedDocument {
    pub sessions: Vec<SessionRecord>,
    pub recent_targets_minutes: Vec<u32>,
    pub target_minutes: u32,
    pub text_display_mode: DisplayMode,
}

impl Default for PersistedDocument {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            recent_targets_minutes: Vec::new(),
            target_minutes: DEFAULT_TARGET_MINUTES,
            text_display_mode: DisplayMode::default(),
        }
    }
}

impl PersistedDocument {
    /// Clamp out-of-range values from a hand-edited or stale document.
    pub fn sanitized(mut self) -> Self {
        self.target_minutes = clamp_target_minutes(self.target_minutes);
        self.recent_targets_minutes =
            RecentTargets::from_saved(&self.recent_targets_minutes)
                .as_slice()
                .to_vec();
        self
    }
}

pub trait TimerStore {
    /// Best-effort load: a missing or corrupt file yields the default
    /// document, never an error.
    fn load(&self) -> PersistedDocument;
    fn save(&self, doc: &PersistedDocument) -> io::Result<()>;
}

#[derive(Clone, Debug)]
pub struct FileTimerStore {
    path: PathBuf,
}

impl FileTimerStore {
    pub fn new() -> Self {
        let path = AppDirs::document_path()
            .unwrap_or_else(|| PathBuf::from("tickup_timer_log.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileTimerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerStore for FileTimerStore {
    fn load(&self) -> PersistedDocument {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(doc) = serde_json::from_slice::<PersistedDocument>(&bytes) {
                return doc.sanitized();
            }
            tracing::debug!(path = %self.path.display(), "ignoring unreadable timer document");
        }
        PersistedDocument::default()
    }

    /// Write-then-rename so a crash mid-write never corrupts the existing
    /// document.
    fn save(&self, doc: &PersistedDocument) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(doc)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)
    }
}
