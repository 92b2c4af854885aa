// RLM Log Reader - app/settings.rs
//
// GUI settings persistence: the last input file and output directory, so
// the file dialogs reopen where the user left off.
//
// - Saved atomically (write temp, rename) so a crash mid-save keeps the
//   previous good file.
// - Load errors are discarded; a corrupt or incompatible file just starts
//   with empty settings.

use crate::util::constants::SETTINGS_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp. Bump when `Settings` changes incompatibly; mismatched
/// files are ignored.
pub const SETTINGS_VERSION: u32 = 1;

/// Persisted GUI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub version: u32,

    /// Last log file opened.
    #[serde(default)]
    pub input_file: Option<PathBuf>,

    /// Last output directory chosen.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            input_file: None,
            output_dir: None,
        }
    }
}

impl Settings {
    /// Directory an Open dialog should start in.
    pub fn input_dialog_dir(&self) -> Option<&Path> {
        self.input_file.as_deref().and_then(Path::parent)
    }
}

/// Settings file location inside the platform data directory.
pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILE_NAME)
}

/// Save `settings` to `path` atomically, creating parent directories.
///
/// Returns a descriptive message on failure; callers log it and carry on.
pub fn save(settings: &Settings, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            format!(
                "cannot create settings directory '{}': {e}",
                parent.display()
            )
        })?;
    }

    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("failed to serialise settings: {e}"))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json.as_bytes())
        .map_err(|e| format!("failed to write settings temp file '{}': {e}", tmp.display()))?;

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        format!("failed to finalise settings file '{}': {e}", path.display())
    })?;

    tracing::debug!(path = %path.display(), "Settings saved");
    Ok(())
}

/// Load settings from `path`. `None` on any error or version mismatch.
pub fn load(path: &Path) -> Option<Settings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read settings file");
            }
        })
        .ok()?;

    let settings: Settings = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Settings file is malformed; ignoring");
        })
        .ok()?;

    if settings.version != SETTINGS_VERSION {
        tracing::warn!(
            found = settings.version,
            expected = SETTINGS_VERSION,
            "Settings file version mismatch; ignoring"
        );
        return None;
    }

    tracing::debug!(path = %path.display(), "Settings loaded");
    Some(settings)
}
