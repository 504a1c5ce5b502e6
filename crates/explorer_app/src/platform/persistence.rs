use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use explorer_core::{Preferences, Theme};
use explorer_engine::AtomicFileWriter;
use explorer_logging::{explorer_error, explorer_info, explorer_warn};
use serde::{Deserialize, Serialize};

const PREFS_FILENAME: &str = "preferences.ron";

/// On-disk form of the client preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPreferences {
    theme: String,
    show_hidden: bool,
    #[serde(default)]
    saved_at: Option<String>,
}

pub(crate) fn default_preferences_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("explorer")
        .join(PREFS_FILENAME)
}

/// Missing or unreadable files fall back to the defaults.
pub(crate) fn load_preferences(path: &Path) -> Preferences {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Preferences::default();
        }
        Err(err) => {
            explorer_warn!("Failed to read preferences from {:?}: {}", path, err);
            return Preferences::default();
        }
    };

    let stored: StoredPreferences = match ron::from_str(&content) {
        Ok(stored) => stored,
        Err(err) => {
            explorer_warn!("Failed to parse preferences from {:?}: {}", path, err);
            return Preferences::default();
        }
    };

    explorer_info!(
        "Loaded preferences from {:?} (saved {})",
        path,
        stored.saved_at.as_deref().unwrap_or("unknown")
    );
    Preferences {
        theme: Theme::parse(&stored.theme),
        show_hidden: stored.show_hidden,
    }
}

pub(crate) fn save_preferences(path: &Path, preferences: Preferences) {
    let (Some(dir), Some(filename)) = (path.parent(), path.file_name().and_then(|n| n.to_str()))
    else {
        explorer_error!("Invalid preferences path {:?}", path);
        return;
    };

    let stored = StoredPreferences {
        theme: preferences.theme.as_str().to_string(),
        show_hidden: preferences.show_hidden,
        saved_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&stored, pretty) {
        Ok(text) => text,
        Err(err) => {
            explorer_error!("Failed to serialize preferences: {}", err);
            return;
        }
    };

    let dir = if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir.to_path_buf()
    };
    let writer = AtomicFileWriter::new(dir);
    if let Err(err) = writer.write(filename, content.as_bytes()) {
        explorer_error!("Failed to write preferences to {:?}: {}", path, err);
    }
}
