//! Settings
//!
//! Loaded from a TOML file; every field has a default so a missing file or
//! a partial file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ContentError;

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `quests.toml`
    pub data_dir: PathBuf,
    pub hints: HintSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            hints: HintSettings::default(),
        }
    }
}

/// Hint window lengths, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HintSettings {
    /// How long a hint stays visible
    pub display_secs: u64,
    /// How long the gate stays locked after the hint is hidden
    pub lock_secs: u64,
}

impl Default for HintSettings {
    fn default() -> Self {
        Self {
            display_secs: 60,
            lock_secs: 300,
        }
    }
}

/// Longest accepted display or lock window (30 days)
pub const MAX_WINDOW_SECS: u64 = 30 * 24 * 60 * 60;

impl HintSettings {
    /// Display window, capped at [`MAX_WINDOW_SECS`]
    pub fn display_duration(&self) -> Duration {
        Duration::from_secs(self.display_secs.min(MAX_WINDOW_SECS))
    }

    /// Lock window, capped at [`MAX_WINDOW_SECS`]
    pub fn lock_duration(&self) -> Duration {
        Duration::from_secs(self.lock_secs.min(MAX_WINDOW_SECS))
    }

    /// Reject windows longer than [`MAX_WINDOW_SECS`]
    pub fn validate(&self, origin: &str) -> Result<(), ContentError> {
        for (field, secs) in [("display_secs", self.display_secs), ("lock_secs", self.lock_secs)] {
            if secs > MAX_WINDOW_SECS {
                return Err(ContentError::WindowTooLong {
                    origin: origin.to_string(),
                    field,
                    secs,
                    max: MAX_WINDOW_SECS,
                });
            }
        }
        Ok(())
    }
}

impl Settings {
    /// Load settings from a TOML file, falling back to defaults if it is missing
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        if !path.exists() {
            warn!("Settings file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = Self::parse(&content, &path.display().to_string())?;
        info!(
            "Loaded settings from {:?} (display {}s, lock {}s)",
            path, settings.hints.display_secs, settings.hints.lock_secs
        );
        Ok(settings)
    }

    /// Parse settings from TOML text; `origin` names the source in errors
    pub fn parse(content: &str, origin: &str) -> Result<Self, ContentError> {
        let settings: Self = toml::from_str(content).map_err(|source| ContentError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        settings.hints.validate(origin)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.hints.display_duration(), Duration::from_secs(60));
        assert_eq!(settings.hints.lock_duration(), Duration::from_secs(300));
        assert_eq!(settings.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_partial_file() {
        let settings = Settings::parse("[hints]\nlock_secs = 120\n", "test").unwrap();
        assert_eq!(settings.hints.display_secs, 60);
        assert_eq!(settings.hints.lock_secs, 120);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = Settings::parse("[hints]\ndisplay_secs = -5\n", "test").unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
    }

    #[test]
    fn test_oversized_window_rejected() {
        let err = Settings::parse("[hints]\ndisplay_secs = 9223372036854775807\n", "test").unwrap_err();
        assert!(matches!(
            err,
            ContentError::WindowTooLong { field: "display_secs", max: MAX_WINDOW_SECS, .. }
        ));

        let content = format!("[hints]\nlock_secs = {}\n", MAX_WINDOW_SECS + 1);
        let err = Settings::parse(&content, "test").unwrap_err();
        assert!(matches!(err, ContentError::WindowTooLong { field: "lock_secs", .. }));

        let content = format!("[hints]\nlock_secs = {}\n", MAX_WINDOW_SECS);
        assert!(Settings::parse(&content, "test").is_ok());
    }

    #[test]
    fn test_durations_capped() {
        let hints = HintSettings {
            display_secs: u64::MAX,
            lock_secs: 5,
        };
        assert_eq!(hints.display_duration(), Duration::from_secs(MAX_WINDOW_SECS));
        assert_eq!(hints.lock_duration(), Duration::from_secs(5));
        assert!(hints.validate("test").is_err());
    }

    #[test]
    fn test_load_missing_and_present() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());

        std::fs::write(&path, "data_dir = \"content\"\n[hints]\ndisplay_secs = 30\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("content"));
        assert_eq!(settings.hints.display_secs, 30);
    }
}
