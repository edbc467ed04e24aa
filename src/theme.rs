use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreference {
    theme: Theme,
}

/// Light/dark preference stored as `{"theme": "..."}` in a single file
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Stored theme, or light when the file is missing or unreadable
    pub fn load(&self) -> Theme {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return Theme::default(),
        };
        match serde_json::from_str::<StoredPreference>(&contents) {
            Ok(stored) => stored.theme,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable theme preference at {}: {}",
                    self.path.display(),
                    e
                );
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        let body = serde_json::to_string(&StoredPreference { theme })?;
        fs::write(&self.path, body)?;
        Ok(())
    }
}
