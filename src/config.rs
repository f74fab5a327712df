//! Environment configuration
//!
//! Persisted as JSON under the platform config directory
//! (`hellspawner/environment.json`). Missing or unreadable files fall back
//! to defaults, which are written out again.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MAX_RECENT_PROJECTS: usize = 6;
const CONFIG_DIR: &str = "hellspawner";
const CONFIG_FILE: &str = "environment.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    #[serde(default)]
    pub recent_projects: Vec<PathBuf>,
    #[serde(default)]
    pub auxiliary_mpq_path: PathBuf,
    #[serde(default)]
    pub open_most_recent_on_startup: bool,

    #[serde(skip)]
    location: Option<PathBuf>,
}

impl Config {
    /// `<config dir>/hellspawner/environment.json`
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load() -> Self {
        match Self::default_location() {
            Some(location) => Self::load_from(&location),
            None => {
                log::warn!("No config directory available, settings will not persist");
                Self::default()
            }
        }
    }

    pub fn load_from(location: &Path) -> Self {
        if !location.exists() {
            return Self::generate_default(location);
        }

        let contents = match fs::read_to_string(location) {
            Ok(contents) => contents,
            Err(e) => {
                log::warn!("Could not read {}: {}", location.display(), e);
                return Self::generate_default(location);
            }
        };

        match serde_json::from_str::<Config>(&contents) {
            Ok(mut config) => {
                config.location = Some(location.to_path_buf());
                config
            }
            Err(e) => {
                log::warn!("Could not parse {}: {}", location.display(), e);
                Self::generate_default(location)
            }
        }
    }

    fn generate_default(location: &Path) -> Self {
        let config = Self {
            location: Some(location.to_path_buf()),
            ..Self::default()
        };
        if let Err(e) = config.save() {
            log::warn!("Could not write default config: {}", e);
        }
        config
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(location) = self.location.as_deref() else {
            log::debug!("Config has no location, keeping settings in memory");
            return Ok(());
        };
        if let Some(parent) = location.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(location, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Move `path` to the front of the recent list, dropping the oldest
    /// entry past the limit, then persist.
    pub fn add_to_recent_projects(&mut self, path: &Path) -> Result<(), ConfigError> {
        if let Some(index) = self.recent_projects.iter().position(|p| p == path) {
            self.recent_projects.remove(index);
        }
        self.recent_projects.insert(0, path.to_path_buf());
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
        self.save()
    }

    /// Replace the user-editable settings, keeping the file location
    pub fn apply(&mut self, other: Config) {
        self.recent_projects = other.recent_projects;
        self.auxiliary_mpq_path = other.auxiliary_mpq_path;
        self.open_most_recent_on_startup = other.open_most_recent_on_startup;
    }

    pub fn most_recent_project(&self) -> Option<&Path> {
        self.recent_projects.first().map(PathBuf::as_path)
    }
}
