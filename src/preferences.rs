//! Persisted user preferences.
//!
//! Three scalars kept in a small JSON file under the platform config
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::{Department, SearchFilters};

const PREFERENCES_FILE: &str = "preferences.json";

/// Stored when no department was selected.
pub const NO_DEPARTMENT: i64 = -1;

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preferences file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub last_search_query: String,
    /// [`NO_DEPARTMENT`] when none.
    pub last_selected_department_id: i64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            last_search_query: String::new(),
            last_selected_department_id: NO_DEPARTMENT,
        }
    }
}

impl Preferences {
    /// Default file location, `<config dir>/preferences.json`.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("org", "metmuseum", "metropolitan")
            .map(|d| d.config_dir().join(PREFERENCES_FILE))
            .unwrap_or_else(|| PathBuf::from(".metropolitan").join(PREFERENCES_FILE))
    }

    /// Load from a file; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            debug!(path = %path.display(), "No preferences file, using defaults");
            return Ok(Self::default());
        }

        let data = fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Write to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        debug!(path = %path.display(), "Preferences saved");
        Ok(())
    }

    pub fn last_department_id(&self) -> Option<i64> {
        (self.last_selected_department_id != NO_DEPARTMENT).then_some(self.last_selected_department_id)
    }

    /// Remember the filters of a submitted search.
    pub fn remember_search(&mut self, filters: &SearchFilters) {
        self.last_search_query = filters.query.clone();
        self.last_selected_department_id = filters.department_id().unwrap_or(NO_DEPARTMENT);
    }

    /// Rebuild filters from the last search, resolving the department id
    /// against a loaded department list.
    pub fn restore_search(&self, departments: &[Department]) -> SearchFilters {
        let department = self
            .last_department_id()
            .and_then(|id| departments.iter().find(|d| d.id == id).cloned());

        SearchFilters::new(self.last_search_query.clone()).with_department(department)
    }
}
