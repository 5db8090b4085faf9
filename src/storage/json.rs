//! Single-file JSON storage for tasks and settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::tasks::Task;
use crate::types::Settings;

use super::error::{Result, StorageError};

/// On-disk layout of the data file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    settings: Option<Settings>,
}

/// Reads and writes `{ "tasks": [...], "settings": {...} }` at one path.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Opens storage at `path`, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Fails if the parent directory cannot be created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self { path })
    }

    /// Default location under the platform data directory.
    ///
    /// # Errors
    ///
    /// [`StorageError::DataDirNotFound`] when the platform has none.
    pub fn default_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("pomotask").join("data.json"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads stored tasks. A missing file yields an empty list.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.read()?.map(|doc| doc.tasks).unwrap_or_default())
    }

    /// Loads stored settings, falling back to defaults.
    ///
    /// Never fails: unreadable files and out-of-range values are logged and
    /// replaced by [`Settings::default`].
    pub fn load_settings(&self) -> Settings {
        let stored = match self.read() {
            Ok(doc) => doc.and_then(|d| d.settings),
            Err(e) => {
                warn!(error = %e, "could not read settings; using defaults");
                None
            }
        };

        match stored {
            Some(settings) => match settings.validate() {
                Ok(()) => settings,
                Err(e) => {
                    warn!(error = %e, "stored settings out of range; using defaults");
                    Settings::default()
                }
            },
            None => Settings::default(),
        }
    }

    /// Writes the task list, keeping stored settings untouched.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be serialized or written.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let mut doc = self.read_or_default();
        doc.tasks = tasks.to_vec();
        self.write(&doc)?;
        info!(count = tasks.len(), path = %self.path.display(), "tasks saved");
        Ok(())
    }

    /// Writes the settings, keeping stored tasks untouched.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be serialized or written.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let mut doc = self.read_or_default();
        doc.settings = Some(*settings);
        self.write(&doc)?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    fn read(&self) -> Result<Option<Document>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StorageError::Json {
                path: self.path.clone(),
                source,
            })
    }

    fn read_or_default(&self) -> Document {
        match self.read() {
            Ok(doc) => doc.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "existing data unreadable; it will be overwritten");
                Document::default()
            }
        }
    }

    fn write(&self, doc: &Document) -> Result<()> {
        let json = serde_json::to_string_pretty(doc).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
