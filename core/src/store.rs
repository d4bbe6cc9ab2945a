//! `apps.json` location, loading, and atomic persistence.
//!
//! Loading is forgiving: a missing or unreadable document yields an empty
//! [`AppsConfig`] so a sync can always proceed. Saving goes through a
//! temporary file in the target directory followed by a rename, so the file
//! on disk is either the previous document or the new one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::AppsConfig;
use crate::error::Result;

/// File name used when the configured path is a directory.
pub const CONFIG_FILE_NAME: &str = "apps.json";

/// Resolves the configuration file path.
///
/// An existing directory gets [`CONFIG_FILE_NAME`] appended, any other path
/// is used as given, and `None` selects [`default_config_path`].
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use launcher_sync_core::resolve_config_path;
///
/// let dir = std::env::temp_dir();
/// assert_eq!(resolve_config_path(Some(&dir)), dir.join("apps.json"));
///
/// let file = Path::new("/nonexistent/custom.json");
/// assert_eq!(resolve_config_path(Some(file)), file);
/// ```
pub fn resolve_config_path(path: Option<&Path>) -> PathBuf {
    match path {
        Some(path) if path.is_dir() => {
            let resolved = path.join(CONFIG_FILE_NAME);
            debug!(path = %resolved.display(), "Config path is a directory");
            resolved
        }
        Some(path) => path.to_path_buf(),
        None => default_config_path(),
    }
}

/// Default location of the launcher's `apps.json`.
///
/// Apollo shares Sunshine's directory layout: `%PROGRAMDATA%\Sunshine` on
/// Windows, `~/.config/sunshine` elsewhere.
#[cfg(windows)]
pub fn default_config_path() -> PathBuf {
    let program_data =
        std::env::var_os("PROGRAMDATA").unwrap_or_else(|| "C:\\ProgramData".into());
    PathBuf::from(program_data)
        .join("Sunshine")
        .join(CONFIG_FILE_NAME)
}

/// Default location of the launcher's `apps.json`.
///
/// Apollo shares Sunshine's directory layout: `%PROGRAMDATA%\Sunshine` on
/// Windows, `~/.config/sunshine` elsewhere.
#[cfg(not(windows))]
pub fn default_config_path() -> PathBuf {
    config_home().join("sunshine").join(CONFIG_FILE_NAME)
}

#[cfg(not(windows))]
fn config_home() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".config");
    }
    PathBuf::from(".config")
}

/// How the configuration returned by [`ConfigStore::load`] was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// No file at the configured path; starting empty.
    Missing,
    /// File read and parsed.
    Loaded,
    /// File present but unreadable, not JSON, or with a non-array `apps`;
    /// starting empty.
    Corrupt(String),
}

/// Configuration plus how it was obtained.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppsConfig,
    pub state: LoadState,
}

/// File-backed `apps.json` store.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads and parses the document, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::StoreError::Io) if the file cannot be read, or
    /// [`Json`](crate::StoreError::Json) if it is not a valid document.
    pub fn read(&self) -> Result<Option<AppsConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read(&self.path)?;
        let config = serde_json::from_slice(&raw)?;
        Ok(Some(config))
    }

    /// Loads the document, falling back to an empty configuration.
    ///
    /// A corrupt document is treated as absent and will be replaced by the
    /// next [`save`](Self::save); the reason is logged and kept in
    /// [`LoadState::Corrupt`].
    pub fn load(&self) -> LoadedConfig {
        match self.read() {
            Ok(Some(config)) => {
                debug!(
                    path = %self.path.display(),
                    apps = config.app_count(),
                    "Loaded existing config"
                );
                LoadedConfig {
                    config,
                    state: LoadState::Loaded,
                }
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "No existing config found");
                LoadedConfig {
                    config: AppsConfig::new(),
                    state: LoadState::Missing,
                }
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Existing config could not be loaded, starting empty"
                );
                LoadedConfig {
                    config: AppsConfig::new(),
                    state: LoadState::Corrupt(err.to_string()),
                }
            }
        }
    }

    /// Writes the document with 2-space indentation, replacing the file
    /// atomically and creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::StoreError) if the directory cannot be
    /// created or the file cannot be written. The previous file, if any, is
    /// left untouched in that case.
    pub fn save(&self, config: &AppsConfig) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let raw = serde_json::to_string_pretty(config)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(raw.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        debug!(
            path = %self.path.display(),
            apps = config.app_count(),
            "Saved config"
        );
        Ok(())
    }
}
