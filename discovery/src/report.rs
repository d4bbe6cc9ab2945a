//! Structured reporting for a discovery scan.

use std::path::PathBuf;

use launcher_sync_core::GameRecord;
use serde::{Deserialize, Serialize};

use crate::library::LibraryDir;
use crate::manifest::SkippedManifest;

/// Serializable summary of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// ISO-8601 timestamp of report creation.
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steam_root: Option<PathBuf>,
    pub libraries: Vec<LibraryDir>,
    /// Explicit library paths that did not exist.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_libraries: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libraries_without_steamapps: Vec<PathBuf>,
    pub games: Vec<GameRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedManifest>,
}

impl ScanReport {
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
