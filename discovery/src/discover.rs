//! Scan pipeline: library resolution followed by manifest extraction.

use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::library::{LibraryResolution, resolve_libraries};
use crate::manifest::{ExtractionOutcome, extract_records};
use crate::report::ScanReport;

/// Typed error for discovery file operations.
#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inputs of one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Steam install root, if known.
    pub root: Option<PathBuf>,
    /// User-supplied library directories. When non-empty these are scanned
    /// instead of the root and its library manifest.
    pub explicit_libraries: Vec<PathBuf>,
}

/// Everything a scan found.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub root: Option<PathBuf>,
    pub resolution: LibraryResolution,
    pub extraction: ExtractionOutcome,
}

impl ScanOutcome {
    pub fn library_count(&self) -> usize {
        self.resolution.libraries.len()
    }

    /// Builds a serializable report for this scan.
    pub fn report(&self) -> ScanReport {
        ScanReport {
            generated_at: Utc::now().to_rfc3339(),
            steam_root: self.root.clone(),
            libraries: self.resolution.libraries.clone(),
            missing_libraries: self.resolution.missing.clone(),
            libraries_without_steamapps: self.extraction.libraries_without_steamapps.clone(),
            games: self.extraction.records.clone(),
            skipped: self.extraction.skipped.clone(),
        }
    }
}

/// Resolves libraries and extracts every installed game from them.
///
/// Never fails: with no usable library the outcome is simply empty.
///
/// # Examples
///
/// ```
/// use launcher_sync_discovery::discover::{ScanConfig, scan};
///
/// let outcome = scan(&ScanConfig::default());
/// assert_eq!(outcome.library_count(), 0);
/// assert!(outcome.extraction.records.is_empty());
/// ```
pub fn scan(config: &ScanConfig) -> ScanOutcome {
    let root = if config.explicit_libraries.is_empty() {
        config.root.clone()
    } else {
        None
    };

    let resolution = resolve_libraries(root.as_deref(), &config.explicit_libraries);
    info!(libraries = resolution.libraries.len(), "Resolved library folders");

    let extraction = extract_records(&resolution.libraries);

    ScanOutcome {
        root,
        resolution,
        extraction,
    }
}
