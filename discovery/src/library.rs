//! Steam library directory resolution.
//!
//! A Steam install can spread games over several library folders. The root
//! install is always one of them; the others are listed in
//! `<root>/steamapps/libraryfolders.vdf`:
//!
//! ```text
//! "libraryfolders"
//! {
//!     "0" { "path" "C:\\Program Files (x86)\\Steam" ... }
//!     "1" { "path" "D:\\SteamLibrary" ... }
//! }
//! ```
//!
//! Explicit user-supplied paths replace this lookup entirely.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::parser::{VdfSection, read_vdf_file};

/// Directory under each library holding manifests and installs.
pub const STEAMAPPS_DIR: &str = "steamapps";

/// Library manifest file name under `steamapps/`.
pub const LIBRARY_FOLDERS_FILE: &str = "libraryfolders.vdf";

/// Top-level section of the library manifest.
pub const LIBRARY_FOLDERS_KEY: &str = "libraryfolders";

/// Field holding a library's location.
pub const LIBRARY_PATH_KEY: &str = "path";

/// Where a library directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibrarySource {
    /// The Steam install root itself.
    SteamRoot,
    /// An entry of `libraryfolders.vdf`.
    LibraryManifest,
    /// A path supplied by the user.
    Explicit,
}

impl std::fmt::Display for LibrarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SteamRoot => write!(f, "steam_root"),
            Self::LibraryManifest => write!(f, "library_manifest"),
            Self::Explicit => write!(f, "explicit"),
        }
    }
}

/// A directory expected to contain a `steamapps/` tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDir {
    pub path: PathBuf,
    pub source: LibrarySource,
}

impl LibraryDir {
    pub fn new(path: impl Into<PathBuf>, source: LibrarySource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    /// Path of this library's `steamapps/` directory.
    pub fn steamapps(&self) -> PathBuf {
        self.path.join(STEAMAPPS_DIR)
    }
}

/// Libraries found, plus explicit paths that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryResolution {
    pub libraries: Vec<LibraryDir>,
    /// Explicit paths that did not exist.
    pub missing: Vec<PathBuf>,
}

impl LibraryResolution {
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.libraries.iter().map(|lib| lib.path.as_path()).collect()
    }
}

/// Resolves the library directories to scan.
///
/// - Non-empty `explicit_paths`: the existing ones, in input order; the rest
///   are reported in [`LibraryResolution::missing`]. `root` is not consulted.
/// - Otherwise, with a `root`: the root first, then every `path` listed in
///   its `libraryfolders.vdf`, in manifest order.
/// - Otherwise: nothing.
///
/// # Examples
///
/// ```
/// use launcher_sync_discovery::library::resolve_libraries;
///
/// let resolution = resolve_libraries(None, &[]);
/// assert!(resolution.is_empty());
/// ```
pub fn resolve_libraries(root: Option<&Path>, explicit_paths: &[PathBuf]) -> LibraryResolution {
    if !explicit_paths.is_empty() {
        return resolve_explicit(explicit_paths);
    }

    let Some(root) = root else {
        debug!("No Steam root and no explicit library paths");
        return LibraryResolution::default();
    };

    let mut libraries = vec![LibraryDir::new(root, LibrarySource::SteamRoot)];

    let manifest_path = root.join(STEAMAPPS_DIR).join(LIBRARY_FOLDERS_FILE);
    if !manifest_path.is_file() {
        debug!(path = %manifest_path.display(), "No library manifest");
        return LibraryResolution {
            libraries,
            missing: Vec::new(),
        };
    }

    match read_vdf_file(&manifest_path) {
        Ok(document) => {
            for path in library_paths_from_manifest(&document) {
                if libraries.iter().any(|lib| same_location(&lib.path, &path)) {
                    debug!(path = %path.display(), "Library already listed");
                    continue;
                }
                libraries.push(LibraryDir::new(path, LibrarySource::LibraryManifest));
            }
        }
        Err(err) => {
            warn!(path = %manifest_path.display(), error = %err, "Failed to read library manifest");
        }
    }

    LibraryResolution {
        libraries,
        missing: Vec::new(),
    }
}

fn resolve_explicit(explicit_paths: &[PathBuf]) -> LibraryResolution {
    let mut resolution = LibraryResolution::default();
    for path in explicit_paths {
        if path.exists() {
            info!(path = %path.display(), "Using custom library path");
            resolution
                .libraries
                .push(LibraryDir::new(path.clone(), LibrarySource::Explicit));
        } else {
            warn!(path = %path.display(), "Custom library path not found");
            resolution.missing.push(path.clone());
        }
    }
    resolution
}

/// Lists the library paths declared in a parsed `libraryfolders.vdf`.
///
/// Child sections without a `path` value are skipped.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use launcher_sync_discovery::library::library_paths_from_manifest;
/// use launcher_sync_discovery::parser::parse_vdf;
///
/// let doc = parse_vdf(r#"
/// "libraryfolders"
/// {
///     "1"
///     {
///         "path"  "D:\\SteamLibrary"
///     }
/// }
/// "#);
/// assert_eq!(library_paths_from_manifest(&doc), vec![PathBuf::from(r"D:\SteamLibrary")]);
/// ```
pub fn library_paths_from_manifest(document: &VdfSection) -> Vec<PathBuf> {
    let Some(folders) = document.get_section(LIBRARY_FOLDERS_KEY) else {
        return Vec::new();
    };

    folders
        .sections()
        .filter_map(|(_, folder)| folder.get_str(LIBRARY_PATH_KEY))
        .map(normalize_library_path)
        .collect()
}

/// Collapses the doubled backslashes VDF uses in paths.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use launcher_sync_discovery::library::normalize_library_path;
///
/// assert_eq!(normalize_library_path(r"E:\\Games\\Steam"), PathBuf::from(r"E:\Games\Steam"));
/// ```
pub fn normalize_library_path(raw: &str) -> PathBuf {
    PathBuf::from(raw.replace("\\\\", "\\"))
}

#[cfg(windows)]
fn same_location(a: &Path, b: &Path) -> bool {
    let canonical = |path: &Path| {
        path.to_string_lossy()
            .replace('/', "\\")
            .trim_end_matches('\\')
            .to_ascii_lowercase()
    };
    canonical(a) == canonical(b)
}

#[cfg(not(windows))]
fn same_location(a: &Path, b: &Path) -> bool {
    a == b
}
