//! App manifest extraction.
//!
//! Every installed game has an `appmanifest_<appid>.acf` file in its
//! library's `steamapps/` directory. This module lists those files, parses
//! them, and turns each usable one into a [`GameRecord`]. Files that cannot
//! be read or lack an app id or name are skipped with a [`SkipReason`]; they
//! never abort the scan.

use std::fs;
use std::path::{Path, PathBuf};

use launcher_sync_core::GameRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::library::LibraryDir;
use crate::parser::{VdfSection, read_vdf_file};

/// File name prefix of app manifests.
pub const APP_MANIFEST_PREFIX: &str = "appmanifest_";

/// File name suffix of app manifests.
pub const APP_MANIFEST_SUFFIX: &str = ".acf";

/// Top-level section of an app manifest.
pub const APP_STATE_KEY: &str = "AppState";

const APP_ID_KEY: &str = "appid";
const NAME_KEY: &str = "name";
const INSTALL_DIR_KEY: &str = "installdir";

/// Why a manifest produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum SkipReason {
    /// The file could not be read.
    Unreadable(String),
    /// No top-level `AppState` section.
    MissingAppState,
    /// `appid` absent or empty.
    MissingAppId,
    /// `name` absent or empty.
    MissingName,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreadable(err) => write!(f, "unreadable: {err}"),
            Self::MissingAppState => write!(f, "no 'AppState' key found"),
            Self::MissingAppId => write!(f, "missing app id"),
            Self::MissingName => write!(f, "missing name"),
        }
    }
}

/// A manifest file that yielded no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedManifest {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Records extracted from a set of libraries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub records: Vec<GameRecord>,
    pub skipped: Vec<SkippedManifest>,
    /// Libraries that had no `steamapps/` directory.
    pub libraries_without_steamapps: Vec<PathBuf>,
}

/// Returns `true` for `appmanifest_*.acf` file names.
///
/// # Examples
///
/// ```
/// use launcher_sync_discovery::manifest::is_app_manifest_name;
///
/// assert!(is_app_manifest_name("appmanifest_440.acf"));
/// assert!(!is_app_manifest_name("libraryfolders.vdf"));
/// assert!(!is_app_manifest_name("appmanifest_440.acf.bak"));
/// ```
pub fn is_app_manifest_name(name: &str) -> bool {
    name.starts_with(APP_MANIFEST_PREFIX) && name.ends_with(APP_MANIFEST_SUFFIX)
}

/// Lists app manifest files in a `steamapps/` directory, sorted by name.
///
/// # Errors
///
/// Returns the I/O error if the directory cannot be listed.
pub fn list_app_manifests(steamapps: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut manifests = Vec::new();
    for entry in fs::read_dir(steamapps)? {
        let entry = entry?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_app_manifest_name);
        if matches && path.is_file() {
            manifests.push(path);
        }
    }
    manifests.sort();
    Ok(manifests)
}

/// Builds a record from a parsed app manifest.
///
/// # Examples
///
/// ```
/// use launcher_sync_discovery::manifest::parse_app_manifest;
/// use launcher_sync_discovery::parser::parse_vdf;
///
/// let doc = parse_vdf("\"AppState\"\n{\n\"appid\" \"440\"\n\"name\" \"Team Fortress 2\"\n}\n");
/// let record = parse_app_manifest(&doc).unwrap();
/// assert_eq!(record.app_id, "440");
/// assert_eq!(record.install_dir, "");
/// assert_eq!(record.launch_ref, "steam://rungameid/440");
/// ```
pub fn parse_app_manifest(document: &VdfSection) -> Result<GameRecord, SkipReason> {
    let app_state = document
        .get_section(APP_STATE_KEY)
        .ok_or(SkipReason::MissingAppState)?;

    let app_id = app_state.get_str(APP_ID_KEY).unwrap_or_default();
    let name = app_state.get_str(NAME_KEY).unwrap_or_default();
    let install_dir = app_state.get_str(INSTALL_DIR_KEY).unwrap_or_default();

    if app_id.is_empty() {
        return Err(SkipReason::MissingAppId);
    }
    if name.is_empty() {
        return Err(SkipReason::MissingName);
    }

    Ok(GameRecord::new(app_id, name, install_dir))
}

/// Reads and parses one manifest file.
pub fn read_app_manifest(path: &Path) -> Result<GameRecord, SkipReason> {
    let document = read_vdf_file(path).map_err(|err| SkipReason::Unreadable(err.to_string()))?;
    debug!(
        path = %path.display(),
        keys = ?document.keys().collect::<Vec<_>>(),
        "Parsed manifest"
    );
    parse_app_manifest(&document)
}

/// Extracts records from every app manifest in the given libraries.
///
/// Libraries are processed in order, manifests within a library by file
/// name.
pub fn extract_records(libraries: &[LibraryDir]) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();

    for library in libraries {
        let steamapps = library.steamapps();
        debug!(library = %library.path.display(), steamapps = %steamapps.display(), "Checking library");

        if !steamapps.is_dir() {
            debug!(path = %steamapps.display(), "steamapps folder not found");
            outcome
                .libraries_without_steamapps
                .push(library.path.clone());
            continue;
        }

        let manifests = match list_app_manifests(&steamapps) {
            Ok(manifests) => manifests,
            Err(err) => {
                debug!(path = %steamapps.display(), error = %err, "Failed to list steamapps");
                outcome
                    .libraries_without_steamapps
                    .push(library.path.clone());
                continue;
            }
        };
        debug!(count = manifests.len(), "Found manifest files");

        for path in manifests {
            match read_app_manifest(&path) {
                Ok(record) => {
                    debug!(name = %record.name, app_id = %record.app_id, "Added");
                    outcome.records.push(record);
                }
                Err(reason) => {
                    debug!(path = %path.display(), %reason, "Skipped manifest");
                    outcome.skipped.push(SkippedManifest { path, reason });
                }
            }
        }
    }

    info!(
        records = outcome.records.len(),
        skipped = outcome.skipped.len(),
        "Extracted app manifests"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::LibrarySource;
    use crate::parser::parse_vdf;

    fn write_manifest(steamapps: &Path, app_id: &str, body: &str) -> PathBuf {
        fs::create_dir_all(steamapps).unwrap();
        let path = steamapps.join(format!("appmanifest_{app_id}.acf"));
        fs::write(&path, body).unwrap();
        path
    }

    fn app_state(fields: &[(&str, &str)]) -> String {
        let mut body = String::from("\"AppState\"\n{\n");
        for (key, value) in fields {
            body.push_str(&format!("\t\"{key}\"\t\t\"{value}\"\n"));
        }
        body.push_str("}\n");
        body
    }

    #[test]
    fn test_parse_manifest_without_installdir() {
        let doc = parse_vdf(&app_state(&[("appid", "440"), ("name", "Team Fortress 2")]));
        assert_eq!(
            parse_app_manifest(&doc),
            Ok(GameRecord {
                app_id: "440".to_string(),
                name: "Team Fortress 2".to_string(),
                install_dir: String::new(),
                launch_ref: "steam://rungameid/440".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_manifest_skip_reasons() {
        assert_eq!(
            parse_app_manifest(&parse_vdf("\"appid\" \"1\"\n")),
            Err(SkipReason::MissingAppState)
        );
        assert_eq!(
            parse_app_manifest(&parse_vdf(&app_state(&[("name", "X")]))),
            Err(SkipReason::MissingAppId)
        );
        assert_eq!(
            parse_app_manifest(&parse_vdf(&app_state(&[("appid", "1")]))),
            Err(SkipReason::MissingName)
        );
        assert_eq!(
            parse_app_manifest(&parse_vdf(&app_state(&[("appid", "1"), ("name", "")]))),
            Err(SkipReason::MissingName)
        );
    }

    #[test]
    fn test_app_state_as_plain_value_is_missing() {
        let doc = parse_vdf("\"AppState\" \"oops\"\n");
        assert_eq!(parse_app_manifest(&doc), Err(SkipReason::MissingAppState));
    }

    #[test]
    fn test_list_app_manifests_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let steamapps = dir.path().join("steamapps");
        write_manifest(&steamapps, "620", "");
        write_manifest(&steamapps, "440", "");
        fs::write(steamapps.join("libraryfolders.vdf"), "").unwrap();
        fs::write(steamapps.join("appmanifest_1.acf.tmp"), "").unwrap();
        fs::create_dir_all(steamapps.join("appmanifest_dir.acf")).unwrap();

        let names: Vec<String> = list_app_manifests(&steamapps)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["appmanifest_440.acf", "appmanifest_620.acf"]);
    }

    #[test]
    fn test_extract_records_across_libraries_keeps_order_and_skips() {
        let lib_a = tempfile::tempdir().unwrap();
        let lib_b = tempfile::tempdir().unwrap();
        let lib_empty = tempfile::tempdir().unwrap();

        write_manifest(
            &lib_a.path().join("steamapps"),
            "620",
            &app_state(&[("appid", "620"), ("name", "Portal 2"), ("installdir", "Portal 2")]),
        );
        let broken = write_manifest(&lib_a.path().join("steamapps"), "999", "garbage\n{\n");
        write_manifest(
            &lib_b.path().join("steamapps"),
            "440",
            &app_state(&[("appid", "440"), ("name", "Team Fortress 2")]),
        );

        let libraries = vec![
            LibraryDir::new(lib_a.path(), LibrarySource::Explicit),
            LibraryDir::new(lib_empty.path(), LibrarySource::Explicit),
            LibraryDir::new(lib_b.path(), LibrarySource::Explicit),
        ];
        let outcome = extract_records(&libraries);

        let names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Portal 2", "Team Fortress 2"]);
        assert_eq!(outcome.records[0].install_dir, "Portal 2");
        assert_eq!(
            outcome.skipped,
            vec![SkippedManifest {
                path: broken,
                reason: SkipReason::MissingAppState,
            }]
        );
        assert_eq!(
            outcome.libraries_without_steamapps,
            vec![lib_empty.path().to_path_buf()]
        );
    }

    #[test]
    fn test_read_app_manifest_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_app_manifest(&dir.path().join("appmanifest_1.acf"));
        assert!(matches!(result, Err(SkipReason::Unreadable(_))));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::MissingAppState.to_string(), "no 'AppState' key found");
        assert_eq!(
            SkipReason::Unreadable("denied".into()).to_string(),
            "unreadable: denied"
        );
    }
}
