//! Parser and extractor tests against real-world Steam files.

use std::fs;
use std::path::{Path, PathBuf};

use launcher_sync_discovery::library::library_paths_from_manifest;
use launcher_sync_discovery::manifest::{parse_app_manifest, read_app_manifest};
use launcher_sync_discovery::parser::{VdfParser, read_vdf_file};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture(name)).unwrap()
}

#[test]
fn test_libraryfolders_fixture_lists_paths_in_order() {
    let doc = read_vdf_file(&fixture("libraryfolders.vdf")).unwrap();
    assert_eq!(
        library_paths_from_manifest(&doc),
        vec![
            PathBuf::from(r"C:\Program Files (x86)\Steam"),
            PathBuf::from(r"D:\SteamLibrary"),
        ]
    );
}

#[test]
fn test_libraryfolders_fixture_keeps_nested_apps() {
    let mut parser = VdfParser::new();
    let doc = parser.parse(&read_fixture("libraryfolders.vdf"));

    let folders = doc.get_section("libraryfolders").unwrap();
    assert_eq!(folders.keys().collect::<Vec<_>>(), vec!["0", "1", "2"]);

    let apps = folders
        .get_section("0")
        .and_then(|folder| folder.get_section("apps"))
        .unwrap();
    assert_eq!(apps.get_str("440"), Some("27964221440"));
    assert!(!parser.diagnostics().is_malformed());
}

#[test]
fn test_app_manifest_fixture() {
    let record = read_app_manifest(&fixture("appmanifest_440.acf")).unwrap();
    assert_eq!(record.app_id, "440");
    assert_eq!(record.name, "Team Fortress 2");
    assert_eq!(record.install_dir, "Team Fortress 2");
    assert_eq!(record.launch_ref, "steam://rungameid/440");
}

#[test]
fn test_app_manifest_fixture_depots_are_sections() {
    let doc = read_vdf_file(&fixture("appmanifest_440.acf")).unwrap();
    let depots = doc
        .get_section("AppState")
        .and_then(|state| state.get_section("InstalledDepots"))
        .unwrap();
    assert_eq!(depots.sections().count(), 2);
    assert_eq!(
        depots.get_section("441").and_then(|d| d.get_str("size")),
        Some("17411485512")
    );
}

#[test]
fn test_malformed_manifest_still_yields_record() {
    let mut parser = VdfParser::new();
    let doc = parser.parse(&read_fixture("appmanifest_malformed.acf"));

    let record = parse_app_manifest(&doc).unwrap();
    assert_eq!(record.app_id, "730");
    assert_eq!(record.name, "Counter-Strike 2");

    let diagnostics = parser.diagnostics();
    assert_eq!(diagnostics.unmatched_close_braces, 1);
    assert_eq!(diagnostics.ignored_lines, 1);
    assert_eq!(diagnostics.stray_open_braces, 1);
    assert_eq!(diagnostics.unclosed_sections, 2);
}

#[test]
fn test_manifest_with_invalid_utf8_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appmanifest_10.acf");
    let mut bytes = b"\"AppState\"\n{\n\"appid\" \"10\"\n\"name\" \"Counter-Strike".to_vec();
    bytes.extend_from_slice(&[0xC0, 0xFF]);
    bytes.extend_from_slice(b"\"\n}\n");
    fs::write(&path, bytes).unwrap();

    let record = read_app_manifest(&path).unwrap();
    assert_eq!(record.name, "Counter-Strike");
}
