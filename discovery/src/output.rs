//! Output formatting for scan reports.

use crate::report::ScanReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Formats a scan report in the requested output format.
pub fn format_report(report: &ScanReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

fn report_to_table(report: &ScanReport) -> String {
    let mut out = String::new();

    if let Some(ref root) = report.steam_root {
        out.push_str(&format!("Steam root: {}\n", root.display()));
    }

    out.push_str(&format!("Libraries: {}\n", report.libraries.len()));
    for library in &report.libraries {
        out.push_str(&format!(
            "  {}  ({})\n",
            library.path.display(),
            library.source
        ));
    }
    for missing in &report.missing_libraries {
        out.push_str(&format!("  {}  (not found)\n", missing.display()));
    }

    out.push_str(&format!("\nGames: {}\n", report.game_count()));
    if !report.games.is_empty() {
        let id_width = report
            .games
            .iter()
            .map(|game| game.app_id.len())
            .max()
            .unwrap_or(5)
            .max(5);
        out.push_str(&format!("  {:<id_width$}  Name\n", "AppID"));
        for game in &report.games {
            out.push_str(&format!("  {:<id_width$}  {}\n", game.app_id, game.name));
        }
    }

    if !report.skipped.is_empty() {
        out.push_str(&format!("\nSkipped manifests: {}\n", report.skipped_count()));
        for skipped in &report.skipped {
            out.push_str(&format!(
                "  {}  ({})\n",
                skipped.path.display(),
                skipped.reason
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use launcher_sync_core::GameRecord;

    use super::*;
    use crate::library::{LibraryDir, LibrarySource};
    use crate::manifest::{SkipReason, SkippedManifest};

    fn sample_report() -> ScanReport {
        ScanReport {
            generated_at: "2024-01-15T10:30:00+00:00".to_string(),
            steam_root: Some(PathBuf::from("/steam")),
            libraries: vec![LibraryDir::new("/steam", LibrarySource::SteamRoot)],
            missing_libraries: Vec::new(),
            libraries_without_steamapps: Vec::new(),
            games: vec![
                GameRecord::new("440", "Team Fortress 2", "Team Fortress 2"),
                GameRecord::new("1245620", "ELDEN RING", "ELDEN RING"),
            ],
            skipped: vec![SkippedManifest {
                path: PathBuf::from("/steam/steamapps/appmanifest_0.acf"),
                reason: SkipReason::MissingName,
            }],
        }
    }

    #[test]
    fn test_format_report_json() {
        let raw = format_report(&sample_report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["games"][0]["launch_ref"], "steam://rungameid/440");
        assert_eq!(value["libraries"][0]["source"], "steam_root");
        assert_eq!(value["skipped"][0]["reason"]["kind"], "missing_name");
        assert!(value.get("missing_libraries").is_none());
    }

    #[test]
    fn test_format_report_yaml() {
        let raw = format_report(&sample_report(), OutputFormat::Yaml).unwrap();
        assert!(raw.contains("name: Team Fortress 2"));
    }

    #[test]
    fn test_format_report_table_aligns_app_ids() {
        let raw = format_report(&sample_report(), OutputFormat::Table).unwrap();
        assert!(raw.contains("Steam root: /steam"));
        assert!(raw.contains("  AppID    Name\n"));
        assert!(raw.contains("  440      Team Fortress 2\n"));
        assert!(raw.contains("  1245620  ELDEN RING\n"));
        assert!(raw.contains("(missing name)"));
    }
}
