//! Idempotent merge of discovered records into a launcher configuration.
//!
//! [`merge_records`] appends one [`AppEntry`] per discovered record whose
//! display name is not yet present. Existing entries are never edited,
//! reordered, or removed, so hand-made customizations survive every rerun.
//!
//! # Example
//!
//! ```
//! use launcher_sync_core::*;
//!
//! let discovered = vec![
//!     GameRecord::new("440", "Team Fortress 2", "Team Fortress 2"),
//!     GameRecord::new("620", "Portal 2", "Portal 2"),
//! ];
//!
//! let first = merge_records(AppsConfig::new(), &discovered, MergeOptions::default());
//! assert_eq!(first.added_count(), 2);
//!
//! let second = merge_records(first.config.clone(), &discovered, MergeOptions::default());
//! assert_eq!(second.added_count(), 0);
//! assert_eq!(second.config, first.config);
//! ```

use std::collections::HashSet;

use tracing::debug;

use crate::{AppEntry, AppsConfig, GameRecord, app_name};

/// Settings applied to entries created by a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Mark new entries with `virtual-display: true`.
    pub virtual_display: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            virtual_display: true,
        }
    }
}

/// Result of one merge pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The configuration with new entries appended.
    pub config: AppsConfig,
    /// Names of entries appended, in order.
    pub added: Vec<String>,
    /// Names of discovered records that were already present.
    pub skipped: Vec<String>,
}

impl MergeOutcome {
    /// Number of entries appended by this pass.
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    /// Returns `true` when the configuration changed.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Merges discovered records into `existing`, deduplicating by display name.
///
/// Names are compared exactly (case-sensitive). The seen-set is extended as
/// entries are appended, so two records sharing a name within one batch
/// produce a single entry and the first one wins.
///
/// # Examples
///
/// ```
/// use launcher_sync_core::*;
///
/// let batch = vec![
///     GameRecord::new("10", "Counter-Strike", "Counter-Strike"),
///     GameRecord::new("80", "Counter-Strike", "Counter-Strike Condition Zero"),
/// ];
/// let outcome = merge_records(AppsConfig::new(), &batch, MergeOptions::default());
///
/// assert_eq!(outcome.added_count(), 1);
/// assert_eq!(outcome.config.apps[0]["detached"][0], "steam://rungameid/10");
/// ```
pub fn merge_records(
    existing: AppsConfig,
    discovered: &[GameRecord],
    options: MergeOptions,
) -> MergeOutcome {
    let mut config = existing;
    let mut seen: HashSet<String> = config
        .apps
        .iter()
        .map(|app| app_name(app).to_string())
        .collect();

    let mut added = Vec::new();
    let mut skipped = Vec::new();

    for record in discovered {
        if seen.contains(&record.name) {
            debug!(name = %record.name, "Skipped (already exists)");
            skipped.push(record.name.clone());
            continue;
        }

        config.push_entry(AppEntry::from_record(record, options.virtual_display));
        seen.insert(record.name.clone());
        added.push(record.name.clone());
    }

    MergeOutcome {
        config,
        added,
        skipped,
    }
}
