//! Launcher configuration types, merging, and persistence.
//!
//! This crate holds the pieces of launcher-sync that do not depend on how
//! games are discovered:
//!
//! - [`GameRecord`]: one discovered title (app id, name, install dir,
//!   launch reference).
//! - [`AppsConfig`]: the launcher's `apps.json` document, existing entries
//!   kept as raw JSON; [`AppEntry`] builds the entries appended to it.
//! - [`merge_records`]: appends entries for records whose display name is
//!   not yet present, never touching existing entries.
//! - [`ConfigStore`]: loads `apps.json` (forgiving) and saves it atomically.
//!
//! # Example
//!
//! ```
//! use launcher_sync_core::*;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = ConfigStore::new(dir.path().join("apps.json"));
//!
//! let discovered = vec![GameRecord::new("440", "Team Fortress 2", "Team Fortress 2")];
//! let outcome = merge_records(store.load().config, &discovered, MergeOptions::default());
//! assert_eq!(outcome.added_count(), 1);
//!
//! store.save(&outcome.config).unwrap();
//! assert!(store.load().config.contains_app("Team Fortress 2"));
//! ```

mod error;
mod merge;
mod store;
mod types;

pub use error::{Result, StoreError};
pub use merge::{MergeOptions, MergeOutcome, merge_records};
pub use store::{
    CONFIG_FILE_NAME, ConfigStore, LoadState, LoadedConfig, default_config_path,
    resolve_config_path,
};
pub use types::*;
