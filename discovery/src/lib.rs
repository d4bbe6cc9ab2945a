//! Offline discovery of installed Steam games.
//!
//! This crate reads Steam's own bookkeeping files and turns them into
//! [`GameRecord`]s:
//!
//! - [`parser`]: forgiving parser for the brace-delimited VDF text format.
//! - [`locate`]: finds the Steam install root (registry on Windows).
//! - [`library`]: expands the root into library folders via
//!   `libraryfolders.vdf`, or takes explicit paths.
//! - [`manifest`]: extracts one record per `appmanifest_*.acf`.
//! - [`discover::scan`]: all of the above in one call.
//!
//! Nothing here fails on bad input: malformed files are skipped and
//! reported, and a missing Steam install yields an empty result.
//!
//! # Example
//!
//! ```
//! use std::fs;
//! use launcher_sync_discovery::discover::{ScanConfig, scan};
//!
//! let root = tempfile::tempdir().unwrap();
//! let steamapps = root.path().join("steamapps");
//! fs::create_dir_all(&steamapps).unwrap();
//! fs::write(
//!     steamapps.join("appmanifest_440.acf"),
//!     "\"AppState\"\n{\n\t\"appid\"\t\"440\"\n\t\"name\"\t\"Team Fortress 2\"\n}\n",
//! )
//! .unwrap();
//!
//! let outcome = scan(&ScanConfig {
//!     root: Some(root.path().to_path_buf()),
//!     explicit_libraries: Vec::new(),
//! });
//! assert_eq!(outcome.extraction.records[0].launch_ref, "steam://rungameid/440");
//! ```
//!
//! [`GameRecord`]: launcher_sync_core::GameRecord

pub mod discover;
pub mod library;
pub mod locate;
pub mod manifest;
pub mod output;
pub mod parser;
pub mod report;

pub use discover::{DiscoverError, ScanConfig, ScanOutcome, scan};
