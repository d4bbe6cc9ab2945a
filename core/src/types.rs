//! Record and configuration type definitions.
//!
//! [`GameRecord`] is what discovery produces for one installed title.
//! [`AppsConfig`] mirrors the launcher's `apps.json` document. Loaded
//! entries stay raw JSON values, so a load/save cycle leaves them intact
//! whatever their field types; [`AppEntry`] only builds appended entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// URI scheme prefix used to launch a Steam title by app id.
pub const LAUNCH_SCHEME_PREFIX: &str = "steam://rungameid/";

/// Top-level key holding the entry list in `apps.json`.
pub const APPS_KEY: &str = "apps";

/// Derives the launch reference for an app id.
///
/// # Examples
///
/// ```
/// use launcher_sync_core::launch_reference;
///
/// assert_eq!(launch_reference("440"), "steam://rungameid/440");
/// ```
pub fn launch_reference(app_id: &str) -> String {
    format!("{LAUNCH_SCHEME_PREFIX}{app_id}")
}

/// One installed title discovered from a library manifest.
///
/// Built once by the extractor and never modified afterwards. Both `app_id`
/// and `name` are non-empty; `install_dir` may be empty when the manifest
/// omits it.
///
/// # Examples
///
/// ```
/// use launcher_sync_core::GameRecord;
///
/// let record = GameRecord::new("440", "Team Fortress 2", "");
/// assert_eq!(record.launch_ref, "steam://rungameid/440");
/// assert!(record.install_dir.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Steam app id (e.g. `"440"`).
    pub app_id: String,
    /// Display name shown in the launcher; the deduplication key.
    pub name: String,
    /// Directory name under `steamapps/common/`.
    pub install_dir: String,
    /// Launch URI derived from `app_id`.
    pub launch_ref: String,
}

impl GameRecord {
    /// Creates a record, deriving the launch reference from `app_id`.
    pub fn new(
        app_id: impl Into<String>,
        name: impl Into<String>,
        install_dir: impl Into<String>,
    ) -> Self {
        let app_id = app_id.into();
        let launch_ref = launch_reference(&app_id);
        Self {
            app_id,
            name: name.into(),
            install_dir: install_dir.into(),
            launch_ref,
        }
    }
}

/// Key of an entry's display name.
pub const NAME_KEY: &str = "name";

/// Display name of a loaded entry, used for deduplication.
///
/// Entries are kept as raw JSON, so a missing or non-string `name` compares
/// as `""`.
///
/// # Examples
///
/// ```
/// use launcher_sync_core::app_name;
/// use serde_json::json;
///
/// assert_eq!(app_name(&json!({"name": "Desktop"})), "Desktop");
/// assert_eq!(app_name(&json!({"cmd": "x"})), "");
/// assert_eq!(app_name(&json!({"name": 7})), "");
/// ```
pub fn app_name(app: &Value) -> &str {
    app.get(NAME_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// A launcher app definition created for a newly discovered record.
///
/// Only appended entries are built through this type. Entries already in
/// `apps.json` stay raw [`Value`]s in [`AppsConfig::apps`], whatever types
/// their fields have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub name: String,
    pub output: String,
    pub cmd: String,
    /// Commands the launcher starts and then detaches from.
    pub detached: Vec<String>,
    pub image_path: String,
    /// Apollo's virtual display mode; written only when set.
    pub virtual_display: bool,
}

impl AppEntry {
    /// Builds the entry appended for a newly discovered record.
    ///
    /// `output`, `cmd` and `image-path` are empty strings and `detached`
    /// holds the launch reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use launcher_sync_core::{AppEntry, GameRecord};
    /// use serde_json::Value;
    ///
    /// let record = GameRecord::new("620", "Portal 2", "Portal 2");
    /// let value = Value::from(AppEntry::from_record(&record, true));
    /// assert_eq!(value["name"], "Portal 2");
    /// assert_eq!(value["detached"][0], "steam://rungameid/620");
    /// assert_eq!(value["virtual-display"], true);
    ///
    /// let plain = Value::from(AppEntry::from_record(&record, false));
    /// assert!(plain.get("virtual-display").is_none());
    /// ```
    pub fn from_record(record: &GameRecord, virtual_display: bool) -> Self {
        Self {
            name: record.name.clone(),
            output: String::new(),
            cmd: String::new(),
            detached: vec![record.launch_ref.clone()],
            image_path: String::new(),
            virtual_display,
        }
    }
}

impl From<AppEntry> for Value {
    fn from(entry: AppEntry) -> Self {
        let mut map = Map::new();
        map.insert(NAME_KEY.to_string(), Value::String(entry.name));
        map.insert("output".to_string(), Value::String(entry.output));
        map.insert("cmd".to_string(), Value::String(entry.cmd));
        map.insert(
            "detached".to_string(),
            Value::Array(entry.detached.into_iter().map(Value::String).collect()),
        );
        map.insert("image-path".to_string(), Value::String(entry.image_path));
        if entry.virtual_display {
            map.insert("virtual-display".to_string(), Value::Bool(true));
        }
        Value::Object(map)
    }
}

/// The launcher's `apps.json` document.
///
/// Existing entries and top-level keys are kept exactly as loaded; only
/// the entry list must be an array for the document to load.
///
/// # Examples
///
/// ```
/// use launcher_sync_core::AppsConfig;
///
/// let config: AppsConfig = serde_json::from_str(r#"{"env": {"PATH": "x"}}"#).unwrap();
/// assert!(config.apps.is_empty());
/// assert!(config.extra.contains_key("env"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppsConfig {
    #[serde(default)]
    pub apps: Vec<Value>,
    /// Top-level keys other than `apps`, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppsConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    pub fn app_count(&self) -> usize {
        self.apps.len()
    }

    /// Appends a newly built entry.
    pub fn push_entry(&mut self, entry: AppEntry) {
        self.apps.push(entry.into());
    }

    /// Looks up an entry by exact display name.
    pub fn find_app(&self, name: &str) -> Option<&Value> {
        self.apps.iter().find(|app| app_name(app) == name)
    }

    /// Returns `true` if an entry with this exact display name exists.
    pub fn contains_app(&self, name: &str) -> bool {
        self.find_app(name).is_some()
    }
}
