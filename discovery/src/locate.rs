//! Steam root directory lookup.
//!
//! On Windows the install path lives in the registry value
//! `HKCU\Software\Valve\Steam\SteamPath`, read here through `reg query` so no
//! platform bindings are needed. Elsewhere the usual install locations under
//! the home directory are probed. Absence is never an error: callers fall
//! back to explicit library paths.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::debug;
use wait_timeout::ChildExt;

#[cfg(not(windows))]
use crate::library::STEAMAPPS_DIR;

/// Registry key holding Steam's per-user settings.
pub const STEAM_REGISTRY_KEY: &str = r"HKCU\Software\Valve\Steam";

/// Registry value holding the install path.
pub const STEAM_PATH_VALUE: &str = "SteamPath";

/// `<name>    REG_<TYPE>    <data>` line of `reg query` output.
static REG_VALUE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+)\s+(REG_[A-Z_]+)\s+(.*?)\s*$").expect("static regex must compile")
});

/// Source of the Steam root directory.
pub trait RootLocator {
    /// Returns the Steam root, or `None` if it cannot be determined.
    fn locate(&self) -> Option<PathBuf>;
}

/// Locator returning a preset answer.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use launcher_sync_discovery::locate::{FixedLocator, RootLocator};
///
/// let locator = FixedLocator(Some(PathBuf::from("/opt/steam")));
/// assert_eq!(locator.locate(), Some(PathBuf::from("/opt/steam")));
/// assert_eq!(FixedLocator(None).locate(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedLocator(pub Option<PathBuf>);

impl RootLocator for FixedLocator {
    fn locate(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Locator that asks the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocator;

impl RootLocator for SystemLocator {
    fn locate(&self) -> Option<PathBuf> {
        let root = locate_steam_root();
        match &root {
            Some(path) => debug!(path = %path.display(), "Located Steam root"),
            None => debug!("Steam root not found"),
        }
        root
    }
}

#[cfg(windows)]
fn locate_steam_root() -> Option<PathBuf> {
    let stdout = registry::query_value(STEAM_REGISTRY_KEY, STEAM_PATH_VALUE)?;
    let raw = parse_reg_query_value(&stdout, STEAM_PATH_VALUE)?;
    Some(PathBuf::from(raw.replace('/', "\\")))
}

#[cfg(not(windows))]
fn locate_steam_root() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from)?;
    candidate_roots(&home)
        .into_iter()
        .find(|root| root.join(STEAMAPPS_DIR).is_dir())
}

/// Conventional Steam install locations under a home directory.
#[cfg(not(windows))]
fn candidate_roots(home: &std::path::Path) -> Vec<PathBuf> {
    vec![
        home.join(".steam").join("steam"),
        home.join(".local").join("share").join("Steam"),
        home.join(".var/app/com.valvesoftware.Steam/data/Steam"),
        home.join("Library").join("Application Support").join("Steam"),
    ]
}

/// Extracts the data of `value_name` from `reg query` output.
///
/// # Examples
///
/// ```
/// use launcher_sync_discovery::locate::parse_reg_query_value;
///
/// let output = "\r\nHKEY_CURRENT_USER\\Software\\Valve\\Steam\r\n    SteamPath    REG_SZ    c:/program files (x86)/steam\r\n\r\n";
/// assert_eq!(
///     parse_reg_query_value(output, "SteamPath").as_deref(),
///     Some("c:/program files (x86)/steam")
/// );
/// ```
pub fn parse_reg_query_value(output: &str, value_name: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let caps = REG_VALUE_LINE.captures(line)?;
        let name = caps.get(1)?.as_str();
        if !name.eq_ignore_ascii_case(value_name) {
            return None;
        }
        let data = caps.get(3)?.as_str();
        (!data.is_empty()).then(|| data.to_string())
    })
}

/// Runs `command` and returns its stdout if it exits successfully within
/// `timeout`. The child is killed on expiry.
///
/// Stdout is drained on a separate thread while waiting, so a child that
/// writes more than the pipe buffer holds still exits.
#[cfg_attr(not(windows), allow(dead_code))]
fn capture_stdout(mut command: Command, timeout: Duration) -> Option<Vec<u8>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| debug!(error = %e, "Failed to spawn locator command"))
        .ok()?;

    let stdout_thread = child.stdout.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let result = pipe.read_to_end(&mut buf);
            (buf, result)
        })
    });

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            debug!(
                timeout_ms = timeout.as_millis() as u64,
                "Locator command timed out, killing process"
            );
            let _ = child.kill();
            let _ = child.wait();
            return None;
        }
        Err(e) => {
            debug!(error = %e, "Failed to wait on locator command");
            let _ = child.kill();
            let _ = child.wait();
            return None;
        }
    };

    let (buf, read_result) = stdout_thread?.join().ok()?;
    if let Err(e) = read_result {
        debug!(error = %e, "Failed to read locator command output");
        return None;
    }
    if !status.success() {
        debug!(exit_code = ?status.code(), "Locator command failed");
        return None;
    }
    Some(buf)
}

#[cfg(windows)]
mod registry {
    use std::process::Command;
    use std::time::Duration;

    /// Timeout for the `reg query` subprocess (milliseconds).
    const REG_QUERY_TIMEOUT_MS: u64 = 5000;

    /// Runs `reg query <key> /v <value>` and returns its stdout on success.
    pub(super) fn query_value(key: &str, value: &str) -> Option<String> {
        let mut command = Command::new("reg");
        command.args(["query", key, "/v", value]);
        let stdout =
            super::capture_stdout(command, Duration::from_millis(REG_QUERY_TIMEOUT_MS))?;
        Some(String::from_utf8_lossy(&stdout).into_owned())
    }
}
