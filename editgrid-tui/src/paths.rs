//! Where the demo keeps its logs and settings.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "editgrid";
const APPLICATION: &str = "editgrid";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Log directory.
///
/// - Linux: `$XDG_CACHE_HOME/editgrid` or `~/.cache/editgrid`
/// - macOS: `~/Library/Caches/dev.editgrid.editgrid`
/// - Windows: `C:\Users\<User>\AppData\Local\editgrid\editgrid\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Settings directory.
///
/// - Linux: `$XDG_CONFIG_HOME/editgrid` or `~/.config/editgrid`
/// - macOS: `~/Library/Application Support/dev.editgrid.editgrid`
/// - Windows: `C:\Users\<User>\AppData\Roaming\editgrid\editgrid\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.json"))
}

/// Log of the running session.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

const LATEST_LOG: &str = "latest.log";
const ARCHIVED_LOGS_KEPT: usize = 25;

/// Archives the previous session's log under a timestamp and prunes the
/// archive. Runs before the logger opens `latest.log`.
pub fn rotate_logs() {
    let Some(dir) = cache_dir() else { return };
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, dir.join(format!("{stamp}.log")));
    }
    cleanup_old_logs(&dir, ARCHIVED_LOGS_KEPT);
}

/// Keeps the `keep` most recently modified archived logs.
fn cleanup_old_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut archived: Vec<(Option<SystemTime>, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .map(|entry| {
            let modified = entry.metadata().and_then(|m| m.modified()).ok();
            (modified, entry.path())
        })
        .collect();

    archived.sort();
    let excess = archived.len().saturating_sub(keep);
    for (_, path) in archived.drain(..excess) {
        let _ = fs::remove_file(path);
    }
}
