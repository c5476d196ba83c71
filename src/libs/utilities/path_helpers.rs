// Path resolution helpers: user-supplied directories and the rustup/cargo
// locations the environment-activation step needs.

use crate::log_debug;
use colored::Colorize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Expands `~` and `$VARS` in a user-supplied path.
///
/// Unknown variables leave the input untouched rather than failing, so a
/// literal `$` in a directory name still works.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            log_debug!(
                "[Utils] Could not expand '{}' ({}), using it verbatim",
                path.yellow(),
                e
            );
            PathBuf::from(shellexpand::tilde(path).as_ref())
        }
    }
}

/// Resolves `CARGO_HOME`, falling back to `~/.cargo` the way rustup does.
///
/// # Returns
/// * `Some(PathBuf)` with the cargo home.
/// * `None` if `CARGO_HOME` is unset and the home directory cannot be determined.
pub fn cargo_home() -> Option<PathBuf> {
    if let Some(custom) = std::env::var_os("CARGO_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(custom));
    }
    dirs::home_dir().map(|home| home.join(".cargo"))
}

/// Builds a PATH value with `dir` first, followed by `current` (if any).
///
/// `dir` is not added a second time when it is already the first entry,
/// so re-activating the environment is a no-op.
pub fn prepend_to_path(dir: &Path, current: Option<OsString>) -> OsString {
    let mut entries: Vec<PathBuf> = vec![dir.to_path_buf()];
    if let Some(current) = current {
        entries.extend(std::env::split_paths(&current).filter(|p| p != dir));
    }
    // Only fails when an entry contains the separator itself.
    std::env::join_paths(&entries).unwrap_or_else(|_| {
        let mut fallback = dir.as_os_str().to_os_string();
        if let Some(rest) = entries.get(1..) {
            for entry in rest {
                fallback.push(":");
                fallback.push(entry);
            }
        }
        fallback
    })
}
