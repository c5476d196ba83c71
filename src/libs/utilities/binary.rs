// Locating, relocating and chmod-ing installed binaries.

use crate::{log_debug, log_error, log_info, log_warn};
use colored::Colorize;
use std::fs;
use std::io;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Recursively searches `dir` for a regular file called `name`.
///
/// Release archives sometimes nest the binary in a versioned folder, so the
/// whole tree is walked. The shallowest match wins.
pub fn find_named_executable(dir: &Path, name: &str) -> Option<PathBuf> {
    log_debug!(
        "[Utils] Searching for '{}' in: {:?}",
        name.bold(),
        dir.to_string_lossy().yellow()
    );

    let found = walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let file_name = entry.file_name().to_string_lossy();
            file_name == name || file_name == format!("{name}.exe")
        })
        .min_by_key(|entry| entry.depth())
        .map(|entry| entry.into_path());

    match &found {
        Some(path) => log_debug!("[Utils] Found executable: {:?}", path.display()),
        None => log_warn!(
            "[Utils] No '{}' executable found within {:?}",
            name,
            dir.to_string_lossy().purple()
        ),
    }
    found
}

/// Moves a binary to its final location, replacing any previous copy.
///
/// Falls back to copy + remove when the rename crosses filesystems
/// (the extraction directory usually lives under /tmp).
pub fn move_and_rename_binary(from: &Path, to: &Path) -> io::Result<()> {
    log_debug!(
        "[Utils] Moving binary from {:?} to {:?}",
        from.to_string_lossy().yellow(),
        to.to_string_lossy().cyan()
    );

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::rename(from, to) {
        Ok(_) => {
            log_debug!(
                "[Utils] Binary moved/renamed to {}",
                to.to_string_lossy().green()
            );
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log_debug!(
                "[Utils] Cross-device move for {:?}, falling back to copy and remove: {}",
                from.display(),
                e
            );
            fs::copy(from, to)?;
            fs::remove_file(from)?;
            log_info!(
                "[Utils] Binary copied to {:?}",
                to.to_string_lossy().green()
            );
            Ok(())
        }
        Err(e) => {
            log_error!(
                "[Utils] Failed to move binary from {:?} to {:?}: {}",
                from.display(),
                to.display(),
                e
            );
            Err(e)
        }
    }
}

/// Sets `0o755` on `path`.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    log_debug!(
        "[Utils] Making {:?} executable",
        path.to_string_lossy().yellow()
    );
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    log_debug!("[Utils] `make_executable` is a no-op on this platform.");
    Ok(())
}
