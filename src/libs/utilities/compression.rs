// Archive extraction for downloaded release assets.

use crate::{log_debug, log_error};
use colored::Colorize;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::Archive;

/// Infers the archive type from the file name ("tar.gz", "tar", or "unknown").
pub fn detect_archive_type(path: &Path) -> &'static str {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        "tar.gz"
    } else if name.ends_with(".tar") {
        "tar"
    } else {
        "unknown"
    }
}

/// Extracts a release archive into a new `extracted` subdirectory of `dest`.
///
/// # Arguments
/// * `src`: The archive file.
/// * `dest`: Parent directory; contents land in `dest/extracted`.
///
/// # Returns
/// * `Ok(PathBuf)` with the path of the `extracted` directory.
/// * An `io::Error` if the archive is corrupt, truncated, or of an unsupported type.
pub fn extract_archive(src: &Path, dest: &Path) -> io::Result<PathBuf> {
    log_debug!(
        "[Utils] Extracting archive {:?} into {:?}",
        src.to_string_lossy().blue(),
        dest.to_string_lossy().cyan()
    );

    let extracted_path = dest.join("extracted");
    fs::create_dir_all(&extracted_path)?;

    match detect_archive_type(src) {
        "tar.gz" => {
            let decompressor = GzDecoder::new(File::open(src)?);
            Archive::new(decompressor).unpack(&extracted_path)?;
            log_debug!("[Utils] Tar.gz archive extracted successfully.");
        }
        "tar" => {
            Archive::new(File::open(src)?).unpack(&extracted_path)?;
            log_debug!("[Utils] Tar archive extracted successfully.");
        }
        other => {
            log_error!(
                "[Utils] Unsupported archive type '{}' for extraction: {:?}",
                other.red(),
                src
            );
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported archive type: {other}"),
            ));
        }
    }

    log_debug!(
        "[Utils] Archive contents available at: {:?}",
        extracted_path.to_string_lossy().green()
    );
    Ok(extracted_path)
}
