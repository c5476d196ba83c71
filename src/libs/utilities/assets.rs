// Network downloads and archive integrity checks.

use crate::{log_debug, log_error, log_info};
use colored::Colorize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// Something that can fetch a URL to a local file.
/// `HttpFetcher` is the real implementation; the Installer only sees this trait.
pub trait Fetcher {
    fn fetch(&self, url: &str, dest: &Path) -> io::Result<()>;
}

/// Fetches over HTTP(S) with `ureq`.
#[derive(Debug, Default)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> io::Result<()> {
        download_file(url, dest)
    }
}

/// Downloads a file from a given URL and saves it to `dest`.
///
/// # Returns
/// * `Ok(())` if the download was successful and the file was saved.
/// * An `io::Error` if the HTTP request, file creation, or copying failed.
///   HTTP status errors (404 for a mistyped version, ...) are reported the same way.
pub fn download_file(url: &str, dest: &Path) -> io::Result<()> {
    log_debug!("[Utils] Starting download from URL: {}", url.blue());

    let response = match ureq::get(url).call() {
        Ok(res) => res,
        Err(e) => {
            log_error!("[Utils] HTTP request failed for {}: {}", url.red(), e);
            return Err(io::Error::other(format!("HTTP error: {e}")));
        }
    };

    let mut file = File::create(dest)?;
    let mut reader = response.into_reader();
    // Stream straight to disk; release archives are tens of megabytes.
    io::copy(&mut reader, &mut file)?;

    log_debug!(
        "[Utils] File downloaded successfully to {}",
        dest.to_string_lossy().green()
    );
    Ok(())
}

/// Lowercase hex SHA-256 of a file's content, streamed.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compares a file against an expected digest.
///
/// # Returns
/// * `Ok(None)` when the digest matches (case-insensitive).
/// * `Ok(Some(actual))` with the computed digest on mismatch.
pub fn verify_sha256(path: &Path, expected: &str) -> io::Result<Option<String>> {
    let actual = sha256_file(path)?;
    if actual.eq_ignore_ascii_case(expected.trim()) {
        log_info!(
            "[Utils] Checksum verified for {}",
            path.display().to_string().green()
        );
        Ok(None)
    } else {
        Ok(Some(actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    // sha256("hello world")
    const HELLO_SHA: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn sha256_of_known_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("payload");
        fs::write(&file, b"hello world").unwrap();

        assert_eq!(sha256_file(&file).unwrap(), HELLO_SHA);
        assert_eq!(verify_sha256(&file, &HELLO_SHA.to_uppercase()).unwrap(), None);
        assert_eq!(
            verify_sha256(&file, "00").unwrap(),
            Some(HELLO_SHA.to_string())
        );
    }

    #[test]
    fn download_of_unreachable_host_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        // Port 9 on localhost: connection refused without touching the network.
        let result = download_file("http://127.0.0.1:9/archive.tar.gz", &dest);
        assert!(result.is_err());
        assert!(!dest.exists());
    }
}
