// Platform detection: which OS/architecture we run on, which package manager
// the first step uses there, and which release triple the Stellar CLI archive
// is published under.

use crate::libs::errors::InstallError;
use crate::log_warn;
use crate::schemas::install_plan::PackageManager;
use colored::Colorize;

/// Detects the system's CPU architecture, normalized ("x86_64", "arm64").
pub fn detect_architecture() -> String {
    normalize_arch(std::env::consts::ARCH)
}

/// Detects the operating system, normalized ("linux", "macos", "windows").
pub fn detect_os() -> String {
    normalize_os(std::env::consts::OS)
}

/// Normalizes OS names to a consistent lowercase format.
pub fn normalize_os(os: &str) -> String {
    match os.to_lowercase().as_str() {
        "macos" | "darwin" | "apple-darwin" => "macos".to_string(),
        "linux" => "linux".to_string(),
        "windows" | "win32" | "win64" => "windows".to_string(),
        other => {
            log_warn!(
                "[Utils] Unknown OS variant '{}', using as-is.",
                other.purple()
            );
            other.to_string()
        }
    }
}

/// Normalizes architecture names to a consistent lowercase format.
pub fn normalize_arch(arch: &str) -> String {
    match arch.to_lowercase().as_str() {
        "aarch64" | "arm64" => "arm64".to_string(),
        "amd64" | "x86_64" => "x86_64".to_string(),
        other => {
            log_warn!(
                "[Utils] Unknown ARCH variant '{}', using as-is.",
                other.purple()
            );
            other.to_string()
        }
    }
}

/// Maps a normalized OS/arch pair onto the triple used in Stellar CLI asset names.
pub fn release_triple(os: &str, arch: &str) -> Result<String, InstallError> {
    let cpu = match arch {
        "x86_64" => "x86_64",
        "arm64" => "aarch64",
        _ => {
            return Err(InstallError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            });
        }
    };
    let vendor_os = match os {
        "linux" => "unknown-linux-gnu",
        "macos" => "apple-darwin",
        _ => {
            return Err(InstallError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            });
        }
    };
    Ok(format!("{cpu}-{vendor_os}"))
}

/// Package manager the system-packages step drives on this OS.
pub fn package_manager_for(os: &str) -> PackageManager {
    match os {
        "macos" => PackageManager::Brew,
        _ => PackageManager::Apt,
    }
}
