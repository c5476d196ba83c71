// Error taxonomy for the installer.
// Every fatal condition the Installer can hit is one variant here, and each
// variant knows which process exit code it maps to.

use crate::schemas::install_plan::StepId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    /// A provisioning command ran but exited non-zero (or was killed by a signal).
    #[error("[{step}] '{command}' exited with status {}", display_code(.code))]
    CommandFailed {
        step: StepId,
        command: String,
        code: Option<i32>,
    },

    /// The program could not be started at all (usually: not installed / not on PATH).
    #[error("[{step}] could not execute '{program}': {source}")]
    CommandNotFound {
        step: StepId,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("[{step}] download of {url} failed: {source}")]
    Download {
        step: StepId,
        url: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to extract {}: {source}", archive.display())]
    Extract {
        archive: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no '{binary}' executable found in {}", dir.display())]
    BinaryNotFound { binary: String, dir: PathBuf },

    #[error("failed to install binary to {}: {source}", dest.display())]
    Relocate {
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("checksum mismatch for {}: expected {expected}, got {actual}", archive.display())]
    ChecksumMismatch {
        archive: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("{label} no se instaló correctamente.")]
    VerificationFailed { label: String },

    #[error("unsupported platform {os}/{arch} for the Stellar CLI release archives")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("could not determine the home directory to locate the rustup toolchain")]
    HomeDirUnavailable,
}

impl InstallError {
    /// Exit code the process terminates with when this error aborts the run.
    ///
    /// A provisioning command that exited with a real status propagates that
    /// status; every other failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallError::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "<terminated by signal>".to_string())
}
