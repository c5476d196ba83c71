//! # Stellar CLI Step
//!
//! Installs the pinned Stellar CLI release from its GitHub release archive.
//!
//! ## Workflow
//!
//! 1. **Presence check** - if `<bin_dir>/stellar --version` already reports the
//!    pinned version (and `--force` was not given) the step is a no-op.
//! 2. **Download** - `stellar-cli-<version>-<triple>.tar.gz` into the working directory.
//! 3. **Integrity** - SHA-256 compared against the supplied digest, if any.
//! 4. **Extraction** - into a scratch directory that is removed afterwards.
//! 5. **Relocation** - the `stellar` binary is moved into `bin_dir` and made
//!    executable. When `bin_dir` is not writable by the current user the move
//!    is retried as `sudo install -m 755`.
//! 6. **Cleanup** - the archive is deleted. Only reached on success, so a
//!    failed run leaves the archive behind for inspection.

use crate::libs::errors::InstallError;
use crate::libs::installer::StepContext;
use crate::libs::utilities::assets::verify_sha256;
use crate::libs::utilities::binary::{find_named_executable, make_executable, move_and_rename_binary};
use crate::libs::utilities::compression::extract_archive;
use crate::schemas::install_plan::{STELLAR_BINARY, StepId};
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::Path;

const STEP: StepId = StepId::CliAcquisition;

pub fn run(ctx: &mut StepContext<'_>) -> Result<(), InstallError> {
    let plan = ctx.plan;
    let dest = plan.stellar_install_path();

    if !plan.force && pinned_version_installed(ctx, &dest) {
        log_info!(
            "[{}] Stellar CLI {} already installed at {}, skipping download",
            STEP,
            plan.stellar.version.green(),
            dest.display().to_string().cyan()
        );
        return Ok(());
    }

    let url = plan.stellar.download_url();
    let archive = plan.archive_path();
    ctx.fetch(STEP, &url, &archive)?;
    if ctx.dry_run {
        log_info!(
            "[{}] (dry run) would extract {} and install {}",
            STEP,
            archive.display(),
            dest.display()
        );
        return Ok(());
    }

    check_integrity(&archive, plan.stellar.sha256.as_deref())?;

    let scratch = tempfile::Builder::new()
        .prefix("setup-soroban-")
        .tempdir()
        .map_err(|source| InstallError::Extract {
            archive: archive.clone(),
            source,
        })?;
    let extracted = extract_archive(&archive, scratch.path()).map_err(|source| {
        InstallError::Extract {
            archive: archive.clone(),
            source,
        }
    })?;
    let binary = find_named_executable(&extracted, STELLAR_BINARY).ok_or_else(|| {
        InstallError::BinaryNotFound {
            binary: STELLAR_BINARY.to_string(),
            dir: extracted.clone(),
        }
    })?;

    install_binary(ctx, &binary, &dest)?;

    if let Err(e) = fs::remove_file(&archive) {
        log_warn!(
            "[{}] Failed to remove downloaded archive {}: {}",
            STEP,
            archive.display(),
            e
        );
    }

    log_info!(
        "[{}] Installed Stellar CLI {} to {}",
        STEP,
        plan.stellar.version.green(),
        dest.display().to_string().cyan()
    );
    Ok(())
}

/// `true` when the binary at `dest` runs and mentions the pinned version.
fn pinned_version_installed(ctx: &StepContext<'_>, dest: &Path) -> bool {
    let version = &ctx.plan.stellar.version;
    let probe = ctx.command(&dest.to_string_lossy()).arg("--version");
    match ctx.probe(&probe) {
        Some(outcome) => {
            let matches = outcome.stdout.contains(version.as_str());
            log_debug!(
                "[{}] Installed stellar reports '{}' (pinned {}): match={}",
                STEP,
                outcome.stdout.trim(),
                version,
                matches
            );
            matches
        }
        None => false,
    }
}

fn check_integrity(archive: &Path, expected: Option<&str>) -> Result<(), InstallError> {
    let Some(expected) = expected else {
        log_warn!(
            "[{}] No SHA-256 supplied; {} is installed without integrity verification",
            STEP,
            archive.display().to_string().yellow()
        );
        return Ok(());
    };
    match verify_sha256(archive, expected) {
        Ok(None) => Ok(()),
        Ok(Some(actual)) => Err(InstallError::ChecksumMismatch {
            archive: archive.to_path_buf(),
            expected: expected.to_string(),
            actual,
        }),
        Err(source) => Err(InstallError::Extract {
            archive: archive.to_path_buf(),
            source,
        }),
    }
}

/// Moves the extracted binary into place and sets its executable bit,
/// escalating to `sudo install` when the destination is not writable.
fn install_binary(ctx: &StepContext<'_>, binary: &Path, dest: &Path) -> Result<(), InstallError> {
    match move_and_rename_binary(binary, dest).and_then(|_| make_executable(dest)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            log_info!(
                "[{}] {} is not writable, retrying with sudo",
                STEP,
                ctx.plan.bin_dir.display().to_string().yellow()
            );
            let bin_dir = ctx.plan.bin_dir.to_string_lossy();
            let mkdir = ctx.command("mkdir").args(["-p", &*bin_dir]).elevated(true);
            ctx.exec(STEP, &mkdir)?;
            let install = ctx
                .command("install")
                .args(["-m", "755"])
                .arg(binary.to_string_lossy())
                .arg(dest.to_string_lossy())
                .elevated(true);
            ctx.exec(STEP, &install)
        }
        Err(source) => Err(InstallError::Relocate {
            dest: dest.to_path_buf(),
            source,
        }),
    }
}
