//! # System Packages Step
//!
//! Bootstraps the C toolchain (linker, `cc`), `curl` for the rustup script,
//! and the git client through the host's package manager.
//!
//! - **apt** (Linux): `apt-get update` followed by `apt-get install -y <packages>`,
//!   both through `sudo` unless the installer already runs as root.
//! - **brew** (macOS): `brew install <packages>`, never elevated (Homebrew refuses root).
//!
//! Both package managers are idempotent, so re-running this step on a
//! provisioned host only re-syncs the package index.

use crate::libs::errors::InstallError;
use crate::libs::installer::StepContext;
use crate::schemas::install_plan::{PackageManager, StepId};
use crate::{log_debug, log_info};
use colored::Colorize;

const STEP: StepId = StepId::SystemPackages;

pub fn run(ctx: &mut StepContext<'_>) -> Result<(), InstallError> {
    let packages = &ctx.plan.packages;
    log_info!(
        "[{}] Installing packages with {:?}: {}",
        STEP,
        ctx.plan.package_manager,
        packages.join(", ").bold()
    );

    match ctx.plan.package_manager {
        PackageManager::Apt => {
            let elevate = needs_sudo(ctx);
            let update = ctx.command("apt-get").arg("update").elevated(elevate);
            ctx.exec(STEP, &update)?;

            let install = ctx
                .command("apt-get")
                .args(["install", "-y"])
                .args(packages.iter().cloned())
                .elevated(elevate);
            ctx.exec(STEP, &install)
        }
        PackageManager::Brew => {
            let install = ctx
                .command("brew")
                .arg("install")
                .args(packages.iter().cloned());
            ctx.exec(STEP, &install)
        }
    }
}

/// `true` unless `id -u` reports uid 0.
/// An undeterminable uid is treated as unprivileged.
fn needs_sudo(ctx: &StepContext<'_>) -> bool {
    match ctx.probe(&ctx.command("id").arg("-u")) {
        Some(outcome) => {
            let is_root = outcome.stdout.trim() == "0";
            log_debug!("[{}] Running as root: {}", STEP, is_root);
            !is_root
        }
        None => true,
    }
}
