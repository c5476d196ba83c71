//! # Rustup Steps
//!
//! Three consecutive steps own the Rust toolchain:
//!
//! 1. **Toolchain bootstrap** - fetch `https://sh.rustup.rs` into a scratch
//!    directory and run it unattended (`sh <script> -y`). Skipped when
//!    `$CARGO_HOME/bin/rustup --version` already succeeds.
//! 2. **Environment activation** - the in-process equivalent of
//!    `source ~/.cargo/env`: `$CARGO_HOME/bin` is put first on the PATH handed
//!    to every later child process.
//! 3. **Target registration** - `rustup target add <target>`. Rustup treats an
//!    already-installed target as success, so this step is idempotent too.

use crate::libs::errors::InstallError;
use crate::libs::installer::StepContext;
use crate::libs::utilities::path_helpers::prepend_to_path;
use crate::schemas::install_plan::StepId;
use crate::{log_debug, log_info};
use colored::Colorize;

/// Downloads and runs the rustup installer unless rustup is already present.
pub fn bootstrap(ctx: &mut StepContext<'_>) -> Result<(), InstallError> {
    const STEP: StepId = StepId::ToolchainBootstrap;

    let rustup = ctx.plan.cargo_bin_dir.join("rustup");
    let probe = ctx
        .command(&rustup.to_string_lossy())
        .arg("--version");
    if let Some(outcome) = ctx.probe(&probe) {
        log_info!(
            "[{}] rustup is already installed ({}), skipping bootstrap",
            STEP,
            outcome.stdout.trim().green()
        );
        return Ok(());
    }

    // The script is deleted together with the directory when `scratch` drops.
    let scratch = tempfile::Builder::new()
        .prefix("setup-soroban-")
        .tempdir()
        .map_err(|source| InstallError::Download {
            step: STEP,
            url: ctx.plan.rustup_init_url.clone(),
            source,
        })?;
    let script = scratch.path().join("rustup-init.sh");
    ctx.fetch(STEP, &ctx.plan.rustup_init_url, &script)?;

    let install = ctx
        .command("sh")
        .arg(script.to_string_lossy())
        .args(ctx.plan.rustup_init_args.iter().cloned());
    ctx.exec(STEP, &install)?;

    log_info!("[{}] rustup installed", STEP);
    Ok(())
}

/// Makes `$CARGO_HOME/bin`, then the Stellar CLI's `bin_dir`, visible to
/// every later step.
pub fn activate_environment(ctx: &mut StepContext<'_>) -> Result<(), InstallError> {
    let with_bin_dir = prepend_to_path(&ctx.plan.bin_dir, ctx.base_path.clone());
    let path = prepend_to_path(&ctx.plan.cargo_bin_dir, Some(with_bin_dir));
    log_info!(
        "[{}] Using {} and {} for subsequent commands",
        StepId::EnvironmentActivation,
        ctx.plan.cargo_bin_dir.display().to_string().cyan(),
        ctx.plan.bin_dir.display().to_string().cyan()
    );
    log_debug!("[{}] PATH={:?}", StepId::EnvironmentActivation, path);
    ctx.active_path = Some(path);
    Ok(())
}

/// `rustup target add <target>`.
pub fn add_target(ctx: &mut StepContext<'_>) -> Result<(), InstallError> {
    const STEP: StepId = StepId::TargetRegistration;

    let target = &ctx.plan.target;
    let add = ctx.command("rustup").args(["target", "add"]).arg(target.as_str());
    ctx.exec(STEP, &add)?;
    log_info!("[{}] Target {} is available", STEP, target.green());
    Ok(())
}
