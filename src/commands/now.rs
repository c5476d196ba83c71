// This file contains the primary logic for the `setup-soroban now` command.
// It resolves the install plan and hands it to the `Installer` with the real
// process runner and HTTP fetcher.

use crate::cli::cmd_enums::InstallArgs;
use crate::commands::plan::build_plan;
use crate::libs::command_runner::SystemRunner;
use crate::libs::installer::Installer;
use crate::libs::utilities::assets::HttpFetcher;
use crate::{log_debug, log_error, log_info};
use colored::Colorize;
use std::io;

/// Main entry point for the `now` command.
///
/// Runs the six provisioning steps in order and stops at the first failure.
/// Returns the exit code the process should terminate with: 0 on success,
/// the failing command's own status when one is available, 1 otherwise.
pub fn run(args: &InstallArgs, dry_run: bool) -> i32 {
    log_debug!("Entered now::run() function.");

    if dry_run {
        log_info!(
            "'{}' flag is set, commands and downloads are only logged",
            "Dry run".bright_yellow()
        );
    }

    let plan = match build_plan(args) {
        Ok(plan) => plan,
        Err(e) => {
            log_error!("{}", e);
            return e.exit_code();
        }
    };

    let runner = SystemRunner;
    let fetcher = HttpFetcher;
    let stdout = io::stdout();
    let mut console = stdout.lock();

    let outcome = Installer::new(&plan, &runner, &fetcher, &mut console)
        .dry_run(dry_run)
        .run();

    log_debug!(
        "[Now] Finished at {:?} after {} step(s), exit code {}",
        outcome.stage,
        outcome.completed.len(),
        outcome.exit_code
    );
    outcome.exit_code
}
