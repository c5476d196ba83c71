// The Installer: runs the six provisioning steps in order and stops at the
// first fatal failure.
//
// Progress is a linear chain Start -> Completed(step) -> ... -> Done with a
// single absorbing Failed(step) state. There are no retries and no backward
// transitions; resuming is done by re-running with `--from <step>`.

use crate::installers::{rustup, stellar_cli, system_packages, verification};
use crate::libs::command_runner::{CommandOutcome, CommandRunner, CommandSpec};
use crate::libs::errors::InstallError;
use crate::libs::utilities::assets::Fetcher;
use crate::schemas::install_plan::{InstallPlan, StepId};
use crate::{log_debug, log_error, log_info};
use colored::Colorize;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;

/// Final line printed on a successful run.
pub const COMPLETION_BANNER: &str = "Instalación completada correctamente";

/// Where the run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Completed(StepId),
    Done,
    Failed(StepId),
}

/// What `Installer::run` hands back to `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub stage: Stage,
    /// Steps that ran to completion, in order. Skipped steps are not listed.
    pub completed: Vec<StepId>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Everything a step needs: the plan, the external seams, and the PATH the
/// environment-activation step builds for later children.
pub struct StepContext<'a> {
    pub plan: &'a InstallPlan,
    runner: &'a dyn CommandRunner,
    fetcher: &'a dyn Fetcher,
    console: &'a mut dyn Write,
    pub dry_run: bool,
    /// PATH of the installer process when it started.
    pub base_path: Option<OsString>,
    /// PATH handed to children once the cargo environment is active.
    pub active_path: Option<OsString>,
}

impl<'a> StepContext<'a> {
    /// A command carrying the activated PATH, if any.
    pub fn command(&self, program: &str) -> CommandSpec {
        let spec = CommandSpec::new(program);
        match &self.active_path {
            Some(path) => spec.env("PATH", path.clone()),
            None => spec,
        }
    }

    /// Runs a provisioning command with inherited stdio; any failure is fatal for `step`.
    pub fn exec(&self, step: StepId, spec: &CommandSpec) -> Result<(), InstallError> {
        log_info!("[{}] Executing: {}", step, spec.display().cyan().bold());
        if self.dry_run {
            log_info!("[{}] (dry run) not executed", step);
            return Ok(());
        }
        let outcome = self
            .runner
            .status(spec)
            .map_err(|source| InstallError::CommandNotFound {
                step,
                program: spec.program.clone(),
                source,
            })?;
        if outcome.success() {
            Ok(())
        } else {
            Err(InstallError::CommandFailed {
                step,
                command: spec.display(),
                code: outcome.code,
            })
        }
    }

    /// Runs a command and captures its output. `None` in dry-run mode.
    pub fn capture(&self, spec: &CommandSpec) -> Option<io::Result<CommandOutcome>> {
        if self.dry_run {
            log_info!("[Installer] (dry run) would run: {}", spec.display().cyan());
            return None;
        }
        Some(self.runner.output(spec))
    }

    /// Read-only probe: the outcome when the command runs and exits 0.
    /// Probes have no side effects, so they also run in dry-run mode.
    pub fn probe(&self, spec: &CommandSpec) -> Option<CommandOutcome> {
        match self.runner.output(spec) {
            Ok(outcome) if outcome.success() => Some(outcome),
            Ok(_) => None,
            Err(e) => {
                log_debug!("[Installer] Probe '{}' failed to start: {}", spec.display(), e);
                None
            }
        }
    }

    pub fn fetch(&self, step: StepId, url: &str, dest: &Path) -> Result<(), InstallError> {
        log_info!(
            "[{}] Downloading {} -> {}",
            step,
            url.blue(),
            dest.display().to_string().cyan()
        );
        if self.dry_run {
            log_info!("[{}] (dry run) not downloaded", step);
            return Ok(());
        }
        self.fetcher
            .fetch(url, dest)
            .map_err(|source| InstallError::Download {
                step,
                url: url.to_string(),
                source,
            })
    }

    /// Writes one line to the console (stdout in production).
    pub fn banner(&mut self, line: &str) {
        // A closed stdout must not turn a successful install into a failure.
        let _ = writeln!(self.console, "{line}");
        let _ = self.console.flush();
    }

    /// Echoes captured tool output verbatim, without a trailing blank line.
    pub fn echo(&mut self, text: &str) {
        let text = text.trim_end();
        if !text.is_empty() {
            self.banner(text);
        }
    }
}

pub struct Installer<'a> {
    ctx: StepContext<'a>,
    stage: Stage,
    completed: Vec<StepId>,
}

impl<'a> Installer<'a> {
    pub fn new(
        plan: &'a InstallPlan,
        runner: &'a dyn CommandRunner,
        fetcher: &'a dyn Fetcher,
        console: &'a mut dyn Write,
    ) -> Self {
        Installer {
            ctx: StepContext {
                plan,
                runner,
                fetcher,
                console,
                dry_run: false,
                base_path: std::env::var_os("PATH"),
                active_path: None,
            },
            stage: Stage::Start,
            completed: Vec::new(),
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.ctx.dry_run = dry_run;
        self
    }

    /// Overrides the PATH the environment-activation step extends.
    pub fn base_path(mut self, path: Option<OsString>) -> Self {
        self.ctx.base_path = path;
        self
    }

    /// Runs every step in order, short-circuiting on the first fatal error.
    pub fn run(&mut self) -> RunOutcome {
        let total = StepId::ALL.len();
        for step in StepId::ALL {
            // Activation has no side effects and every later step depends on it.
            if step < self.ctx.plan.start_from && step != StepId::EnvironmentActivation {
                log_info!(
                    "[{}/{}] {} {}",
                    step.ordinal(),
                    total,
                    step.describe(),
                    "(skipped)".dimmed()
                );
                continue;
            }

            log_info!(
                "[{}/{}] {}",
                step.ordinal(),
                total,
                step.describe().bold()
            );
            match self.run_step(step) {
                Ok(()) => {
                    self.completed.push(step);
                    self.stage = Stage::Completed(step);
                }
                Err(e) => {
                    self.stage = Stage::Failed(step);
                    return self.fail(e);
                }
            }
        }

        self.stage = Stage::Done;
        if self.ctx.dry_run {
            log_info!("[Installer] (dry run) nothing was installed");
        } else {
            self.ctx.banner(COMPLETION_BANNER);
        }
        RunOutcome {
            exit_code: 0,
            stage: self.stage,
            completed: self.completed.clone(),
        }
    }

    fn run_step(&mut self, step: StepId) -> Result<(), InstallError> {
        match step {
            StepId::SystemPackages => system_packages::run(&mut self.ctx),
            StepId::ToolchainBootstrap => rustup::bootstrap(&mut self.ctx),
            StepId::EnvironmentActivation => rustup::activate_environment(&mut self.ctx),
            StepId::TargetRegistration => rustup::add_target(&mut self.ctx),
            StepId::CliAcquisition => stellar_cli::run(&mut self.ctx),
            StepId::Verification => verification::run(&mut self.ctx),
        }
    }

    fn fail(&mut self, error: InstallError) -> RunOutcome {
        match &error {
            InstallError::VerificationFailed { .. } => {
                self.ctx.banner(&format!("Error: {error}"));
            }
            _ => log_error!("{}", error.to_string().red()),
        }
        RunOutcome {
            exit_code: error.exit_code(),
            stage: self.stage,
            completed: self.completed.clone(),
        }
    }
}
