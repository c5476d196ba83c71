// Final step: run `<tool> --version` for every row of the verification table.
//
// Fatal rows echo the tool's output and abort the run with
// "Error: <label> no se instaló correctamente."; advisory rows (git) print
// whatever the tool produced and are never evaluated.

use crate::libs::errors::InstallError;
use crate::libs::installer::StepContext;
use crate::schemas::install_plan::{FailurePolicy, StepId, VersionCheck};
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;

const STEP: StepId = StepId::Verification;

pub fn run(ctx: &mut StepContext<'_>) -> Result<(), InstallError> {
    let plan = ctx.plan;
    if ctx.dry_run {
        log_info!(
            "[{}] (dry run) would check {} tool(s)",
            STEP,
            plan.checks.len()
        );
        return Ok(());
    }
    for check in &plan.checks {
        verify(ctx, check)?;
    }
    Ok(())
}

fn verify(ctx: &mut StepContext<'_>, check: &VersionCheck) -> Result<(), InstallError> {
    ctx.banner(&format!("Verificando instalación de {}...", check.label));

    let spec = ctx.command(&check.program).arg("--version");
    let Some(result) = ctx.capture(&spec) else {
        return Ok(());
    };

    match (check.policy, result) {
        (_, Ok(outcome)) if outcome.success() => {
            ctx.echo(&outcome.stdout);
            Ok(())
        }
        (FailurePolicy::Fatal, Ok(outcome)) => {
            log_debug!("[{}] '{}' exited with {:?}", STEP, spec.display(), outcome.code);
            ctx.echo(&outcome.stdout);
            ctx.echo(&outcome.stderr);
            Err(InstallError::VerificationFailed {
                label: check.label.clone(),
            })
        }
        (FailurePolicy::Fatal, Err(e)) => {
            log_warn!("[{}] '{}' could not run: {}", STEP, spec.display(), e);
            Err(InstallError::VerificationFailed {
                label: check.label.clone(),
            })
        }
        (FailurePolicy::Advisory, Ok(outcome)) => {
            ctx.echo(&outcome.stdout);
            ctx.echo(&outcome.stderr);
            Ok(())
        }
        (FailurePolicy::Advisory, Err(e)) => {
            log_warn!(
                "[{}] {}: {} (not required, continuing)",
                STEP,
                spec.display().yellow(),
                e
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::libs::command_runner::CommandOutcome;
    use crate::libs::installer::{COMPLETION_BANNER, Installer, Stage};
    use crate::libs::testing::{FakeFetcher, Reply, ScriptedRunner, console_lines, linux_plan};
    use crate::schemas::install_plan::StepId;
    use pretty_assertions::assert_eq;

    fn verification_only(runner: &ScriptedRunner) -> (i32, Stage, Vec<String>) {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = linux_plan(dir.path());
        plan.start_from = StepId::Verification;
        let fetcher = FakeFetcher::new(Vec::new());
        let mut console = Vec::new();
        let outcome = Installer::new(&plan, runner, &fetcher, &mut console).run();
        (outcome.exit_code, outcome.stage, console_lines(&console))
    }

    #[test]
    fn all_tools_present_prints_versions_in_order() {
        let runner = ScriptedRunner::new()
            .on("rustc --version", Reply::stdout("rustc 1.90.0 (1159e78c4 2025-09-14)\n"))
            .on("stellar --version", Reply::stdout("stellar 23.1.4\n"));

        let (code, stage, lines) = verification_only(&runner);

        assert_eq!(code, 0);
        assert_eq!(stage, Stage::Done);
        assert_eq!(
            lines,
            vec![
                "Verificando instalación de Rust...",
                "rustc 1.90.0 (1159e78c4 2025-09-14)",
                "Verificando instalación de Cargo...",
                "cargo 1.0.0",
                "Verificando instalación de Rustup...",
                "rustup 1.0.0",
                "Verificando instalación de Stellar CLI...",
                "stellar 23.1.4",
                "Verificando instalación de Git...",
                "git 1.0.0",
                COMPLETION_BANNER,
            ]
        );
    }

    #[test]
    fn missing_stellar_is_fatal() {
        let runner = ScriptedRunner::new().on("stellar --version", Reply::missing());

        let (code, stage, lines) = verification_only(&runner);

        assert_eq!(code, 1);
        assert_eq!(stage, Stage::Failed(StepId::Verification));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Error: Stellar CLI no se instaló correctamente.")
        );
        assert!(!runner.calls().contains(&"git --version".to_string()));
    }

    #[test]
    fn failing_fatal_check_shows_the_tool_output_before_the_diagnostic() {
        let runner = ScriptedRunner::new().on(
            "rustup --version",
            Reply::Outcome(CommandOutcome {
                code: Some(1),
                stdout: String::new(),
                stderr: "error: rustup could not choose a version of rustup to run\n".into(),
            }),
        );

        let (code, stage, lines) = verification_only(&runner);

        assert_eq!(code, 1);
        assert_eq!(stage, Stage::Failed(StepId::Verification));
        assert_eq!(
            lines[lines.len() - 3..].to_vec(),
            vec![
                "Verificando instalación de Rustup...",
                "error: rustup could not choose a version of rustup to run",
                "Error: Rustup no se instaló correctamente.",
            ]
        );
    }

    #[test]
    fn dry_run_prints_no_verification_banners() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = linux_plan(dir.path());
        plan.start_from = StepId::Verification;
        let runner = ScriptedRunner::new();
        let fetcher = FakeFetcher::new(Vec::new());
        let mut console = Vec::new();

        let outcome = Installer::new(&plan, &runner, &fetcher, &mut console)
            .dry_run(true)
            .run();

        assert!(outcome.success());
        assert!(console_lines(&console).is_empty());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn failing_git_is_printed_but_ignored() {
        let runner = ScriptedRunner::new().on("git --version", Reply::exit(127));

        let (code, _, lines) = verification_only(&runner);

        assert_eq!(code, 0);
        assert!(lines.contains(&"exit 127".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some(COMPLETION_BANNER));
    }
}
