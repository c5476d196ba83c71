// Resolves command-line options into an `InstallPlan` and implements
// `setup-soroban plan`, which prints that plan as YAML without running it.
// `now` goes through the same resolution so both always agree.

use crate::cli::cmd_enums::InstallArgs;
use crate::libs::errors::InstallError;
use crate::libs::utilities::path_helpers::{cargo_home, expand_path};
use crate::libs::utilities::platform::{
    detect_architecture, detect_os, package_manager_for, release_triple,
};
use crate::schemas::install_plan::{
    InstallPlan, RUSTUP_INIT_URL, StellarRelease, default_checks, default_packages,
};
use crate::{log_debug, log_error, log_warn};
use colored::Colorize;
use std::path::PathBuf;

/// Builds the plan for the machine we are running on.
pub fn build_plan(args: &InstallArgs) -> Result<InstallPlan, InstallError> {
    build_plan_for(args, &detect_os(), &detect_architecture())
}

/// Builds the plan for an explicit (normalized) OS and architecture.
pub fn build_plan_for(args: &InstallArgs, os: &str, arch: &str) -> Result<InstallPlan, InstallError> {
    let triple = release_triple(os, arch)?;
    let package_manager = package_manager_for(os);
    let cargo_bin_dir = cargo_home()
        .ok_or(InstallError::HomeDirUnavailable)?
        .join("bin");

    let version = normalize_version(&args.stellar_version);
    if semver::Version::parse(&version).is_err() {
        log_warn!(
            "[Plan] Stellar CLI version '{}' is not a semantic version; the download will likely fail",
            version.yellow()
        );
    }

    let work_dir = match &args.work_dir {
        Some(dir) => expand_path(dir),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    let plan = InstallPlan {
        package_manager,
        packages: default_packages(package_manager),
        rustup_init_url: RUSTUP_INIT_URL.to_string(),
        rustup_init_args: vec!["-y".to_string()],
        cargo_bin_dir,
        target: args.target.clone(),
        stellar: StellarRelease {
            version,
            triple,
            sha256: args
                .stellar_sha256
                .as_deref()
                .map(|digest| digest.trim().to_ascii_lowercase())
                .filter(|digest| !digest.is_empty()),
        },
        bin_dir: expand_path(&args.bin_dir),
        work_dir,
        start_from: args.from,
        force: args.force,
        checks: default_checks(),
    };
    log_debug!("[Plan] Resolved plan for {}/{}: {:?}", os, arch, plan);
    Ok(plan)
}

/// Release tags are `v23.1.4`; asset names use the bare `23.1.4`.
fn normalize_version(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_prefix('v').unwrap_or(trimmed).to_string()
}

/// Entry point for `setup-soroban plan`. Returns the process exit code.
pub fn run(args: &InstallArgs) -> i32 {
    log_debug!("Entered plan::run() function.");

    let plan = match build_plan(args) {
        Ok(plan) => plan,
        Err(e) => {
            log_error!("{}", e);
            return e.exit_code();
        }
    };

    match serde_yaml::to_string(&plan) {
        Ok(yaml) => {
            print!("{}", yaml);
            0
        }
        Err(e) => {
            log_error!("Failed to serialize the install plan: {}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::cmd_enums::{Cli, Commands};
    use crate::schemas::install_plan::{
        DEFAULT_TARGET, PackageManager, STELLAR_CLI_VERSION, StepId,
    };
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::path::Path;

    fn plan_args(extra: &[&str]) -> InstallArgs {
        let mut argv = vec!["setup-soroban", "plan"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Plan { install } => install,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn leading_v_is_stripped() {
        assert_eq!(normalize_version("v23.1.4"), "23.1.4");
        assert_eq!(normalize_version(" 22.0.0 "), "22.0.0");
    }

    #[sealed_test(env = [("CARGO_HOME", "/opt/cargo")])]
    fn defaults_resolve_to_the_pinned_release() {
        let plan = build_plan_for(&plan_args(&["--work-dir", "/tmp/soroban"]), "linux", "x86_64")
            .unwrap();

        assert_eq!(plan.package_manager, PackageManager::Apt);
        assert_eq!(plan.cargo_bin_dir, Path::new("/opt/cargo/bin"));
        assert_eq!(plan.target, DEFAULT_TARGET);
        assert_eq!(plan.stellar.version, STELLAR_CLI_VERSION);
        assert_eq!(plan.stellar.triple, "x86_64-unknown-linux-gnu");
        assert_eq!(plan.stellar.sha256, None);
        assert_eq!(plan.work_dir, Path::new("/tmp/soroban"));
        assert_eq!(plan.start_from, StepId::SystemPackages);
        assert_eq!(
            plan.archive_path(),
            Path::new("/tmp/soroban/stellar-cli-23.1.4-x86_64-unknown-linux-gnu.tar.gz")
        );
    }

    #[sealed_test(env = [
        ("CARGO_HOME", "/opt/cargo"),
        ("SETUP_SOROBAN_STELLAR_VERSION", "v22.8.1"),
        ("SOROBAN_TOOLS", "/srv/tools"),
    ])]
    fn environment_and_flags_override_defaults() {
        let args = plan_args(&[
            "--bin-dir",
            "$SOROBAN_TOOLS/bin",
            "--stellar-sha256",
            "ABCDEF",
            "--from",
            "verification",
        ]);
        let plan = build_plan_for(&args, "macos", "arm64").unwrap();

        assert_eq!(plan.package_manager, PackageManager::Brew);
        assert_eq!(plan.packages, vec!["git".to_string()]);
        assert_eq!(plan.stellar.version, "22.8.1");
        assert_eq!(plan.stellar.triple, "aarch64-apple-darwin");
        assert_eq!(plan.stellar.sha256.as_deref(), Some("abcdef"));
        assert_eq!(plan.bin_dir, Path::new("/srv/tools/bin"));
        assert_eq!(plan.start_from, StepId::Verification);
    }

    #[sealed_test(env = [("CARGO_HOME", "/opt/cargo")])]
    fn unsupported_platform_is_rejected() {
        let err = build_plan_for(&plan_args(&[]), "windows", "x86_64").unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedPlatform { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[sealed_test(env = [("CARGO_HOME", "/opt/cargo")])]
    fn plan_serializes_with_check_policies() {
        let plan = build_plan_for(&plan_args(&["--work-dir", "/tmp"]), "linux", "arm64").unwrap();
        let yaml = serde_yaml::to_string(&plan).unwrap();

        assert!(yaml.contains("package_manager: apt"));
        assert!(yaml.contains("start_from: system-packages"));
        assert!(yaml.contains("policy: advisory"));
        assert!(!yaml.contains("sha256"));
    }
}
