use crate::schemas::install_plan::{
    DEFAULT_BIN_DIR, DEFAULT_TARGET, STELLAR_CLI_VERSION, StepId,
};
use clap::{Args, Parser, Subcommand};

/// Defines the command-line interface (CLI) for 'setup-soroban'.
/// `#[derive(Parser)]` generates argument parsing code via `clap`.
#[derive(Parser, Debug)]
#[command(name = "setup-soroban")]
#[command(about = "Provision a Soroban development machine: Rust, the wasm target and the Stellar CLI", long_about = None)]
pub struct Cli {
    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long, global = true)]
    pub(crate) debug: bool,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the installer version and check the pinned Stellar CLI against the latest release.
    Version,
    /// Install everything now: system packages, rustup, the wasm target and the Stellar CLI.
    Now {
        #[command(flatten)]
        install: InstallArgs,
        /// Log every command and download without executing anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the resolved install plan as YAML without running it.
    Plan {
        #[command(flatten)]
        install: InstallArgs,
    },
}

/// Options shared by `now` and `plan`. Each one can also come from a
/// `SETUP_SOROBAN_*` environment variable.
#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Stellar CLI release to install (a leading `v` is accepted).
    #[arg(long, env = "SETUP_SOROBAN_STELLAR_VERSION", default_value = STELLAR_CLI_VERSION)]
    pub(crate) stellar_version: String,

    /// Expected SHA-256 of the release archive; the install fails on mismatch.
    #[arg(long, env = "SETUP_SOROBAN_STELLAR_SHA256")]
    pub(crate) stellar_sha256: Option<String>,

    /// Compilation target registered with rustup.
    #[arg(long, env = "SETUP_SOROBAN_TARGET", default_value = DEFAULT_TARGET)]
    pub(crate) target: String,

    /// Directory the `stellar` binary is installed into (`~` and `$VARS` are expanded).
    #[arg(long, env = "SETUP_SOROBAN_BIN_DIR", default_value = DEFAULT_BIN_DIR)]
    pub(crate) bin_dir: String,

    /// Directory the release archive is downloaded to (defaults to the current directory).
    #[arg(long)]
    pub(crate) work_dir: Option<String>,

    /// Resume from this step; earlier steps are skipped.
    #[arg(long, value_enum, default_value_t = StepId::SystemPackages)]
    pub(crate) from: StepId,

    /// Reinstall the Stellar CLI even if the pinned version is already present.
    #[arg(long)]
    pub(crate) force: bool,
}
