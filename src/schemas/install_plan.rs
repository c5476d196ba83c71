// Defines the data structures describing one provisioning run.
//
// The `InstallPlan` is the resolved, fully-explicit description of what the
// Installer is about to do: which packages, which bootstrap script, which
// compilation target, which Stellar CLI release and where it lands, and the
// verification table with its per-check failure policy. It is built from the
// command-line options and printed by `setup-soroban plan`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stellar CLI release pinned by this installer.
/// Must match a published release tag (without the leading `v`) exactly.
pub const STELLAR_CLI_VERSION: &str = "23.1.4";

/// Base URL the versioned release archive is downloaded from.
pub const STELLAR_RELEASE_BASE_URL: &str = "https://github.com/stellar/stellar-cli/releases/download";

/// Unattended toolchain-manager bootstrap script.
pub const RUSTUP_INIT_URL: &str = "https://sh.rustup.rs";

/// WebAssembly target Soroban contracts are compiled for.
pub const DEFAULT_TARGET: &str = "wasm32v1-none";

/// System-wide directory the `stellar` binary is installed into.
pub const DEFAULT_BIN_DIR: &str = "/usr/local/bin";

/// Name of the executable shipped inside the Stellar CLI archive.
pub const STELLAR_BINARY: &str = "stellar";

/// The six provisioning steps, in the order they run.
///
/// The derived `Ord` follows declaration order, which is execution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    SystemPackages,
    ToolchainBootstrap,
    EnvironmentActivation,
    TargetRegistration,
    CliAcquisition,
    Verification,
}

impl StepId {
    pub const ALL: [StepId; 6] = [
        StepId::SystemPackages,
        StepId::ToolchainBootstrap,
        StepId::EnvironmentActivation,
        StepId::TargetRegistration,
        StepId::CliAcquisition,
        StepId::Verification,
    ];

    /// 1-based position of the step, as shown in progress lines ("[3/6]").
    pub fn ordinal(self) -> usize {
        self as usize + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::SystemPackages => "system-packages",
            StepId::ToolchainBootstrap => "toolchain-bootstrap",
            StepId::EnvironmentActivation => "environment-activation",
            StepId::TargetRegistration => "target-registration",
            StepId::CliAcquisition => "cli-acquisition",
            StepId::Verification => "verification",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            StepId::SystemPackages => "Installing system packages",
            StepId::ToolchainBootstrap => "Bootstrapping rustup",
            StepId::EnvironmentActivation => "Activating the cargo environment",
            StepId::TargetRegistration => "Registering the WebAssembly target",
            StepId::CliAcquisition => "Installing the Stellar CLI",
            StepId::Verification => "Verifying the installation",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a failed verification check does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// A failing check prints a diagnostic and terminates the run with status 1.
    Fatal,
    /// The check's output is printed and its status is never evaluated.
    Advisory,
}

/// One row of the verification table: `<program> --version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCheck {
    /// Human name used in the banner ("Verificando instalación de <label>...").
    pub label: String,
    pub program: String,
    pub policy: FailurePolicy,
}

impl VersionCheck {
    pub fn new(label: &str, program: &str, policy: FailurePolicy) -> Self {
        VersionCheck {
            label: label.to_string(),
            program: program.to_string(),
            policy,
        }
    }
}

/// System package manager used by the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageManager {
    Apt,
    Brew,
}

/// The pinned Stellar CLI release and the platform it is fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StellarRelease {
    pub version: String,
    /// Rust-style target triple used in the asset name, e.g. `x86_64-unknown-linux-gnu`.
    pub triple: String,
    /// Optional lowercase hex SHA-256 digest the archive must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl StellarRelease {
    /// `stellar-cli-<version>-<triple>.tar.gz`
    pub fn archive_name(&self) -> String {
        format!("stellar-cli-{}-{}.tar.gz", self.version, self.triple)
    }

    /// `<base>/v<version>/<archive name>`
    pub fn download_url(&self) -> String {
        format!(
            "{}/v{}/{}",
            STELLAR_RELEASE_BASE_URL,
            self.version,
            self.archive_name()
        )
    }
}

/// Fully resolved description of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallPlan {
    pub package_manager: PackageManager,
    pub packages: Vec<String>,
    pub rustup_init_url: String,
    pub rustup_init_args: Vec<String>,
    /// `$CARGO_HOME/bin`, prepended to PATH by the environment-activation step.
    pub cargo_bin_dir: PathBuf,
    pub target: String,
    pub stellar: StellarRelease,
    pub bin_dir: PathBuf,
    /// Where the release archive is downloaded to (the current directory by default).
    pub work_dir: PathBuf,
    /// First step with side effects that actually runs; earlier ones are skipped.
    pub start_from: StepId,
    /// Reinstall the Stellar CLI even if the pinned version is already present.
    pub force: bool,
    pub checks: Vec<VersionCheck>,
}

impl InstallPlan {
    /// Where the `stellar` binary ends up.
    pub fn stellar_install_path(&self) -> PathBuf {
        self.bin_dir.join(STELLAR_BINARY)
    }

    /// Where the release archive is downloaded to.
    pub fn archive_path(&self) -> PathBuf {
        self.work_dir.join(self.stellar.archive_name())
    }
}

/// Packages the first step installs for a given package manager.
/// `curl` is needed by the rustup bootstrap script itself.
pub fn default_packages(manager: PackageManager) -> Vec<String> {
    let names: &[&str] = match manager {
        PackageManager::Apt => &["build-essential", "curl", "git"],
        PackageManager::Brew => &["git"],
    };
    names.iter().map(|s| s.to_string()).collect()
}

/// The verification table.
///
/// Git is `Advisory`: it is a convenience for contributors, not something the
/// contract build needs, so a missing git never fails the run.
pub fn default_checks() -> Vec<VersionCheck> {
    vec![
        VersionCheck::new("Rust", "rustc", FailurePolicy::Fatal),
        VersionCheck::new("Cargo", "cargo", FailurePolicy::Fatal),
        VersionCheck::new("Rustup", "rustup", FailurePolicy::Fatal),
        VersionCheck::new("Stellar CLI", STELLAR_BINARY, FailurePolicy::Fatal),
        VersionCheck::new("Git", "git", FailurePolicy::Advisory),
    ]
}
