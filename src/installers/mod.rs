// One module per provisioning step (or group of steps), each exposing
// functions that take the shared `StepContext` and return
// `Result<(), InstallError>`.
//
// `pub(crate) mod <module_name>;` keeps them internal to `setup-soroban`.

/// Step 1: build tools, curl and git through apt or Homebrew.
pub(crate) mod system_packages;

/// Steps 2-4: rustup bootstrap, PATH activation and the wasm target.
pub(crate) mod rustup;

/// Step 5: the pinned Stellar CLI release archive.
pub(crate) mod stellar_cli;

/// Step 6: `--version` checks with per-tool failure policy.
pub(crate) mod verification;
