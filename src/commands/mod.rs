// Register application subcommands.
// Each module corresponds to a specific `setup-soroban` command-line action.

// Provisions the machine now.
pub mod now;
// Resolves options into an install plan and prints it.
pub mod plan;
// Displays the installer version and checks the pinned Stellar CLI release.
pub mod version;
