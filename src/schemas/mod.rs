// Data structures shared across the installer.

// The resolved install plan, step identifiers and verification table.
pub mod install_plan;
