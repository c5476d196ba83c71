// Core machinery behind the `now` command.

// Spawning external programs.
pub mod command_runner;
pub mod errors;
// Step orchestration and the shared step context.
pub mod installer;
pub mod utilities;

#[cfg(test)]
pub(crate) mod testing;
