// Low-level helpers used by the installers.

// Downloads and checksums.
pub mod assets;
pub mod binary;
// Release archive extraction.
pub mod compression;
pub mod path_helpers;
pub mod platform;
