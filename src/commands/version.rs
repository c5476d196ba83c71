// This file handles version reporting for the `setup-soroban` tool.
// It prints the installer's own version and compares the pinned Stellar CLI
// release against the latest one published on GitHub.

use crate::schemas::install_plan::STELLAR_CLI_VERSION;
use crate::{log_error, log_info, log_warn}; // Custom logging macros.
use anyhow::{Context, bail};
use colored::Colorize; // For colored terminal output.
use semver::Version;
use serde::Deserialize;
use std::cmp::Ordering;

// GitHub repository the Stellar CLI is released from.
const REPO_OWNER: &str = "stellar";
const REPO_NAME: &str = "stellar-cli";

/// The only field of the GitHub release API response we care about.
#[derive(Deserialize)]
struct GitHubRelease {
    tag_name: String, // e.g. "v23.1.4"
}

/// Fetches the tag of the latest Stellar CLI release.
fn get_latest_github_release() -> anyhow::Result<String> {
    let url = format!(
        "https://api.github.com/repos/{}/{}/releases/latest",
        REPO_OWNER, REPO_NAME
    );

    let agent = ureq::AgentBuilder::new()
        .user_agent("setup-soroban-version-checker")
        .build();

    let response = agent
        .get(&url)
        .call()
        .with_context(|| format!("request to {} failed", url))?;

    let is_json = response
        .header("content-type")
        .is_some_and(|ct| ct.contains("application/json"));
    if !is_json {
        bail!("GitHub returned unexpected content type, not JSON.");
    }

    let release: GitHubRelease = response
        .into_json()
        .context("could not decode the GitHub release response")?;
    Ok(release.tag_name)
}

/// Parses a version or release tag, tolerating a leading `v`.
fn parse_version(raw: &str) -> anyhow::Result<Version> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(bare).with_context(|| format!("'{}' is not a semantic version", raw))
}

/// Orders the pinned version relative to the latest release tag.
pub fn compare_versions(pinned: &str, latest_tag: &str) -> anyhow::Result<Ordering> {
    Ok(parse_version(pinned)?.cmp(&parse_version(latest_tag)?))
}

/// Main function for `setup-soroban version`. Always exits 0; a failed
/// lookup is reported but is not an error of the installer itself.
pub fn run() -> i32 {
    println!("setup-soroban {}", env!("CARGO_PKG_VERSION"));
    log_info!("Pinned Stellar CLI release: {}", STELLAR_CLI_VERSION.green());

    log_info!("Checking for latest Stellar CLI release...");
    let latest = match get_latest_github_release() {
        Ok(tag) => tag,
        Err(e) => {
            log_error!("Failed to fetch the latest release from GitHub: {:#}", e);
            return 0;
        }
    };
    log_info!("Latest GitHub release: {}", latest.cyan());

    match compare_versions(STELLAR_CLI_VERSION, &latest) {
        Ok(Ordering::Less) => log_warn!(
            "A newer Stellar CLI ({}) is available; pass --stellar-version to install it.",
            latest.yellow()
        ),
        Ok(Ordering::Equal) => log_info!("The pinned Stellar CLI is the latest release."),
        Ok(Ordering::Greater) => log_warn!(
            "The pinned Stellar CLI is newer than the latest published release ({}).",
            latest.yellow()
        ),
        Err(e) => log_error!("Could not compare versions: {:#}", e),
    }
    0
}
