// Scripted stand-ins for the command runner and the fetcher, plus fixtures,
// shared by the installer and step tests.

use crate::libs::command_runner::{CommandOutcome, CommandRunner, CommandSpec};
use crate::libs::utilities::assets::Fetcher;
use crate::libs::utilities::compression::fixtures::write_tar_gz;
use crate::schemas::install_plan::{
    DEFAULT_TARGET, InstallPlan, PackageManager, RUSTUP_INIT_URL, STELLAR_CLI_VERSION,
    StellarRelease, StepId, default_checks, default_packages,
};
use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

/// Canned reply for a scripted command.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Outcome(CommandOutcome),
    /// The program cannot be spawned.
    Missing,
}

impl Reply {
    pub(crate) fn exit(code: i32) -> Self {
        Reply::Outcome(CommandOutcome {
            code: Some(code),
            stdout: String::new(),
            stderr: format!("exit {code}"),
        })
    }

    pub(crate) fn stdout(text: &str) -> Self {
        Reply::Outcome(CommandOutcome {
            code: Some(0),
            stdout: text.to_string(),
            stderr: String::new(),
        })
    }

    pub(crate) fn missing() -> Self {
        Reply::Missing
    }
}

/// How a scripted reply is matched against `CommandSpec::display`.
#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Prefix(String),
}

impl Matcher {
    fn matches(&self, line: &str) -> bool {
        match self {
            Matcher::Exact(expected) => line == expected,
            Matcher::Prefix(prefix) => line.starts_with(prefix.as_str()),
        }
    }
}

/// Answers by command line (`CommandSpec::display`); anything unscripted
/// succeeds and prints `<program> 1.0.0`.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    replies: Vec<(Matcher, Reply)>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(mut self, command_line: &str, reply: Reply) -> Self {
        self.replies.push((Matcher::Exact(command_line.to_string()), reply));
        self
    }

    /// Like `on`, for command lines whose tail is not known up front
    /// (scratch directories).
    pub(crate) fn on_prefix(mut self, prefix: &str, reply: Reply) -> Self {
        self.replies.push((Matcher::Prefix(prefix.to_string()), reply));
        self
    }

    /// Command lines seen so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(CommandSpec::display).collect()
    }

    /// PATH override handed to the `index`-th call.
    pub(crate) fn path_of(&self, index: usize) -> Option<OsString> {
        self.calls.borrow().get(index).and_then(|spec| {
            spec.envs
                .iter()
                .find(|(key, _)| key == "PATH")
                .map(|(_, value)| value.clone())
        })
    }

    fn answer(&self, spec: &CommandSpec) -> io::Result<CommandOutcome> {
        self.calls.borrow_mut().push(spec.clone());
        let line = spec.display();
        match self.replies.iter().find(|(matcher, _)| matcher.matches(&line)) {
            Some((_, Reply::Outcome(outcome))) => Ok(outcome.clone()),
            Some((_, Reply::Missing)) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: command not found", spec.program),
            )),
            None => Ok(CommandOutcome {
                code: Some(0),
                stdout: format!("{} 1.0.0\n", spec.program),
                stderr: String::new(),
            }),
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn status(&self, spec: &CommandSpec) -> io::Result<CommandOutcome> {
        self.answer(spec).map(|outcome| CommandOutcome {
            code: outcome.code,
            ..CommandOutcome::default()
        })
    }

    fn output(&self, spec: &CommandSpec) -> io::Result<CommandOutcome> {
        self.answer(spec)
    }
}

/// Serves `archive` for `.tar.gz` URLs and a no-op shell script for anything
/// else; URLs containing a `failing` fragment are refused.
pub(crate) struct FakeFetcher {
    archive: Vec<u8>,
    failing: Vec<String>,
    urls: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub(crate) fn new(archive: Vec<u8>) -> Self {
        FakeFetcher {
            archive,
            failing: Vec::new(),
            urls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn failing(mut self, fragment: &str) -> Self {
        self.failing.push(fragment.to_string());
        self
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> io::Result<()> {
        self.urls.borrow_mut().push(url.to_string());
        if self.failing.iter().any(|f| url.contains(f.as_str())) {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("could not resolve host for {url}"),
            ));
        }
        if url.ends_with(".tar.gz") {
            fs::write(dest, &self.archive)
        } else {
            fs::write(dest, b"#!/bin/sh\nexit 0\n")
        }
    }
}

/// Bytes of a release archive containing a `stellar` executable.
pub(crate) fn stellar_archive(scratch: &Path) -> Vec<u8> {
    let path = scratch.join("fixture.tar.gz");
    write_tar_gz(&path, &[("stellar", b"#!/bin/sh\necho stellar 23.1.4\n")]);
    let bytes = fs::read(&path).unwrap();
    fs::remove_file(&path).unwrap();
    bytes
}

/// A Linux plan whose every filesystem location lives under `root`.
pub(crate) fn linux_plan(root: &Path) -> InstallPlan {
    let work_dir = root.join("work");
    fs::create_dir_all(&work_dir).unwrap();
    InstallPlan {
        package_manager: PackageManager::Apt,
        packages: default_packages(PackageManager::Apt),
        rustup_init_url: RUSTUP_INIT_URL.to_string(),
        rustup_init_args: vec!["-y".to_string()],
        cargo_bin_dir: root.join(".cargo").join("bin"),
        target: DEFAULT_TARGET.to_string(),
        stellar: StellarRelease {
            version: STELLAR_CLI_VERSION.to_string(),
            triple: "x86_64-unknown-linux-gnu".to_string(),
            sha256: None,
        },
        bin_dir: root.join("bin"),
        work_dir,
        start_from: StepId::SystemPackages,
        force: false,
        checks: default_checks(),
    }
}

/// Console bytes split into lines.
pub(crate) fn console_lines(console: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(console)
        .lines()
        .map(str::to_string)
        .collect()
}
