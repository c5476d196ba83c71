// Thin seam between the Installer and the external programs it drives
// (apt-get, sh, rustup, stellar, ...). The Installer only ever talks to a
// `CommandRunner`; `SystemRunner` is the real `std::process` implementation.

use crate::log_debug;
use colored::Colorize;
use std::ffi::OsString;
use std::io;
use std::process::{Command, Stdio};

/// A program invocation: program, arguments and environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, OsString)>,
}

impl CommandSpec {
    pub fn new(program: &str) -> Self {
        CommandSpec {
            program: program.to_string(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.envs.push((key.to_string(), value.into()));
        self
    }

    /// Wraps this invocation in `sudo` when `elevate` is set.
    pub fn elevated(self, elevate: bool) -> Self {
        if !elevate {
            return self;
        }
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        CommandSpec {
            program: "sudo".to_string(),
            args,
            envs: self.envs,
        }
    }

    /// `program arg1 arg2 ...`, for logs and error messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a finished invocation.
/// `code` is `None` when the process was terminated by a signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    /// Runs the command with inherited stdio so the tool's own progress and
    /// error text reach the user. Output fields of the outcome are empty.
    fn status(&self, spec: &CommandSpec) -> io::Result<CommandOutcome>;

    /// Runs the command and captures stdout/stderr.
    fn output(&self, spec: &CommandSpec) -> io::Result<CommandOutcome>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn build(spec: &CommandSpec) -> Command {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        // On Unix a PATH override set here is also used to resolve `program`.
        for (key, value) in &spec.envs {
            command.env(key, value);
        }
        command
    }
}

impl CommandRunner for SystemRunner {
    fn status(&self, spec: &CommandSpec) -> io::Result<CommandOutcome> {
        log_debug!("[Runner] Executing: {}", spec.display().cyan());
        let status = Self::build(spec)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(CommandOutcome {
            code: status.code(),
            ..CommandOutcome::default()
        })
    }

    fn output(&self, spec: &CommandSpec) -> io::Result<CommandOutcome> {
        log_debug!("[Runner] Capturing: {}", spec.display().cyan());
        let output = Self::build(spec).stdin(Stdio::null()).output()?;
        Ok(CommandOutcome {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
