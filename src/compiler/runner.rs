//! Process invocation capability.
//!
//! The orchestrator talks to external tools through this narrow trait so
//! tests can substitute a recording fake for `latexmk`/`displayline`.

use crate::utils::exec::Cmd;
use std::path::Path;
use std::process::ExitStatus;

/// Runs one external command to completion in a working directory.
pub trait ProcessRunner {
    /// Run `command` (argv array, program first) with cwd = `cwd`, stdio
    /// inherited, blocking until exit.
    fn run(&self, command: &[String], cwd: &Path) -> std::io::Result<ExitStatus>;
}

/// Real runner backed by [`Cmd`].
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &[String], cwd: &Path) -> std::io::Result<ExitStatus> {
        Cmd::from_slice(command).cwd(cwd).status()
    }
}
