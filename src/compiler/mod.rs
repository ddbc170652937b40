//! Document build orchestration.
//!
//! Drives two external tools in sequence: the document build command
//! (latexmk by default) against the directory's entry point, then the
//! viewer-sync command (displayline by default) pointing the PDF viewer at
//! the originating source line. Both run with inherited stdio and no
//! timeout; a failed build must stay fully visible, and retrying it would
//! only repeat the same error.

mod runner;

pub use runner::{ProcessRunner, SystemRunner};

use crate::config::ToolsConfig;
use crate::resolver::{Convention, ResolveError, Resolver};
use crate::{debug, log};
use std::path::Path;
use std::process::ExitStatus;
use thiserror::Error;

/// Orchestration errors. External process failures are fatal to the
/// invocation and carried to the caller as-is; there is no retry.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("`{tool}` failed with {status}")]
    Build { tool: String, status: ExitStatus },

    #[error("`{tool}` failed with {status}")]
    Sync { tool: String, status: ExitStatus },

    #[error("failed to launch `{tool}`")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// What a build invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The directory holds no entry point; nothing was invoked.
    NoEntryPoint,
    /// Build and viewer sync both completed.
    Completed,
}

/// Build the document containing `path`, then sync the viewer to `line`.
///
/// The entry point is found by convention in `path`'s directory; a
/// directory without one is tolerated as a no-op, so editor hooks can fire
/// on any file without special-casing non-document trees.
pub fn build_document(
    tools: &ToolsConfig,
    runner: &dyn ProcessRunner,
    path: &Path,
    line: u32,
) -> Result<BuildOutcome, BuildError> {
    let dir = match path.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };

    let Some(entry) = Resolver::entry_point().find_in_dir(dir)? else {
        debug!("build"; "no entry point in {}, nothing to do", dir.display());
        return Ok(BuildOutcome::NoEntryPoint);
    };
    let entry_name = entry.file_name().unwrap_or_default().to_string_lossy();

    run_build(tools, runner, dir, &entry_name)?;

    let artifact_name = artifact_after_build(dir)?;
    let original_name = path.file_name().unwrap_or_default().to_string_lossy();

    run_sync(tools, runner, dir, line, &artifact_name, &original_name)?;
    Ok(BuildOutcome::Completed)
}

fn run_build(
    tools: &ToolsConfig,
    runner: &dyn ProcessRunner,
    dir: &Path,
    entry_name: &str,
) -> Result<(), BuildError> {
    let tool = tools.build_command.first().cloned().unwrap_or_default();
    log!(
        "build";
        "invoking {} in working directory {} with argument {}",
        tool,
        dir.display(),
        entry_name
    );

    let mut command = tools.build_command.clone();
    command.push(entry_name.to_string());

    let status = runner
        .run(&command, dir)
        .map_err(|source| BuildError::Spawn {
            tool: tool.clone(),
            source,
        })?;
    if !status.success() {
        return Err(BuildError::Build { tool, status });
    }
    Ok(())
}

/// Name of the artifact the build is expected to have produced.
///
/// `<dirname>.pdf` when it exists after the build; otherwise the generic
/// `book.pdf`, accommodating build tools that ignore the preferred name.
/// The fallback itself is not probed.
fn artifact_after_build(dir: &Path) -> Result<String, ResolveError> {
    let resolver = Resolver::artifact();

    if let Some(name) = resolver.conventional_name(dir, Convention::DirName) {
        let preferred = dir.join(&name);
        match preferred.try_exists() {
            Ok(true) => return Ok(name),
            Ok(false) => {}
            Err(e) => return Err(ResolveError::Io(preferred, e)),
        }
    }

    // Book tier always yields a name
    Ok(resolver
        .conventional_name(dir, Convention::Book)
        .unwrap_or_default())
}

fn run_sync(
    tools: &ToolsConfig,
    runner: &dyn ProcessRunner,
    dir: &Path,
    line: u32,
    artifact_name: &str,
    original_name: &str,
) -> Result<(), BuildError> {
    let tool = tools.sync_command.first().cloned().unwrap_or_default();
    log!(
        "build";
        "invoking {} in working directory {} with arguments {} {} {}",
        tool,
        dir.display(),
        line,
        artifact_name,
        original_name
    );

    let mut command = tools.sync_command.clone();
    command.extend([
        "-r".to_string(),
        line.to_string(),
        artifact_name.to_string(),
        original_name.to_string(),
    ]);

    let status = runner
        .run(&command, dir)
        .map_err(|source| BuildError::Spawn {
            tool: tool.clone(),
            source,
        })?;
    if !status.success() {
        return Err(BuildError::Sync { tool, status });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn exit(code: i32) -> ExitStatus {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            ExitStatus::from_raw(code << 8)
        }
        #[cfg(windows)]
        {
            use std::os::windows::process::ExitStatusExt;
            ExitStatus::from_raw(code as u32)
        }
    }

    /// Records invocations; pops exit codes from a preset script.
    struct FakeRunner {
        codes: RefCell<Vec<i32>>,
        calls: RefCell<Vec<(Vec<String>, PathBuf)>>,
    }

    impl FakeRunner {
        fn new(codes: &[i32]) -> Self {
            let mut codes: Vec<_> = codes.to_vec();
            codes.reverse();
            Self {
                codes: RefCell::new(codes),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(Vec<String>, PathBuf)> {
            self.calls.borrow().clone()
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, command: &[String], cwd: &Path) -> std::io::Result<ExitStatus> {
            self.calls
                .borrow_mut()
                .push((command.to_vec(), cwd.to_path_buf()));
            Ok(exit(self.codes.borrow_mut().pop().unwrap_or(0)))
        }
    }

    fn project(name: &str, files: &[&str]) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(name);
        fs::create_dir(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), b"x").unwrap();
        }
        (tmp, dir)
    }

    fn tools() -> ToolsConfig {
        ToolsConfig {
            build_command: vec!["latexmk".into(), "-pdf".into()],
            sync_command: vec!["displayline".into()],
        }
    }

    #[test]
    fn test_no_entry_point_is_a_no_op() {
        let (_tmp, dir) = project("notes", &["scratch.txt"]);
        let runner = FakeRunner::new(&[]);

        let outcome =
            build_document(&tools(), &runner, &dir.join("scratch.txt"), 1).unwrap();

        assert_eq!(outcome, BuildOutcome::NoEntryPoint);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_dirname_entry_beats_main() {
        let (_tmp, dir) = project("projectA", &["projectA.tex", "main.tex"]);
        let runner = FakeRunner::new(&[0, 0]);

        build_document(&tools(), &runner, &dir.join("chapter.tex"), 1).unwrap();

        let calls = runner.calls();
        assert_eq!(calls[0].0, ["latexmk", "-pdf", "projectA.tex"]);
        assert_eq!(calls[0].1, dir);
    }

    #[test]
    fn test_build_failure_suppresses_sync() {
        let (_tmp, dir) = project("projectA", &["projectA.tex"]);
        let runner = FakeRunner::new(&[1]);

        let err = build_document(&tools(), &runner, &dir.join("x.tex"), 1).unwrap_err();

        assert!(matches!(err, BuildError::Build { .. }));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_sync_failure_propagates() {
        let (_tmp, dir) = project("projectA", &["projectA.tex", "projectA.pdf"]);
        let runner = FakeRunner::new(&[0, 2]);

        let err = build_document(&tools(), &runner, &dir.join("x.tex"), 1).unwrap_err();

        assert!(matches!(err, BuildError::Sync { .. }));
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_book_project_end_to_end() {
        // Only book.tex / book.pdf exist; the requested file does not.
        let (_tmp, dir) = project("book", &["book.tex", "book.pdf"]);
        let runner = FakeRunner::new(&[0, 0]);

        let outcome =
            build_document(&tools(), &runner, &dir.join("anything.tex"), 42).unwrap();

        assert_eq!(outcome, BuildOutcome::Completed);
        let calls = runner.calls();
        assert_eq!(calls[0].0, ["latexmk", "-pdf", "book.tex"]);
        assert_eq!(
            calls[1].0,
            ["displayline", "-r", "42", "book.pdf", "anything.tex"]
        );
        assert_eq!(calls[1].1, dir);
    }

    #[test]
    fn test_artifact_prefers_dirname_else_book() {
        let (_tmp, dir) = project("thesis", &["thesis.pdf"]);
        assert_eq!(artifact_after_build(&dir).unwrap(), "thesis.pdf");

        fs::remove_file(dir.join("thesis.pdf")).unwrap();
        // Fallback is not probed: book.pdf need not exist.
        assert_eq!(artifact_after_build(&dir).unwrap(), "book.pdf");
    }
}
