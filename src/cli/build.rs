//! `build` subcommand: run the orchestrator against a source-tree path.

use crate::compiler::{self, BuildError, BuildOutcome, SystemRunner};
use crate::config::{PreviewConfig, ToolsConfig};
use crate::utils::normalize_path;
use crate::{debug, log};
use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn run_build(config: &PreviewConfig, path: &Path, line: u32) -> Result<()> {
    warn_missing_tools(&config.tools);

    let path = normalize_path(path);
    match compiler::build_document(&config.tools, &SystemRunner, &path, line) {
        Ok(BuildOutcome::NoEntryPoint) => Ok(()),
        Ok(BuildOutcome::Completed) => {
            log!("build"; "done");
            Ok(())
        }
        Err(BuildError::Spawn { tool, source })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            bail!(
                "`{tool}` not found in PATH; install it or point [tools] in texview.toml at your toolchain"
            )
        }
        Err(e) => Err(e).with_context(|| format!("build failed for {}", path.display())),
    }
}

/// Surface missing tools under --verbose before anything is invoked.
fn warn_missing_tools(tools: &ToolsConfig) {
    for command in [&tools.build_command, &tools.sync_command] {
        if let Some(program) = command.first()
            && which::which(program).is_err()
        {
            debug!("build"; "`{}` not found in PATH", program);
        }
    }
}
