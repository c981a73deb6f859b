//! Preflight module - Checking that the external tools are installed

use anyhow::{Context, Result};
use xshell::{Shell, cmd};

use crate::core::process::resolve_program;

/// Whether `tool --version` runs successfully
pub fn tool_available(sh: &Shell, tool: &str) -> bool {
    let program = resolve_program(tool);
    cmd!(sh, "{program} --version")
        .quiet()
        .ignore_stdout()
        .ignore_stderr()
        .run()
        .is_ok()
}

/// Fail unless `tool` can be run
pub fn require(sh: &Shell, tool: &str) -> Result<()> {
    let program = resolve_program(tool);
    cmd!(sh, "{program} --version")
        .quiet()
        .ignore_stdout()
        .ignore_stderr()
        .run()
        .context(format!("`{tool}` is required but could not be run"))
}
