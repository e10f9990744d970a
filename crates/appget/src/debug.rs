//! Development-only re-run loop
//!
//! While a debugger is attached the process keeps re-running the
//! orchestrator, asking for a fresh argument line each time. Only wired up in
//! `debug_assertions` builds.

use crate::console::Console;
use crate::orchestrator::Orchestrator;
use std::io;

pub const DEBUG_PROMPT: &str = "In debug mode. Please enter arguments";

/// Reports whether an interactive debugging session is attached
pub trait DebugContext: Send + Sync {
    fn is_attached(&self) -> bool;
}

/// Never attached (release builds)
#[derive(Debug, Default)]
pub struct Detached;

impl DebugContext for Detached {
    fn is_attached(&self) -> bool {
        false
    }
}

/// Attached when the process is being traced (`TracerPid` in `/proc/self/status`)
#[derive(Debug, Default)]
pub struct TracerDebugContext;

impl DebugContext for TracerDebugContext {
    fn is_attached(&self) -> bool {
        tracer_pid().map_or(false, |pid| pid != 0)
    }
}

#[cfg(target_os = "linux")]
fn tracer_pid() -> Option<u32> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    status
        .lines()
        .find_map(|line| line.strip_prefix("TracerPid:"))
        .and_then(|pid| pid.trim().parse().ok())
}

#[cfg(not(target_os = "linux"))]
fn tracer_pid() -> Option<u32> {
    None
}

/// Split an operator-entered line into arguments.
///
/// Splits on single spaces only: no quoting, and empty tokens between
/// consecutive spaces are kept.
pub fn split_debug_input(line: &str) -> Vec<String> {
    line.trim_end_matches(|c| c == '\r' || c == '\n')
        .split(' ')
        .map(String::from)
        .collect()
}

/// Ask the operator for an argument line
pub fn prompt_for_arguments(console: &dyn Console) -> io::Result<Vec<String>> {
    console.write_line("");
    console.write_line("");
    console.write_line(DEBUG_PROMPT);
    let line = console.read_line()?;
    Ok(split_debug_input(&line))
}

/// Run once with the real arguments, then keep re-running with empty
/// arguments while `debug` stays attached. Returns the first exit code.
pub async fn run_with_rerun(
    orchestrator: &Orchestrator,
    debug: &dyn DebugContext,
    args: Vec<String>,
) -> i32 {
    let exit_code = orchestrator.run(args).await;

    while debug.is_attached() {
        orchestrator.run(Vec::new()).await;
    }

    exit_code
}
