//! Blocking external command execution.
//!
//! Used for the shell-outs the scaffolding flow needs (`git clone`,
//! `composer install`, `composer dump-autoload`). Commands inherit the
//! caller's stdio so their progress output stays visible.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when running an external command
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
    },
}

/// Run a command to completion in the given working directory.
///
/// Fails when the command cannot be started or exits non-zero.
pub fn run_command(program: &str, args: &[&str], cwd: &Path) -> Result<(), ProcessError> {
    let rendered = render(program, args);
    info!(command = %rendered, cwd = %cwd.display(), "running command");

    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .status()
        .map_err(|source| ProcessError::Spawn {
            command: rendered.clone(),
            source,
        })?;

    debug!(command = %rendered, status = %status, "command finished");

    if !status.success() {
        return Err(ProcessError::Failed {
            command: rendered,
            status,
        });
    }

    Ok(())
}

fn render(program: &str, args: &[&str]) -> String {
    let mut rendered = String::from(program);
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    #[cfg(unix)]
    fn successful_command_returns_ok() {
        let temp = TempDir::new().unwrap();
        run_command("true", &[], temp.path()).unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn failing_command_reports_status() {
        let temp = TempDir::new().unwrap();
        let err = run_command("false", &[], temp.path()).unwrap_err();
        assert!(matches!(err, ProcessError::Failed { .. }));
    }

    #[test]
    fn missing_binary_reports_spawn_error() {
        let temp = TempDir::new().unwrap();
        let err = run_command("studio-no-such-binary", &[], temp.path()).unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}
