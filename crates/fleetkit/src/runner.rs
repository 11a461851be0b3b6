//! Process runner - executes external commands in a working directory.
//!
//! Commands run synchronously with captured output. There is no timeout:
//! a child that never exits blocks the calling worker, and with it the
//! barrier of the pass that spawned it.

use crate::error::ProcessError;
use std::path::Path;
use std::process::Command;

/// Runs an external program and returns its stdout.
///
/// Implement this trait to substitute command execution in tests.
pub trait CommandRunner: Send + Sync {
    /// Run `program args…` inside `working_dir`.
    ///
    /// A non-zero exit status or a spawn failure is a [`ProcessError`].
    fn run(&self, program: &str, args: &[&str], working_dir: &Path)
    -> Result<Vec<u8>, ProcessError>;

    /// Run a command and return stdout as trimmed text.
    fn run_text(
        &self,
        program: &str,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<String, ProcessError> {
        let stdout = self.run(program, args, working_dir)?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<Vec<u8>, ProcessError> {
        let command = command_line(program, args);
        log::debug!("{} $ {}", working_dir.display(), command);

        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .output()
            .map_err(|e| ProcessError {
                command: command.clone(),
                stderr: e.to_string(),
                exit_code: None,
            })?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(ProcessError {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                exit_code: output.status.code(),
            })
        }
    }
}

/// Render a command line for logs and error messages
pub fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
