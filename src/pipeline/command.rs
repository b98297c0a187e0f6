/// External tool invocation (ffmpeg, python/trackpy)
///
/// Builds a command line, runs it synchronously, and turns spawn failures
/// and non-zero exits into `TrackerError`s.

use std::io;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Result, TrackerError};

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub command_string: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

/// Builder for external tool commands
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub description: String,
}

impl ToolCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            description: String::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        let arg = path.to_string_lossy().to_string();
        self.arg(arg)
    }

    pub fn describe(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Command string for logging/display. Long inline scripts are elided.
    pub fn to_command_string(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().map(|a| {
            if a.contains('\n') {
                "<script>".to_string()
            } else if a.contains(' ') {
                format!("\"{}\"", a)
            } else {
                a.clone()
            }
        }));
        parts.join(" ")
    }

    /// Run the command; a non-zero exit is an error carrying stderr
    pub fn execute(&self) -> Result<CommandResult> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if self.description.is_empty() {
            log::info!("Executing: {}", self.to_command_string());
        } else {
            log::info!("{}: {}", self.description, self.to_command_string());
        }

        let output: Output = cmd.output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                TrackerError::ToolNotFound {
                    tool: self.program.clone(),
                }
            } else {
                TrackerError::io(&self.program, e)
            }
        })?;

        let result = CommandResult {
            command_string: self.to_command_string(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        };

        if !output.status.success() {
            log::warn!(
                "Command failed (exit {}): {}\nstderr: {}",
                result.exit_code.unwrap_or(-1),
                result.command_string,
                result.stderr
            );
            return Err(TrackerError::CommandFailed {
                command: result.command_string,
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }

        Ok(result)
    }
}

/// Check whether a program can be started at all
pub fn check_tool_available(program: &str, probe_arg: &str) -> bool {
    Command::new(program)
        .arg(probe_arg)
        .output()
        .map(|o| o.status.success() || !o.stdout.is_empty() || !o.stderr.is_empty())
        .unwrap_or(false)
}
