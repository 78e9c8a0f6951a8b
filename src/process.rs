/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Subprocess execution for external tools.
//!
//! The pipeline never spawns processes directly; it goes through
//! [`CommandRunner`] so tests can substitute a recording fake.

use crate::error::SignerError;
use std::{
    ffi::OsString,
    fmt,
    path::Path,
    process::{Command, Stdio},
};

/// Exit status and captured text of one external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Rendered command line, secrets masked
    pub command: String,
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr
    pub output: String,
}

impl ProcessResult {
    pub fn new(program: &Path, args: &[OsString], exit_code: Option<i32>, output: String) -> Self {
        Self {
            command: render_command(program, args),
            exit_code,
            output,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

impl fmt::Display for ProcessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.command)?;
        match self.exit_code {
            Some(code) => writeln!(f, "exit code: {}", code)?,
            None => writeln!(f, "exit code: <terminated by signal>")?,
        }
        let output = self.output.trim_end();
        if !output.is_empty() {
            writeln!(f, "{}", output)?;
        }
        writeln!(f)
    }
}

/// Runs a program with arguments and captures its result.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessResult, SignerError>;
}

/// Spawns real child processes.
///
/// Stdin is inherited so an engine asked to prompt for a password can do so.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessResult, SignerError> {
        log::debug!("spawning {}", render_command(program, args));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .output()
            .map_err(|e| {
                SignerError::Other(format!("failed to execute {}: {}", program.display(), e))
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }

        let result = ProcessResult::new(program, args, output.status.code(), text);
        log::debug!("exit code {:?}", result.exit_code);
        Ok(result)
    }
}

fn render_command(program: &Path, args: &[OsString]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        let arg = arg.to_string_lossy();
        if arg.starts_with("pass:") {
            line.push_str("pass:****");
        } else {
            line.push_str(&arg);
        }
    }
    line
}
