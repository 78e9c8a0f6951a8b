/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Adapter over the SDK `zipalign` executable.

use crate::{
    error::SignerError,
    process::{CommandRunner, ProcessResult},
    tools,
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

pub const ZIPALIGN_TOOL: &str = "zipalign";

/// Alignment boundary in bytes.
pub const ALIGNMENT: &str = "4";

pub const NOT_FOUND_HINT: &str =
    "either skip it with --skip-zipalign or provide a proper location with --zipalign-path";

#[derive(Debug, Clone)]
pub struct ZipAlign {
    executable: PathBuf,
}

impl ZipAlign {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn locate(explicit: Option<&Path>) -> Result<Self, SignerError> {
        tools::locate(ZIPALIGN_TOOL, explicit, NOT_FOUND_HINT).map(Self::new)
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// `zipalign 4 <input> <output>`
    pub fn align<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        input: &Path,
        output: &Path,
    ) -> Result<ProcessResult, SignerError> {
        let args: Vec<OsString> = vec![
            ALIGNMENT.into(),
            input.as_os_str().to_owned(),
            output.as_os_str().to_owned(),
        ];
        runner.run(&self.executable, &args)
    }

    /// `zipalign -c 4 <path>`
    pub fn check<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        path: &Path,
    ) -> Result<ProcessResult, SignerError> {
        let args: Vec<OsString> = vec!["-c".into(), ALIGNMENT.into(), path.as_os_str().to_owned()];
        runner.run(&self.executable, &args)
    }
}
