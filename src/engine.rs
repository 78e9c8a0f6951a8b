/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Signing and verification engines.
//!
//! The signature schemes themselves live in the engine; this crate only
//! hands it arguments and reads back its verdict.

use crate::{
    error::{EngineError, SignerError},
    process::{CommandRunner, SystemRunner},
    report::CommandHistory,
    tools,
    verification::{VerifyOutcome, VerifyRequest},
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

pub const APKSIGNER_TOOL: &str = "apksigner";

const NOT_FOUND_HINT: &str =
    "install the Android SDK build-tools or provide a location with --apksigner-path";

/// Capability interface over an APK signing/verification engine.
///
/// Engines that spawn processes append each result to `history`.
pub trait ApkSignerEngine {
    /// Run a `sign ...` invocation; returns the engine's log text.
    fn sign(&self, args: &[OsString], history: &mut CommandHistory) -> Result<String, EngineError>;

    /// Inspect `apk` and report whether its signature holds.
    fn verify(
        &self,
        apk: &Path,
        request: &VerifyRequest,
        history: &mut CommandHistory,
    ) -> Result<VerifyOutcome, EngineError>;
}

/// Engine backed by the SDK `apksigner` executable.
#[derive(Debug, Clone)]
pub struct ApkSignerTool<R = SystemRunner> {
    executable: PathBuf,
    runner: R,
}

impl ApkSignerTool<SystemRunner> {
    pub fn locate(explicit: Option<&Path>) -> Result<Self, SignerError> {
        let executable = tools::locate(APKSIGNER_TOOL, explicit, NOT_FOUND_HINT)?;
        Ok(Self::with_runner(executable, SystemRunner))
    }
}

impl<R: CommandRunner> ApkSignerTool<R> {
    pub fn with_runner(executable: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            executable: executable.into(),
            runner,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn verify_args(apk: &Path, request: &VerifyRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["verify".into()];
        if request.print_certs {
            args.push("--print-certs".into());
        }
        if request.verbose {
            args.push("-v".into());
        }
        if let Some(min) = request.min_sdk {
            args.push("--min-sdk-version".into());
            args.push(min.to_string().into());
        }
        if let Some(max) = request.max_sdk {
            args.push("--max-sdk-version".into());
            args.push(max.to_string().into());
        }
        if request.warnings_as_errors {
            args.push("-Werr".into());
        }
        args.push(apk.as_os_str().to_owned());
        args
    }
}

impl<R: CommandRunner> ApkSignerEngine for ApkSignerTool<R> {
    fn sign(&self, args: &[OsString], history: &mut CommandHistory) -> Result<String, EngineError> {
        let result = self.runner.run(&self.executable, args)?;
        let (success, exit_code) = (result.success(), result.exit_code);
        let output = result.output.clone();
        history.record(result);

        if success {
            return Ok(output);
        }
        let detail = output.trim();
        Err(EngineError(if detail.is_empty() {
            format!("{} exited with {:?}", APKSIGNER_TOOL, exit_code)
        } else {
            detail.to_string()
        }))
    }

    fn verify(
        &self,
        apk: &Path,
        request: &VerifyRequest,
        history: &mut CommandHistory,
    ) -> Result<VerifyOutcome, EngineError> {
        let result = self
            .runner
            .run(&self.executable, &Self::verify_args(apk, request))?;
        let exit_code = result.exit_code;
        let log = result.output.clone();
        history.record(result);

        match exit_code {
            Some(code) => Ok(VerifyOutcome {
                verified: code == 0,
                log,
            }),
            None => Err(EngineError(format!(
                "{} was terminated before finishing",
                APKSIGNER_TOOL
            ))),
        }
    }
}
