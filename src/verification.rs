/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

use std::path::Path;

use crate::{engine::ApkSignerEngine, error::SignerError, file_label, report::CommandHistory};

/// Parameters forwarded to the verification engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyRequest {
    pub print_certs: bool,
    pub verbose: bool,
    pub min_sdk: Option<u32>,
    pub max_sdk: Option<u32>,
    pub warnings_as_errors: bool,
}

impl VerifyRequest {
    /// Silent check used to decide whether a package is already signed.
    pub fn quiet() -> Self {
        Self::default()
    }

    /// Check whose verdict is shown to the user.
    pub fn reporting(verbose: bool, min_sdk: Option<u32>, max_sdk: Option<u32>) -> Self {
        Self {
            print_certs: verbose,
            verbose,
            min_sdk,
            max_sdk,
            warnings_as_errors: false,
        }
    }
}

/// Verdict of one verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome {
    pub verified: bool,
    /// Free-form diagnostic text from the engine
    pub log: String,
}

/// Ask `engine` whether `apk` carries a valid signature.
pub fn verify_apk<E: ApkSignerEngine + ?Sized>(
    engine: &E,
    apk: &Path,
    request: &VerifyRequest,
    history: &mut CommandHistory,
) -> Result<VerifyOutcome, SignerError> {
    engine
        .verify(apk, request, history)
        .map_err(|e| SignerError::VerificationFailed {
            file: file_label(apk),
            message: e.to_string(),
        })
}
