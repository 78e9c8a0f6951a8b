/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Error types for the batch pipeline.
//! Every variant aborts the whole run; nothing here is retried.

use std::io;
use thiserror::Error;

/// Comprehensive error type for all pipeline operations.
#[derive(Debug, Error)]
pub enum SignerError {
    /// Bad paths or argument combinations
    #[error("{0}")]
    InvalidInput(String),

    /// A required external executable could not be located
    #[error("could not find {tool} - {hint}")]
    ExecutableNotFound { tool: String, hint: String },

    /// The signing engine rejected or failed on a package
    #[error("could not sign {file}: {message}")]
    SigningFailed { file: String, message: String },

    /// The verification engine could not inspect a package
    #[error("could not verify {file}: {message}")]
    VerificationFailed { file: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Anything else that went wrong unexpectedly
    #[error("{0}")]
    Other(String),
}

impl SignerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Failure reported by a signing/verification engine before it is tied to a file.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl From<io::Error> for EngineError {
    fn from(e: io::Error) -> Self {
        Self(e.to_string())
    }
}

impl From<SignerError> for EngineError {
    fn from(e: SignerError) -> Self {
        Self(e.to_string())
    }
}
