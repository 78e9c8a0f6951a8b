/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! # ApkSignerust Library
//!
//! Batch orchestration for Android packages: zipalign, sign and verify every
//! APK of a file or directory. Alignment and the signature schemes are left to
//! the SDK tools (`zipalign`, `apksigner`); this crate sequences them, names
//! the outputs and reports the results.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod keys;
pub mod naming;
pub mod process;
pub mod processor;
pub mod report;
pub mod signing;
pub mod tools;
pub mod ui;
pub mod verification;
pub mod zipalign;

use std::path::Path;

pub const APP_NAME: &str = "ApkSignerust";
pub const APP_BIN_NAME: &str = "apksignerust";
pub const APP_VERSION: &str = "1.0.0";
pub const APP_AUTHOR: &str = "Tiash H Kabir / @MrCarb0n";
pub const APP_ABOUT: &str = "Batch zipalign, sign and verify Android APK packages.";

/// Extension of the packages the pipeline picks up, compared case-insensitively.
pub const PACKAGE_EXTENSION: &str = "apk";

/// File name of `path` for status lines and error messages.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
