/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Output file names derived from input names.

use std::path::{Path, PathBuf};

pub const UNALIGNED_MARKER: &str = "-unaligned";
pub const UNSIGNED_MARKER: &str = "-unsigned";
pub const ALIGNED_SUFFIX: &str = "_aligned";
pub const SIGNED_SUFFIX: &str = "_signed";

/// `app-unaligned.apk` -> `<out_dir>/app_aligned.apk`
pub fn aligned_path(source: &Path, out_dir: &Path) -> PathBuf {
    derived_path(source, out_dir, UNALIGNED_MARKER, ALIGNED_SUFFIX)
}

/// `app-unsigned.apk` -> `<out_dir>/app_signed.apk`
pub fn signed_path(source: &Path, out_dir: &Path) -> PathBuf {
    derived_path(source, out_dir, UNSIGNED_MARKER, SIGNED_SUFFIX)
}

fn derived_path(source: &Path, out_dir: &Path, marker: &str, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().replace(marker, ""))
        .unwrap_or_default();
    let name = match source.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    out_dir.join(name)
}
