/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Expands the input argument into candidate packages and an output directory.

use crate::{error::SignerError, PACKAGE_EXTENSION};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    /// Sorted by path
    pub candidates: Vec<PathBuf>,
    pub out_dir: PathBuf,
}

/// Resolve `input` (file or directory) and the optional output override.
///
/// With `create_out` unset a missing output directory is accepted as-is, which
/// is what a dry run wants.
pub fn resolve(
    input: &Path,
    out: Option<&Path>,
    create_out: bool,
) -> Result<ResolvedInput, SignerError> {
    let (mut candidates, default_out) = if input.is_dir() {
        let mut entries = Vec::new();
        for entry in fs::read_dir(input)? {
            entries.push(entry?.path());
        }
        (entries, input.to_path_buf())
    } else if input.exists() {
        let parent = match input.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (vec![input.to_path_buf()], parent)
    } else {
        return Err(SignerError::invalid_input(format!(
            "provided apk path {} does not exist",
            input.display()
        )));
    };

    candidates.sort();

    let out_dir = match out {
        Some(dir) => {
            if !dir.exists() && create_out {
                log::debug!("creating output directory {}", dir.display());
                fs::create_dir_all(dir).map_err(|e| {
                    SignerError::invalid_input(format!(
                        "could not create out directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
            if dir.exists() && !dir.is_dir() {
                return Err(SignerError::invalid_input(format!(
                    "if out directory is provided it must exist and be a path: {}",
                    dir.display()
                )));
            }
            dir.to_path_buf()
        }
        None => default_out,
    };

    Ok(ResolvedInput {
        candidates,
        out_dir,
    })
}

/// Regular file with an `.apk` extension, any case.
pub fn is_package(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(PACKAGE_EXTENSION))
}
