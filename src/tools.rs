/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Discovery of Android SDK build tools.

use crate::error::SignerError;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const SDK_ENV_VARS: [&str; 2] = ["ANDROID_SDK_ROOT", "ANDROID_HOME"];

/// Find `tool`, trying an explicit location, then `PATH`, then the newest
/// `build-tools` directory of the Android SDK.
pub fn locate(tool: &str, explicit: Option<&Path>, hint: &str) -> Result<PathBuf, SignerError> {
    if let Some(path) = explicit {
        if path.is_file() {
            log::debug!("using {} from {}", tool, path.display());
            return Ok(path.to_path_buf());
        }
        return Err(SignerError::ExecutableNotFound {
            tool: tool.to_string(),
            hint: format!("{} is not a file; {}", path.display(), hint),
        });
    }

    match which::which(tool) {
        Ok(path) => {
            log::debug!("found {} in PATH at {}", tool, path.display());
            return Ok(path);
        }
        Err(e) => log::debug!("{} not found in PATH: {}", tool, e),
    }

    for var in SDK_ENV_VARS {
        let Some(sdk) = env::var_os(var) else {
            continue;
        };
        if let Some(path) = find_in_sdk(Path::new(&sdk), tool) {
            log::debug!("found {} via {} at {}", tool, var, path.display());
            return Ok(path);
        }
    }

    Err(SignerError::ExecutableNotFound {
        tool: tool.to_string(),
        hint: hint.to_string(),
    })
}

/// Look for `tool` under `<sdk>/build-tools/<highest version>/`.
pub fn find_in_sdk(sdk: &Path, tool: &str) -> Option<PathBuf> {
    let build_tools = sdk.join("build-tools");
    let mut versions: Vec<(Vec<u32>, PathBuf)> = fs::read_dir(&build_tools)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            parse_version(&name).map(|v| (v, e.path()))
        })
        .collect();
    versions.sort_by(|a, b| b.0.cmp(&a.0));

    versions.into_iter().find_map(|(_, dir)| {
        executable_names(tool)
            .into_iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

fn parse_version(name: &str) -> Option<Vec<u32>> {
    // "34.0.0", "30.0.0-rc1"
    let numeric = name.split('-').next()?;
    numeric
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect()
}

fn executable_names(tool: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![
            format!("{}.exe", tool),
            format!("{}.bat", tool),
            tool.to_string(),
        ]
    } else {
        vec![tool.to_string()]
    }
}
