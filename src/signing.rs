/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Signing adapter: turns a [`SigningConfig`] into an engine invocation.

use crate::{
    engine::ApkSignerEngine, error::SignerError, file_label, keys::SigningConfig,
    report::CommandHistory,
};
use std::{ffi::OsString, path::Path};

/// Password argument that makes the engine ask on the terminal.
pub const PROMPT_SENTINEL: &str = "stdin";

fn password_arg(password: Option<&str>) -> OsString {
    match password {
        Some(p) => format!("pass:{}", p).into(),
        None => PROMPT_SENTINEL.into(),
    }
}

/// Argument list for one `sign` invocation, in engine order.
pub fn sign_args(
    config: &SigningConfig,
    input: &Path,
    output: &Path,
    verbose: bool,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "sign".into(),
        "--ks".into(),
        config.keystore.as_os_str().to_owned(),
        "--ks-pass".into(),
        password_arg(config.store_password.as_deref()),
        "--key-pass".into(),
        password_arg(config.key_password.as_deref()),
        "--ks-key-alias".into(),
        config.alias.as_str().into(),
        "--out".into(),
        output.as_os_str().to_owned(),
    ];
    if verbose {
        args.push("--verbose".into());
    }
    args.push(input.as_os_str().to_owned());
    args
}

/// Sign `input` into `output`. Returns the engine log.
pub fn sign_apk<E: ApkSignerEngine + ?Sized>(
    engine: &E,
    config: &SigningConfig,
    input: &Path,
    output: &Path,
    verbose: bool,
    history: &mut CommandHistory,
) -> Result<String, SignerError> {
    let args = sign_args(config, input, output, verbose);
    engine.sign(&args, history).map_err(|e| SignerError::SigningFailed {
        file: file_label(input),
        message: e.to_string(),
    })
}
