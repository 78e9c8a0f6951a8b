/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

use crate::{config::KeystoreArgs, error::SignerError, ui::Ui};
use std::{
    fmt,
    path::{Path, PathBuf},
};

pub const DEBUG_KEY_ALIAS: &str = "androiddebugkey";
pub const DEBUG_KEYSTORE_PASSWORD: &str = "android";
pub const DEBUG_KEYSTORE_FILE: &str = "debug.keystore";

/// Where the keystore of a run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeystoreLocation {
    Release(PathBuf),
    Debug(PathBuf),
}

impl fmt::Display for KeystoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeystoreLocation::Release(p) => write!(f, "release {}", p.display()),
            KeystoreLocation::Debug(p) => write!(f, "debug {}", p.display()),
        }
    }
}

/// Credentials handed to the signing engine. Resolved once per run.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningConfig {
    pub keystore: PathBuf,
    pub alias: String,
    /// `None` makes the engine prompt
    pub store_password: Option<String>,
    /// `None` makes the engine prompt
    pub key_password: Option<String>,
    pub location: KeystoreLocation,
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("keystore", &self.keystore)
            .field("alias", &self.alias)
            .field("store_password", &self.store_password.as_ref().map(|_| "****"))
            .field("key_password", &self.key_password.as_ref().map(|_| "****"))
            .field("location", &self.location)
            .finish()
    }
}

impl SigningConfig {
    /// Pick a release keystore from the arguments, else fall back to a debug keystore.
    pub fn resolve(args: &KeystoreArgs, ui: &Ui) -> Result<Self, SignerError> {
        if let Some(ref keystore) = args.keystore {
            return Self::release(keystore, args);
        }

        let debug_path = match args.debug_keystore {
            Some(ref p) => {
                if !p.is_file() {
                    return Err(SignerError::invalid_input(format!(
                        "debug keystore does not exist: {}",
                        p.display()
                    )));
                }
                p.clone()
            }
            None => default_debug_keystore().ok_or_else(|| {
                SignerError::invalid_input(
                    "no keystore found - provide one with --ks or a debug keystore with --ks-debug",
                )
            })?,
        };

        ui.warn(&format!(
            "Using debug keystore {}. For release builds use --ks.",
            debug_path.display()
        ));
        Ok(Self::debug(debug_path))
    }

    /// The well-known credentials of an SDK-generated debug keystore.
    pub fn debug(keystore: PathBuf) -> Self {
        Self {
            location: KeystoreLocation::Debug(keystore.clone()),
            keystore,
            alias: DEBUG_KEY_ALIAS.to_string(),
            store_password: Some(DEBUG_KEYSTORE_PASSWORD.to_string()),
            key_password: Some(DEBUG_KEYSTORE_PASSWORD.to_string()),
        }
    }

    fn release(keystore: &Path, args: &KeystoreArgs) -> Result<Self, SignerError> {
        if !keystore.is_file() {
            return Err(SignerError::invalid_input(format!(
                "keystore does not exist: {}",
                keystore.display()
            )));
        }
        let alias = args
            .alias
            .clone()
            .ok_or_else(|| SignerError::invalid_input("--ks requires --ks-alias"))?;

        Ok(Self {
            keystore: keystore.to_path_buf(),
            alias,
            store_password: args.store_password.clone(),
            key_password: args.key_password.clone(),
            location: KeystoreLocation::Release(keystore.to_path_buf()),
        })
    }
}

/// `~/.android/debug.keystore`, if it exists.
pub fn default_debug_keystore() -> Option<PathBuf> {
    let path = dirs::home_dir()?.join(".android").join(DEBUG_KEYSTORE_FILE);
    path.is_file().then_some(path)
}
