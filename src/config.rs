/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Configuration parsing and validation for the ApkSignerust CLI.

use crate::error::SignerError;
use clap::ArgMatches;
use std::path::PathBuf;

/// Switches that shape the per-file pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Skip alignment and signing, only verify
    pub only_verify: bool,
    /// Report intended actions without running anything
    pub dry_run: bool,
    /// Never invoke zipalign
    pub skip_zipalign: bool,
    /// Replace packages in place instead of writing renamed copies
    pub overwrite: bool,
    /// Surface engine logs
    pub verbose: bool,
    pub min_sdk: Option<u32>,
    pub max_sdk: Option<u32>,
}

impl ProcessOptions {
    /// Whether the run needs zipalign at all.
    pub fn needs_zipalign(&self) -> bool {
        !self.skip_zipalign && !self.only_verify
    }

    /// Whether the run needs a keystore at all.
    pub fn needs_signing(&self) -> bool {
        !self.only_verify
    }
}

/// Keystore-related arguments, before resolution into a signing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeystoreArgs {
    pub keystore: Option<PathBuf>,
    pub alias: Option<String>,
    pub store_password: Option<String>,
    pub key_password: Option<String>,
    pub debug_keystore: Option<PathBuf>,
}

/// Application configuration parsed from command-line arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// File or directory to process
    pub input_path: PathBuf,
    /// Output directory override
    pub out_dir: Option<PathBuf>,
    pub options: ProcessOptions,
    pub keystore: KeystoreArgs,
    /// Explicit zipalign location
    pub zipalign_path: Option<PathBuf>,
    /// Explicit apksigner location
    pub apksigner_path: Option<PathBuf>,
    /// Print stack-like detail and command history on failure
    pub debug: bool,
    /// Suppress non-error output
    pub quiet: bool,
}

impl Config {
    /// Parse configuration from command-line argument matches.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, SignerError> {
        let input_path = matches
            .get_one::<PathBuf>("input")
            .or_else(|| matches.get_one::<PathBuf>("apks"))
            .cloned()
            .ok_or_else(|| {
                SignerError::invalid_input("No input provided. Pass an APK file or directory.")
            })?;

        let options = ProcessOptions {
            only_verify: matches.get_flag("only_verify"),
            dry_run: matches.get_flag("dry_run"),
            skip_zipalign: matches.get_flag("skip_zipalign"),
            overwrite: matches.get_flag("overwrite"),
            verbose: matches.get_flag("verbose"),
            min_sdk: matches.get_one::<u32>("min_sdk").copied(),
            max_sdk: matches.get_one::<u32>("max_sdk").copied(),
        };

        if let (Some(min), Some(max)) = (options.min_sdk, options.max_sdk) {
            if min > max {
                return Err(SignerError::invalid_input(format!(
                    "--min-sdk ({}) must not be greater than --max-sdk ({})",
                    min, max
                )));
            }
        }

        let keystore = KeystoreArgs {
            keystore: matches.get_one::<PathBuf>("ks").cloned(),
            alias: matches.get_one::<String>("ks_alias").cloned(),
            store_password: matches.get_one::<String>("ks_pass").cloned(),
            key_password: matches.get_one::<String>("ks_key_pass").cloned(),
            debug_keystore: matches.get_one::<PathBuf>("ks_debug").cloned(),
        };

        if keystore.keystore.is_some() && keystore.alias.is_none() {
            return Err(SignerError::invalid_input(
                "--ks requires a key alias (--ks-alias)",
            ));
        }

        Ok(Self {
            input_path,
            out_dir: matches.get_one::<PathBuf>("out").cloned(),
            options,
            keystore,
            zipalign_path: matches.get_one::<PathBuf>("zipalign_path").cloned(),
            apksigner_path: matches.get_one::<PathBuf>("apksigner_path").cloned(),
            debug: matches.get_flag("debug"),
            quiet: matches.get_flag("quiet"),
        })
    }
}
