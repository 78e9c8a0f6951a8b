/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

use crate::{
    config::Config,
    engine::{ApkSignerEngine, ApkSignerTool},
    error::SignerError,
    input::{self, ResolvedInput},
    keys::SigningConfig,
    process::{CommandRunner, SystemRunner},
    processor::{ApkProcessor, BatchReport},
    report::{self, CommandHistory},
    ui::Ui,
    zipalign::ZipAlign,
    APP_ABOUT, APP_AUTHOR, APP_BIN_NAME, APP_NAME,
};
use clap::{value_parser, Arg, ArgAction, ArgGroup, Command};
use std::{path::PathBuf, time::Instant};

/// External collaborators of one run.
pub struct Toolchain<'a, E: ?Sized, R: ?Sized> {
    pub engine: &'a E,
    pub runner: &'a R,
    /// `None` when the run never aligns
    pub zipalign: Option<&'a ZipAlign>,
}

pub fn build_command() -> Command {
    Command::new(APP_NAME)
        .bin_name(APP_BIN_NAME)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .disable_version_flag(true)
        .arg_required_else_help(true)
        .help_template("{about-with-newline}{usage-heading} {usage}\n\n{all-args}\n")
        .arg(
            Arg::new("input")
                .help("APK file or directory of APKs")
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("apks")
                .short('a')
                .long("apks")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("APK file or directory of APKs (alternative to the positional argument)"),
        )
        .group(
            ArgGroup::new("source")
                .args(["input", "apks"])
                .multiple(false),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Output directory (created if missing); defaults to the input location"),
        )
        .arg(
            Arg::new("only_verify")
                .short('y')
                .long("only-verify")
                .action(ArgAction::SetTrue)
                .help("Only verify signatures, do not align or sign"),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Report what would be done without running any tool"),
        )
        .arg(
            Arg::new("skip_zipalign")
                .long("skip-zipalign")
                .action(ArgAction::SetTrue)
                .help("Do not run zipalign"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Replace APKs in place instead of writing renamed copies"),
        )
        .arg(
            Arg::new("ks")
                .long("ks")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Release keystore; without it a debug keystore is used"),
        )
        .arg(
            Arg::new("ks_alias")
                .long("ks-alias")
                .value_name("ALIAS")
                .help("Key alias inside the release keystore"),
        )
        .arg(
            Arg::new("ks_pass")
                .long("ks-pass")
                .value_name("PASS")
                .env("APKSIGNERUST_KS_PASS")
                .hide_env_values(true)
                .help("Keystore password; prompted for if absent"),
        )
        .arg(
            Arg::new("ks_key_pass")
                .long("ks-key-pass")
                .value_name("PASS")
                .env("APKSIGNERUST_KEY_PASS")
                .hide_env_values(true)
                .help("Key password; prompted for if absent"),
        )
        .arg(
            Arg::new("ks_debug")
                .long("ks-debug")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Debug keystore to use instead of ~/.android/debug.keystore"),
        )
        .arg(
            Arg::new("zipalign_path")
                .long("zipalign-path")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Location of the zipalign executable"),
        )
        .arg(
            Arg::new("apksigner_path")
                .long("apksigner-path")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Location of the apksigner executable"),
        )
        .arg(
            Arg::new("min_sdk")
                .long("min-sdk")
                .value_name("N")
                .value_parser(value_parser!(u32))
                .help("Lowest API level the verification must hold for"),
        )
        .arg(
            Arg::new("max_sdk")
                .long("max-sdk")
                .value_name("N")
                .value_parser(value_parser!(u32))
                .help("Highest API level the verification must hold for"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Show signer and verifier logs"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("On failure print error detail and the external command history"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppress all output except errors"),
        )
        .arg(
            Arg::new("version_custom")
                .short('V')
                .long("version")
                .action(ArgAction::SetTrue)
                .help("Print version information"),
        )
}

/// Parse the process arguments and run. Returns the exit code.
pub fn run() -> Result<i32, SignerError> {
    let matches = build_command().get_matches();

    if matches.get_flag("version_custom") {
        let mut ui = Ui::new(false, false, false, true);
        ui.enable_colors_if_supported();
        ui.print_version_info();
        return Ok(0);
    }

    let config = Config::from_matches(&matches)?;
    let mut ui = Ui::new(config.options.verbose, config.debug, config.quiet, true);
    ui.enable_colors_if_supported();
    ui.print_banner();

    let mut history = CommandHistory::new();
    let started = Instant::now();

    match run_with_system_tools(&config, &ui, &mut history) {
        Ok(report) => {
            report::report_success(
                &ui,
                report.processed,
                report.skipped,
                started.elapsed(),
                &history,
            );
            Ok(0)
        }
        Err(e) => {
            report::report_failure(&ui, &e, &history);
            Ok(1)
        }
    }
}

fn run_with_system_tools(
    config: &Config,
    ui: &Ui,
    history: &mut CommandHistory,
) -> Result<BatchReport, SignerError> {
    let resolved = resolve_input(config, ui)?;
    let runner = SystemRunner;

    let zipalign = if config.options.needs_zipalign() {
        let found = ZipAlign::locate(config.zipalign_path.as_deref())?;
        ui.verbose(&format!("Using zipalign: {}", found.executable().display()));
        Some(found)
    } else {
        None
    };

    let engine = ApkSignerTool::locate(config.apksigner_path.as_deref())?;
    ui.verbose(&format!("Using apksigner: {}", engine.executable().display()));

    let toolchain = Toolchain {
        engine: &engine,
        runner: &runner,
        zipalign: zipalign.as_ref(),
    };
    execute_resolved(config, &resolved, &toolchain, ui, history)
}

fn resolve_input(config: &Config, ui: &Ui) -> Result<ResolvedInput, SignerError> {
    let resolved = input::resolve(
        &config.input_path,
        config.out_dir.as_deref(),
        !config.options.dry_run,
    )?;
    ui.verbose(&format!("Output directory: {}", resolved.out_dir.display()));
    Ok(resolved)
}

/// Resolve inputs and keystore, then run the batch with the given tools.
pub fn execute<E, R>(
    config: &Config,
    toolchain: &Toolchain<'_, E, R>,
    ui: &Ui,
    history: &mut CommandHistory,
) -> Result<BatchReport, SignerError>
where
    E: ApkSignerEngine + ?Sized,
    R: CommandRunner + ?Sized,
{
    let resolved = resolve_input(config, ui)?;
    execute_resolved(config, &resolved, toolchain, ui, history)
}

fn execute_resolved<E, R>(
    config: &Config,
    resolved: &ResolvedInput,
    toolchain: &Toolchain<'_, E, R>,
    ui: &Ui,
    history: &mut CommandHistory,
) -> Result<BatchReport, SignerError>
where
    E: ApkSignerEngine + ?Sized,
    R: CommandRunner + ?Sized,
{
    let has_packages = resolved.candidates.iter().any(|p| input::is_package(p));
    let signing = if has_packages && config.options.needs_signing() {
        let signing = SigningConfig::resolve(&config.keystore, ui)?;
        ui.verbose(&format!("Keystore: {}", signing.location));
        Some(signing)
    } else {
        None
    };

    let mut processor = ApkProcessor::new(config.options, toolchain.engine, toolchain.runner, ui);
    if let Some(zipalign) = toolchain.zipalign {
        processor = processor.with_zipalign(zipalign);
    }
    if let Some(ref signing) = signing {
        processor = processor.with_signing(signing);
    }

    processor.run_batch(&resolved.candidates, &resolved.out_dir, history)
}
