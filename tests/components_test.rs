mod common;

use apksignerust::{
    cli::{self, Toolchain},
    config::{Config, KeystoreArgs, ProcessOptions},
    engine::{ApkSignerEngine, ApkSignerTool},
    error::SignerError,
    input,
    keys::{KeystoreLocation, SigningConfig, DEBUG_KEY_ALIAS},
    naming,
    process::ProcessResult,
    report::{self, CommandHistory},
    signing,
    verification::VerifyRequest,
    zipalign::ZipAlign,
};
use common::*;
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tempfile::tempdir;

fn config_for(input: &Path, keys: &Path) -> Config {
    let ks = keys.join("debug.keystore");
    fs::write(&ks, b"keystore").unwrap();
    Config {
        input_path: input.to_path_buf(),
        out_dir: None,
        options: ProcessOptions::default(),
        keystore: KeystoreArgs {
            debug_keystore: Some(ks),
            ..Default::default()
        },
        zipalign_path: None,
        apksigner_path: None,
        debug: false,
        quiet: true,
    }
}

#[test]
fn resolve_directory_sorts_candidates() {
    let dir = tempdir().unwrap();
    write_apk(dir.path(), "zeta.apk");
    write_apk(dir.path(), "alpha.apk");
    write_apk(dir.path(), "Mid.APK");

    let resolved = input::resolve(dir.path(), None, true).unwrap();
    let names: Vec<String> = resolved
        .candidates
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Mid.APK", "alpha.apk", "zeta.apk"]);
    assert_eq!(resolved.out_dir, dir.path());
    assert!(resolved.candidates.iter().all(|p| input::is_package(p)));
}

#[test]
fn resolve_single_file_uses_parent_as_output() {
    let dir = tempdir().unwrap();
    let apk = write_apk(dir.path(), "app.apk");

    let resolved = input::resolve(&apk, None, true).unwrap();
    assert_eq!(resolved.candidates, vec![apk]);
    assert_eq!(resolved.out_dir, dir.path());
}

#[test]
fn resolve_rejects_missing_input() {
    let dir = tempdir().unwrap();
    let err = input::resolve(&dir.path().join("missing.apk"), None, true).unwrap_err();
    assert!(matches!(err, SignerError::InvalidInput(_)));
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn resolve_creates_output_directory() {
    let dir = tempdir().unwrap();
    let apk = write_apk(dir.path(), "app.apk");
    let out = dir.path().join("signed").join("nested");

    let resolved = input::resolve(&apk, Some(&out), true).unwrap();
    assert!(out.is_dir());
    assert_eq!(resolved.out_dir, out);
}

#[test]
fn resolve_rejects_output_that_is_a_file() {
    let dir = tempdir().unwrap();
    let apk = write_apk(dir.path(), "app.apk");
    let out = dir.path().join("not-a-dir");
    fs::write(&out, b"x").unwrap();

    let err = input::resolve(&apk, Some(&out), true).unwrap_err();
    assert!(matches!(err, SignerError::InvalidInput(_)));
}

#[test]
fn package_filter_matches_extension_case_insensitively() {
    let dir = tempdir().unwrap();
    let upper = write_apk(dir.path(), "APP.APK");
    let text = dir.path().join("apk.txt");
    fs::write(&text, b"x").unwrap();
    fs::create_dir(dir.path().join("folder.apk")).unwrap();

    assert!(input::is_package(&upper));
    assert!(!input::is_package(&text));
    assert!(!input::is_package(&dir.path().join("folder.apk")));
}

#[test]
fn derived_names_follow_marker_conventions() {
    let out = Path::new("/out");
    assert_eq!(
        naming::aligned_path(Path::new("/in/app-unaligned.apk"), out),
        PathBuf::from("/out/app_aligned.apk")
    );
    assert_eq!(
        naming::signed_path(Path::new("/in/app-unsigned.apk"), out),
        PathBuf::from("/out/app_signed.apk")
    );
    assert_eq!(
        naming::signed_path(Path::new("/in/Game.APK"), out),
        PathBuf::from("/out/Game_signed.APK")
    );
    assert_eq!(
        naming::signed_path(&naming::aligned_path(Path::new("/in/a.apk"), out), out),
        PathBuf::from("/out/a_aligned_signed.apk")
    );
}

#[test]
fn sign_arguments_follow_engine_order() {
    let config = SigningConfig {
        keystore: PathBuf::from("/keys/release.jks"),
        alias: "upload".into(),
        store_password: Some("s3cret".into()),
        key_password: None,
        location: KeystoreLocation::Release(PathBuf::from("/keys/release.jks")),
    };

    let args = signing::sign_args(&config, Path::new("/in/a.apk"), Path::new("/out/a_signed.apk"), true);
    assert_eq!(
        args,
        vec![
            "sign",
            "--ks",
            "/keys/release.jks",
            "--ks-pass",
            "pass:s3cret",
            "--key-pass",
            "stdin",
            "--ks-key-alias",
            "upload",
            "--out",
            "/out/a_signed.apk",
            "--verbose",
            "/in/a.apk",
        ]
    );
    assert!(!format!("{:?}", config).contains("s3cret"));
}

#[cfg(unix)]
#[test]
fn sign_arguments_keep_non_utf8_paths() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let keystore = PathBuf::from(OsStr::from_bytes(b"/keys/r\xe9lease.jks"));
    let input = PathBuf::from(OsStr::from_bytes(b"/in/caf\xe9.apk"));
    let output = PathBuf::from(OsStr::from_bytes(b"/out/caf\xe9_signed.apk"));
    let config = SigningConfig {
        keystore: keystore.clone(),
        alias: "upload".into(),
        store_password: None,
        key_password: None,
        location: KeystoreLocation::Release(keystore.clone()),
    };

    let args = signing::sign_args(&config, &input, &output, false);
    assert_eq!(args[2].as_os_str(), keystore.as_os_str());
    assert_eq!(args[10].as_os_str(), output.as_os_str());
    assert_eq!(args.last().map(OsString::as_os_str), Some(input.as_os_str()));
}

#[test]
fn debug_keystore_uses_well_known_credentials() {
    let keys = tempdir().unwrap();
    let ks = keys.path().join("debug.keystore");
    fs::write(&ks, b"keystore").unwrap();

    let args = KeystoreArgs {
        debug_keystore: Some(ks.clone()),
        ..Default::default()
    };
    let config = SigningConfig::resolve(&args, &silent_ui()).unwrap();
    assert_eq!(config.alias, DEBUG_KEY_ALIAS);
    assert_eq!(config.store_password.as_deref(), Some("android"));
    assert_eq!(config.location, KeystoreLocation::Debug(ks));
}

#[test]
fn release_keystore_must_exist() {
    let keys = tempdir().unwrap();
    let args = KeystoreArgs {
        keystore: Some(keys.path().join("missing.jks")),
        alias: Some("upload".into()),
        ..Default::default()
    };
    let err = SigningConfig::resolve(&args, &silent_ui()).unwrap_err();
    assert!(matches!(err, SignerError::InvalidInput(_)));
}

#[test]
fn process_result_masks_passwords() {
    let args: Vec<OsString> = vec!["sign".into(), "--ks-pass".into(), "pass:hunter2".into()];
    let result = ProcessResult::new(Path::new("apksigner"), &args, Some(0), "ok".into());
    assert_eq!(result.command, "apksigner sign --ks-pass pass:****");
    assert!(result.success());
    assert!(!result.to_string().contains("hunter2"));
}

#[test]
fn command_history_renders_every_entry() {
    let mut history = CommandHistory::new();
    let args: Vec<OsString> = vec!["-c".into(), "4".into(), "a.apk".into()];
    history.record(ProcessResult::new(Path::new("zipalign"), &args, Some(1), "Verification FAILED".into()));

    let text = history.render();
    assert!(text.contains("Cmd history for debugging purpose:"));
    assert!(text.contains("zipalign -c 4 a.apk"));
    assert!(text.contains("exit code: 1"));
    assert!(text.contains("Verification FAILED"));
}

#[test]
fn summary_line_matches_expected_format() {
    assert_eq!(
        report::summary_line(2, Duration::from_millis(1234)),
        "Successfully processed 2 APKs in 1.23 seconds."
    );
}

#[test]
fn apksigner_tool_maps_exit_codes() {
    let runner = ScriptedRunner::new(1, "DOES NOT VERIFY");
    let tool = ApkSignerTool::with_runner("/sdk/apksigner", runner);
    let mut history = CommandHistory::new();

    let outcome = tool
        .verify(
            Path::new("a.apk"),
            &VerifyRequest::reporting(true, Some(21), None),
            &mut history,
        )
        .unwrap();
    assert!(!outcome.verified);
    assert_eq!(outcome.log, "DOES NOT VERIFY");

    let err = tool.sign(&["sign".into()], &mut history).unwrap_err();
    assert_eq!(err.to_string(), "DOES NOT VERIFY");
}

#[test]
fn apksigner_tool_records_every_invocation() {
    let runner = ScriptedRunner::new(1, "Keystore was tampered with");
    let tool = ApkSignerTool::with_runner("/sdk/apksigner", runner);
    let mut history = CommandHistory::new();

    tool.verify(Path::new("a.apk"), &VerifyRequest::quiet(), &mut history)
        .unwrap();
    let args = vec![
        OsString::from("sign"),
        "--ks-pass".into(),
        "pass:hunter2".into(),
        "a.apk".into(),
    ];
    tool.sign(&args, &mut history).unwrap_err();

    assert_eq!(history.len(), 2);
    assert_eq!(history.entries()[0].command, "/sdk/apksigner verify a.apk");
    assert_eq!(
        history.entries()[1].command,
        "/sdk/apksigner sign --ks-pass pass:**** a.apk"
    );
    assert_eq!(history.entries()[1].exit_code, Some(1));
    assert!(history.render().contains("Keystore was tampered with"));
}

#[test]
fn apksigner_tool_builds_verify_arguments() {
    let runner = ScriptedRunner::new(0, "Verifies");
    let tool = ApkSignerTool::with_runner("/sdk/apksigner", runner);

    let mut history = CommandHistory::new();
    tool.verify(
        Path::new("a.apk"),
        &VerifyRequest::reporting(true, Some(21), Some(34)),
        &mut history,
    )
    .unwrap();
    tool.verify(Path::new("a.apk"), &VerifyRequest::quiet(), &mut history)
        .unwrap();

    let calls = tool_calls(&tool);
    assert_eq!(
        calls[0],
        vec![
            "verify",
            "--print-certs",
            "-v",
            "--min-sdk-version",
            "21",
            "--max-sdk-version",
            "34",
            "a.apk"
        ]
    );
    assert_eq!(calls[1], vec!["verify", "a.apk"]);
}

#[test]
fn execute_processes_directory_end_to_end() {
    let dir = tempdir().unwrap();
    let keys = tempdir().unwrap();
    write_apk(dir.path(), "a.apk");
    write_apk(dir.path(), "b.apk");
    fs::write(dir.path().join("readme.txt"), "notes").unwrap();

    let engine = FakeEngine::default();
    let runner = FakeRunner::default();
    let zipalign = ZipAlign::new("zipalign");
    let toolchain = Toolchain {
        engine: &engine,
        runner: &runner,
        zipalign: Some(&zipalign),
    };
    let mut config = config_for(dir.path(), keys.path());
    config.out_dir = Some(dir.path().join("signed"));

    let mut history = CommandHistory::new();
    let report = cli::execute(&config, &toolchain, &silent_ui(), &mut history).unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(
        file_names(&dir.path().join("signed")),
        vec!["a_aligned_signed.apk", "b_aligned_signed.apk"]
    );
}

#[test]
fn execute_dry_run_does_not_create_output_directory() {
    let dir = tempdir().unwrap();
    let keys = tempdir().unwrap();
    write_apk(dir.path(), "a.apk");

    let engine = FakeEngine::default();
    let runner = FakeRunner::default();
    let toolchain = Toolchain {
        engine: &engine,
        runner: &runner,
        zipalign: None,
    };
    let mut config = config_for(dir.path(), keys.path());
    config.out_dir = Some(dir.path().join("out"));
    config.options.dry_run = true;
    config.options.skip_zipalign = true;

    let mut history = CommandHistory::new();
    let report = cli::execute(&config, &toolchain, &silent_ui(), &mut history).unwrap();

    assert_eq!(report.processed, 1);
    assert!(!dir.path().join("out").exists());
    assert!(engine.calls.borrow().is_empty());
}

#[test]
fn execute_with_empty_directory_needs_no_keystore() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "x").unwrap();

    let engine = FakeEngine::default();
    let runner = FakeRunner::default();
    let toolchain = Toolchain {
        engine: &engine,
        runner: &runner,
        zipalign: None,
    };
    let mut config = config_for(dir.path(), dir.path());
    config.keystore = KeystoreArgs {
        keystore: Some(dir.path().join("missing.jks")),
        alias: Some("upload".into()),
        ..Default::default()
    };

    let mut history = CommandHistory::new();
    let report = cli::execute(&config, &toolchain, &silent_ui(), &mut history).unwrap();
    assert_eq!(report.processed, 0);
}

#[test]
fn cli_parses_flags_into_config() {
    let matches = cli::build_command().get_matches_from([
        "apksignerust",
        "--apks",
        "/tmp/apks",
        "--out",
        "/tmp/out",
        "--skip-zipalign",
        "--overwrite",
        "--only-verify",
        "--debug",
        "--ks",
        "/keys/release.jks",
        "--ks-alias",
        "upload",
        "--min-sdk",
        "21",
    ]);
    let config = Config::from_matches(&matches).unwrap();

    assert_eq!(config.input_path, PathBuf::from("/tmp/apks"));
    assert_eq!(config.out_dir, Some(PathBuf::from("/tmp/out")));
    assert!(config.options.skip_zipalign);
    assert!(config.options.overwrite);
    assert!(config.options.only_verify);
    assert!(!config.options.dry_run);
    assert!(config.debug);
    assert_eq!(config.options.min_sdk, Some(21));
    assert_eq!(config.keystore.alias.as_deref(), Some("upload"));
    assert!(!config.options.needs_zipalign());
}

#[test]
fn cli_rejects_keystore_without_alias() {
    let matches = cli::build_command().get_matches_from([
        "apksignerust",
        "app.apk",
        "--ks",
        "/keys/release.jks",
    ]);
    let err = Config::from_matches(&matches).unwrap_err();
    assert!(matches!(err, SignerError::InvalidInput(_)));
}

#[test]
fn cli_rejects_both_input_forms() {
    let result = cli::build_command().try_get_matches_from([
        "apksignerust",
        "app.apk",
        "--apks",
        "other.apk",
    ]);
    assert!(result.is_err());
}

/// Runner returning a fixed exit code and recording arguments.
struct ScriptedRunner {
    code: i32,
    output: String,
    calls: std::cell::RefCell<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    fn new(code: i32, output: &str) -> Self {
        Self {
            code,
            output: output.to_string(),
            calls: Default::default(),
        }
    }
}

impl apksignerust::process::CommandRunner for ScriptedRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessResult, SignerError> {
        self.calls
            .borrow_mut()
            .push(args.iter().map(|a| a.to_string_lossy().into_owned()).collect());
        Ok(ProcessResult::new(program, args, Some(self.code), self.output.clone()))
    }
}

fn tool_calls(tool: &ApkSignerTool<ScriptedRunner>) -> Vec<Vec<String>> {
    tool.runner().calls.borrow().clone()
}
