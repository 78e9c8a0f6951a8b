#![allow(dead_code)]

use apksignerust::{
    engine::ApkSignerEngine,
    error::{EngineError, SignerError},
    keys::SigningConfig,
    process::{CommandRunner, ProcessResult},
    report::CommandHistory,
    ui::Ui,
    verification::{VerifyOutcome, VerifyRequest},
};
use std::{
    cell::RefCell,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

pub const SIGNATURE_MARK: &[u8] = b"\n--signed--";

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Sign(Vec<OsString>),
    Verify(PathBuf, VerifyRequest),
}

/// Engine that "signs" by appending a marker and "verifies" by looking for it.
#[derive(Default)]
pub struct FakeEngine {
    pub calls: RefCell<Vec<EngineCall>>,
    pub fail_sign: bool,
    /// Write output without the marker, so verification fails
    pub sign_badly: bool,
}

impl FakeEngine {
    pub fn sign_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, EngineCall::Sign(_)))
            .count()
    }

    pub fn verify_calls(&self) -> Vec<(PathBuf, VerifyRequest)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                EngineCall::Verify(p, r) => Some((p.clone(), *r)),
                _ => None,
            })
            .collect()
    }
}

impl ApkSignerEngine for FakeEngine {
    fn sign(&self, args: &[OsString], _history: &mut CommandHistory) -> Result<String, EngineError> {
        self.calls.borrow_mut().push(EngineCall::Sign(args.to_vec()));
        if self.fail_sign {
            return Err(EngineError("Keystore was tampered with, or password was incorrect".into()));
        }
        let out = args
            .iter()
            .position(|a| a == "--out")
            .and_then(|i| args.get(i + 1))
            .ok_or_else(|| EngineError("missing --out".into()))?;
        let input = args.last().ok_or_else(|| EngineError("missing input".into()))?;
        let mut bytes = fs::read(input)?;
        if !self.sign_badly {
            bytes.extend_from_slice(SIGNATURE_MARK);
        }
        fs::write(out, bytes)?;
        Ok(format!("Signed {}", out.to_string_lossy()))
    }

    fn verify(
        &self,
        apk: &Path,
        request: &VerifyRequest,
        _history: &mut CommandHistory,
    ) -> Result<VerifyOutcome, EngineError> {
        self.calls
            .borrow_mut()
            .push(EngineCall::Verify(apk.to_path_buf(), *request));
        let bytes = fs::read(apk)?;
        let verified = bytes.ends_with(SIGNATURE_MARK);
        Ok(VerifyOutcome {
            verified,
            log: if verified {
                "Verifies\nVerified using v2 scheme (APK Signature Scheme v2): true".into()
            } else {
                "DOES NOT VERIFY\nERROR: Missing META-INF/MANIFEST.MF".into()
            },
        })
    }
}

/// Runner standing in for zipalign: copies on align, checks existence on `-c`.
#[derive(Default)]
pub struct FakeRunner {
    pub calls: RefCell<Vec<Vec<String>>>,
    pub fail_align: bool,
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessResult, SignerError> {
        let args_str: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        self.calls.borrow_mut().push(args_str.clone());

        let code = match args_str.as_slice() {
            [flag, _, path] if flag == "-c" => {
                if Path::new(path).is_file() {
                    0
                } else {
                    1
                }
            }
            [_, input, output] => {
                if self.fail_align {
                    1
                } else {
                    fs::copy(input, output)?;
                    0
                }
            }
            _ => 2,
        };
        Ok(ProcessResult::new(program, args, Some(code), String::new()))
    }
}

pub fn silent_ui() -> Ui {
    Ui::new(false, false, true, false)
}

pub fn write_apk(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"PK\x03\x04 fake apk payload").expect("write apk");
    path
}

pub fn write_signed_apk(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = b"PK\x03\x04 fake apk payload".to_vec();
    bytes.extend_from_slice(SIGNATURE_MARK);
    fs::write(&path, bytes).expect("write apk");
    path
}

pub fn debug_signing(dir: &Path) -> SigningConfig {
    let ks = dir.join("debug.keystore");
    fs::write(&ks, b"keystore").expect("write keystore");
    SigningConfig::debug(ks)
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
