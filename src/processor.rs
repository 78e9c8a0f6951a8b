/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! The per-file pipeline and the batch loop around it.
//!
//! Each package goes `align -> sign -> alignment check -> verify`, unless it
//! is already signed (skipped) or only verification was requested. The first
//! error aborts the whole batch.

use crate::{
    config::ProcessOptions,
    engine::ApkSignerEngine,
    error::SignerError,
    file_label, input,
    keys::SigningConfig,
    naming,
    process::CommandRunner,
    report::CommandHistory,
    signing,
    ui::Ui,
    verification::{self, VerifyOutcome, VerifyRequest},
    zipalign::{self, ZipAlign},
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::{NamedTempFile, TempPath};

/// Terminal state of one package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Already carried a valid signature; left untouched
    SkippedAlreadySigned,
    /// Went through the pipeline (or only verification)
    Processed,
    /// Dry run: actions were reported, nothing executed
    Planned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub source: PathBuf,
    /// Final artifact: the signed output, or the source when nothing was written
    pub output: PathBuf,
    pub state: FileState,
    pub verification: Option<VerifyOutcome>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub outcomes: Vec<FileOutcome>,
    pub deleted_temp_files: Vec<PathBuf>,
}

impl BatchReport {
    pub fn verified(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verification.as_ref().is_some_and(|v| v.verified))
            .count()
    }
}

pub struct ApkProcessor<'a, E: ?Sized, R: ?Sized> {
    options: ProcessOptions,
    engine: &'a E,
    runner: &'a R,
    ui: &'a Ui,
    zipalign: Option<&'a ZipAlign>,
    signing: Option<&'a SigningConfig>,
}

impl<'a, E, R> ApkProcessor<'a, E, R>
where
    E: ApkSignerEngine + ?Sized,
    R: CommandRunner + ?Sized,
{
    pub fn new(options: ProcessOptions, engine: &'a E, runner: &'a R, ui: &'a Ui) -> Self {
        Self {
            options,
            engine,
            runner,
            ui,
            zipalign: None,
            signing: None,
        }
    }

    pub fn with_zipalign(mut self, zipalign: &'a ZipAlign) -> Self {
        self.zipalign = Some(zipalign);
        self
    }

    pub fn with_signing(mut self, config: &'a SigningConfig) -> Self {
        self.signing = Some(config);
        self
    }

    fn aligning(&self) -> bool {
        !self.options.skip_zipalign
    }

    fn zipalign(&self) -> Result<&'a ZipAlign, SignerError> {
        self.zipalign.ok_or_else(|| SignerError::ExecutableNotFound {
            tool: zipalign::ZIPALIGN_TOOL.to_string(),
            hint: zipalign::NOT_FOUND_HINT.to_string(),
        })
    }

    fn signing_config(&self) -> Result<&'a SigningConfig, SignerError> {
        self.signing
            .ok_or_else(|| SignerError::Other("no signing configuration was resolved".into()))
    }

    /// Run every package among `candidates`, in order, then delete intermediates.
    pub fn run_batch(
        &self,
        candidates: &[PathBuf],
        out_dir: &Path,
        history: &mut CommandHistory,
    ) -> Result<BatchReport, SignerError> {
        let packages: Vec<&PathBuf> = candidates.iter().filter(|p| input::is_package(p)).collect();
        log::debug!(
            "{} of {} candidates are packages",
            packages.len(),
            candidates.len()
        );

        let mut report = BatchReport::default();
        let mut temp_files = Vec::new();

        self.ui.start_batch(packages.len() as u64);
        for apk in packages {
            let outcome = match self.process_file(apk, out_dir, history, &mut temp_files) {
                Ok(o) => o,
                Err(e) => {
                    self.ui.finish_batch();
                    return Err(e);
                }
            };
            match outcome.state {
                FileState::SkippedAlreadySigned => report.skipped += 1,
                FileState::Processed | FileState::Planned => report.processed += 1,
            }
            report.outcomes.push(outcome);
            self.ui.advance();
        }
        self.ui.finish_batch();

        for file in temp_files {
            if self.options.verbose {
                self.ui.raw_out(&format!("delete temp file {}", file.display()));
            }
            match fs::remove_file(&file) {
                Ok(()) => report.deleted_temp_files.push(file),
                Err(e) => log::warn!("could not delete temp file {}: {}", file.display(), e),
            }
        }

        Ok(report)
    }

    /// Drive one package through its pipeline.
    ///
    /// Intermediates that must outlive this call are appended to `temp_files`.
    pub fn process_file(
        &self,
        apk: &Path,
        out_dir: &Path,
        history: &mut CommandHistory,
        temp_files: &mut Vec<PathBuf>,
    ) -> Result<FileOutcome, SignerError> {
        self.ui.file_header(&file_label(apk));

        if self.options.dry_run {
            return self.plan(apk, out_dir);
        }

        let output = if self.options.only_verify {
            apk.to_path_buf()
        } else {
            let pre = verification::verify_apk(self.engine, apk, &VerifyRequest::quiet(), history)?;
            if pre.verified {
                self.ui.status("already signed SKIP");
                return Ok(FileOutcome {
                    source: apk.to_path_buf(),
                    output: apk.to_path_buf(),
                    state: FileState::SkippedAlreadySigned,
                    verification: Some(pre),
                });
            }

            let aligned = self.align(apk, out_dir, history)?;
            if aligned != apk {
                temp_files.push(aligned.clone());
            }
            let signed = self.sign(&aligned, out_dir, history)?;
            self.check_alignment(&signed, history)?;
            signed
        };

        let verdict = self.verify(&output, history)?;
        Ok(FileOutcome {
            source: apk.to_path_buf(),
            output,
            state: FileState::Processed,
            verification: Some(verdict),
        })
    }

    fn align(
        &self,
        apk: &Path,
        out_dir: &Path,
        history: &mut CommandHistory,
    ) -> Result<PathBuf, SignerError> {
        if !self.aligning() {
            return Ok(apk.to_path_buf());
        }
        let zipalign = self.zipalign()?;

        let mut msg = String::new();
        let target = if self.options.overwrite {
            // zipalign refuses to write over its own input
            let tmp = vacant_sibling(apk)?;
            let result = zipalign.align(self.runner, apk, &tmp)?;
            let aligned = result.success();
            history.record(result);
            if aligned {
                tmp.persist(apk).map_err(|e| SignerError::Io(e.error))?;
                msg.push_str("aligned & ");
            } else {
                msg.push_str("could not align, ");
            }
            apk.to_path_buf()
        } else {
            let out = naming::aligned_path(apk, out_dir);
            remove_stale(&out)?;
            let result = zipalign.align(self.runner, apk, &out)?;
            let aligned = result.success();
            history.record(result);
            if aligned {
                msg.push_str("aligned & ");
                out
            } else {
                msg.push_str("could not align, ");
                remove_stale(&out)?;
                apk.to_path_buf()
            }
        };

        let check = zipalign.check(self.runner, &target)?;
        msg.push_str(if check.success() {
            "zipalign verified"
        } else {
            "zipalign verify failed"
        });
        history.record(check);

        self.ui
            .status(&format!("{} ({})", msg, file_label(&target)));
        Ok(target)
    }

    /// Alignment check only; signing keeps alignment and rewriting would break the signature.
    fn check_alignment(&self, path: &Path, history: &mut CommandHistory) -> Result<(), SignerError> {
        if !self.aligning() {
            return Ok(());
        }
        let check = self.zipalign()?.check(self.runner, path)?;
        let msg = if check.success() {
            "zipalign verified"
        } else {
            "zipalign verify failed"
        };
        history.record(check);
        self.ui.status(&format!("{} ({})", msg, file_label(path)));
        Ok(())
    }

    fn sign(
        &self,
        input: &Path,
        out_dir: &Path,
        history: &mut CommandHistory,
    ) -> Result<PathBuf, SignerError> {
        let config = self.signing_config()?;
        let verbose = self.options.verbose;

        let (target, log) = if self.options.overwrite {
            let tmp = NamedTempFile::new_in(parent_dir(input))?.into_temp_path();
            let log = signing::sign_apk(self.engine, config, input, &tmp, verbose, history)?;
            tmp.persist(input).map_err(|e| SignerError::Io(e.error))?;
            (input.to_path_buf(), log)
        } else {
            let out = naming::signed_path(input, out_dir);
            remove_stale(&out)?;
            let log = signing::sign_apk(self.engine, config, input, &out, verbose, history)?;
            (out, log)
        };

        if verbose && !log.trim().is_empty() {
            self.ui.raw_out(&log);
        }
        self.ui.status(&format!(
            "signed [{}] ({})",
            config.location,
            file_label(&target)
        ));
        Ok(target)
    }

    fn verify(&self, path: &Path, history: &mut CommandHistory) -> Result<VerifyOutcome, SignerError> {
        let request =
            VerifyRequest::reporting(self.options.verbose, self.options.min_sdk, self.options.max_sdk);
        let verdict = verification::verify_apk(self.engine, path, &request, history)?;
        if verdict.verified {
            self.ui
                .status(&format!("signature verified ({})", file_label(path)));
        } else {
            self.ui
                .status(&format!("signature NOT VERIFIED ({})", file_label(path)));
        }
        if self.options.verbose && !verdict.log.trim().is_empty() {
            self.ui.raw_out(&verdict.log);
        }
        Ok(verdict)
    }

    /// Dry run: report the names each step would produce.
    fn plan(&self, apk: &Path, out_dir: &Path) -> Result<FileOutcome, SignerError> {
        self.ui.status("(dry run)");

        let output = if self.options.only_verify {
            apk.to_path_buf()
        } else {
            let aligned = if !self.aligning() || self.options.overwrite {
                apk.to_path_buf()
            } else {
                naming::aligned_path(apk, out_dir)
            };
            if self.aligning() {
                self.ui
                    .status(&format!("would align ({})", file_label(&aligned)));
            }

            let signed = if self.options.overwrite {
                aligned
            } else {
                naming::signed_path(&aligned, out_dir)
            };
            let config = self.signing_config()?;
            self.ui.status(&format!(
                "would sign [{}] ({})",
                config.location,
                file_label(&signed)
            ));
            signed
        };

        self.ui
            .status(&format!("would verify ({})", file_label(&output)));
        Ok(FileOutcome {
            source: apk.to_path_buf(),
            output,
            state: FileState::Planned,
            verification: None,
        })
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn remove_stale(path: &Path) -> Result<(), SignerError> {
    if path.exists() {
        log::debug!("removing existing {}", path.display());
        fs::remove_file(path)?;
    }
    Ok(())
}

/// A fresh path next to `path` that does not exist yet.
fn vacant_sibling(path: &Path) -> Result<TempPath, SignerError> {
    let tmp = tempfile::Builder::new()
        .prefix(".apksignerust-")
        .suffix(".apk")
        .tempfile_in(parent_dir(path))?
        .into_temp_path();
    fs::remove_file(&tmp)?;
    Ok(tmp)
}
