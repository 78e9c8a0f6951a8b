/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Command history and end-of-run reporting.

use crate::{error::SignerError, process::ProcessResult, ui::Ui};
use std::time::Duration;

/// Every external invocation of a run, in execution order.
#[derive(Debug, Default, Clone)]
pub struct CommandHistory {
    entries: Vec<ProcessResult>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: ProcessResult) {
        self.entries.push(result);
    }

    pub fn entries(&self) -> &[ProcessResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("\nCmd history for debugging purpose:\n-----------------------\n");
        for entry in &self.entries {
            out.push_str(&entry.to_string());
        }
        out
    }
}

pub fn summary_line(processed: usize, elapsed: Duration) -> String {
    format!(
        "Successfully processed {} APKs in {:.2} seconds.",
        processed,
        elapsed.as_secs_f64()
    )
}

pub fn report_success(
    ui: &Ui,
    processed: usize,
    skipped: usize,
    elapsed: Duration,
    history: &CommandHistory,
) {
    ui.blank();
    ui.success(&summary_line(processed, elapsed));
    if skipped > 0 {
        ui.status(&format!("Skipped {} already signed APKs.", skipped));
    }
    if ui.debug {
        ui.raw_out(&history.render());
    }
}

pub fn report_failure(ui: &Ui, err: &SignerError, history: &CommandHistory) {
    ui.error(&err.to_string());
    if ui.debug {
        ui.raw_err(&format!("{:#?}", err));
        ui.raw_err(&history.render());
    } else {
        ui.error("Run with '--debug' parameter to get additional information.");
    }
}
