/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

use apksignerust::cli;
use apksignerust::ui::Ui;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let code = match cli::run() {
        Ok(code) => code,
        Err(e) => {
            let mut ui = Ui::default();
            ui.enable_colors_if_supported();
            ui.error(&format!("{}", e));
            1
        }
    };
    std::process::exit(code);
}
