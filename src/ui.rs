/*
 * ApkSignerust v1.0.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

use crate::{APP_AUTHOR, APP_NAME, APP_VERSION};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stream {
    Out,
    Err,
}

pub struct Ui {
    pub verbose: bool,
    pub debug: bool,
    silent: bool,
    colors: bool,
    progress_bar: Arc<Mutex<Option<ProgressBar>>>,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(false, false, false, true)
    }
}

impl Ui {
    pub fn new(verbose: bool, debug: bool, silent: bool, colors: bool) -> Self {
        Self {
            verbose,
            debug,
            silent,
            colors,
            progress_bar: Arc::new(Mutex::new(None)),
        }
    }

    /// Batch progress over `len` candidates. Hidden automatically off-terminal.
    pub fn start_batch(&self, len: u64) {
        if self.silent || len < 2 {
            return;
        }
        let pb = ProgressBar::new(len);
        let template = if self.term_width() < 60 {
            "{spinner:.green} {bar:.green/red} {pos}/{len}"
        } else {
            "{spinner:.green} APKs {wide_bar:.green/red} {pos}/{len} ({elapsed})"
        };
        let style = ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_strings(&["[|]", "[/]", "[-]", "[\\]"])
            .progress_chars("#>-");
        pb.set_style(style);
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        if let Ok(mut g) = self.progress_bar.lock() {
            *g = Some(pb);
        }
    }

    pub fn advance(&self) {
        let _ = self.progress_bar.lock().map(|g| {
            if let Some(ref pb) = *g {
                pb.inc(1);
            }
        });
    }

    pub fn finish_batch(&self) {
        let _ = self.progress_bar.lock().map(|mut g| {
            if let Some(pb) = g.take() {
                pb.finish_and_clear();
            }
        });
    }

    /// Print while keeping an active progress bar intact.
    fn emit(&self, stream: Stream, text: &str) {
        let write = || match stream {
            Stream::Out => println!("{}", text),
            Stream::Err => eprintln!("{}", text),
        };
        match self.progress_bar.lock() {
            Ok(g) => match *g {
                Some(ref pb) => pb.suspend(write),
                None => write(),
            },
            Err(_) => write(),
        }
    }

    fn paint(&self, icon: &str, msg: &str, color: &str, stream: Stream, is_dim: bool) {
        if self.silent && stream == Stream::Out {
            return;
        }
        let tw = self.term_width();
        let indent_size = if tw < 40 { 2 } else { icon.len() + 1 };
        let indent = " ".repeat(indent_size);
        let wrapped = self.wrap_msg(msg, indent_size);

        let colored_icon = match color {
            "31" => icon.red().bold().to_string(),
            "32" => icon.green().bold().to_string(),
            "33" => icon.yellow().bold().to_string(),
            "34" => icon.blue().bold().to_string(),
            "36" => icon.cyan().bold().to_string(),
            _ => icon.bold().to_string(),
        };

        for (i, line) in wrapped.split('\n').enumerate() {
            let rendered = if self.supports_color() {
                match (i, is_dim) {
                    (0, true) => format!("{} {}", colored_icon.dimmed(), line.dimmed()),
                    (0, false) => format!("{} {}", colored_icon, line),
                    (_, true) => format!("{}{}", indent, line.dimmed()),
                    (_, false) => format!("{}{}", indent, line),
                }
            } else if i == 0 {
                format!("{} {}", icon, line)
            } else {
                format!("{}{}", indent, line)
            };
            self.emit(stream, &rendered);
        }
    }

    pub fn print_banner(&self) {
        if !self.silent && self.verbose {
            self.print_rich_banner();
        }
    }

    pub fn print_rich_banner(&self) {
        let title = format!(" {} v{} ", APP_NAME, APP_VERSION);
        let width = title.len();
        let tw = self.term_width();

        if tw < width + 4 {
            if self.supports_color() {
                eprintln!("{}", title.cyan().bold());
            } else {
                eprintln!("{}", title);
            }
        } else {
            let border = "-".repeat(width);
            if self.supports_color() {
                let tb = format!("+-{}-+", border).magenta().bold();
                let mid = format!("| {} |", title.cyan().bold()).blue();
                eprintln!("{}\n{}\n{}", tb, mid, tb);
            } else {
                eprintln!("+-{}-+\n| {} |\n+-{}-+", border, title, border);
            }
        }
    }

    pub fn print_version_info(&self) {
        self.print_rich_banner();
        if self.supports_color() {
            println!("{}", format!("Author:      {}", APP_AUTHOR).yellow());
            println!("{}", "License:     MIT".green());
            println!(
                "{}",
                "Description: Batch zipalign, sign and verify for Android APKs.".magenta()
            );
        } else {
            println!("Author:      {}\nLicense:     MIT\nDescription: Batch zipalign, sign and verify for Android APKs.", APP_AUTHOR);
        }
    }

    fn supports_color(&self) -> bool {
        std::env::var("NO_COLOR").is_err() && self.colors && {
            #[cfg(windows)]
            {
                if !colored::control::SHOULD_COLORIZE.should_colorize() {
                    colored::control::set_override(true);
                }
            }
            true
        }
    }

    pub fn enable_colors_if_supported(&mut self) {
        #[cfg(windows)]
        if self.colors {
            colored::control::set_override(true);
        }
    }

    /// Name of the package about to go through the pipeline.
    pub fn file_header(&self, name: &str) {
        if self.silent {
            return;
        }
        self.emit(Stream::Out, "");
        if self.supports_color() {
            self.emit(Stream::Out, &name.bold().to_string());
        } else {
            self.emit(Stream::Out, name);
        }
    }

    /// One pipeline step of the current package.
    pub fn status(&self, msg: &str) {
        if !self.silent {
            self.emit(Stream::Out, &format!("\t- {}", msg));
        }
    }

    pub fn blank(&self) {
        if !self.silent {
            self.emit(Stream::Out, "");
        }
    }

    /// Unformatted block on stdout, e.g. engine logs.
    pub fn raw_out(&self, text: &str) {
        if !self.silent {
            self.emit(Stream::Out, text.trim_end());
        }
    }

    pub fn raw_err(&self, text: &str) {
        self.emit(Stream::Err, text.trim_end());
    }

    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            self.paint("[v]", msg, "2", Stream::Out, true);
        }
    }
    pub fn success(&self, msg: &str) {
        self.paint("[+]", msg, "32", Stream::Out, false);
    }
    pub fn warn(&self, msg: &str) {
        if !self.silent {
            self.paint("[!]", msg, "33", Stream::Err, false);
        }
    }
    pub fn error(&self, msg: &str) {
        self.paint("[x]", msg, "31", Stream::Err, false);
    }

    fn wrap_msg(&self, msg: &str, indent: usize) -> String {
        let max_width = self.term_width();
        let effective_width = if max_width > 20 {
            max_width.saturating_sub(indent).max(20)
        } else {
            max_width.saturating_sub(indent).max(10)
        };
        let mut lines = Vec::new();
        let mut current_line = String::with_capacity(effective_width);

        for word in msg.split_whitespace() {
            let word_len = word.chars().count();
            let needed = if current_line.is_empty() {
                word_len
            } else {
                current_line.chars().count() + 1 + word_len
            };

            if needed <= effective_width {
                if !current_line.is_empty() {
                    current_line.push(' ');
                }
                current_line.push_str(word);
            } else {
                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                }
                // Long paths get split hard rather than overflowing
                if word_len > effective_width {
                    let chars: Vec<char> = word.chars().collect();
                    let mut chunks = chars.chunks(effective_width).peekable();
                    while let Some(chunk) = chunks.next() {
                        current_line.extend(chunk.iter());
                        if chunks.peek().is_some() {
                            lines.push(std::mem::take(&mut current_line));
                        }
                    }
                } else {
                    current_line.push_str(word);
                }
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
        lines.join("\n")
    }

    fn term_width(&self) -> usize {
        std::env::var("COLUMNS")
            .ok()
            .and_then(|s| s.parse().ok())
            .or_else(|| terminal_size::terminal_size().map(|(w, _)| w.0 as usize))
            .unwrap_or(80)
    }
}
