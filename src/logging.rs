use std::fs::OpenOptions;

use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::Config;
use crate::parse::ParsedCommand;

/// Route `log` records to the configured file.
///
/// Best-effort: failures are silently ignored (logging must never stop a run).
pub fn init(config: &Config) {
    let level = config.log_level();
    let Some(path) = config.log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level, log_config, file);
}

/// Record one projection request as a single tab-separated line.
pub fn log_run(input: &str, step: usize, parsed: &ParsedCommand) {
    let cmd_truncated: String = input.chars().take(200).collect();
    let outcome = match &parsed.error {
        Some(err) => format!("invalid: {err}"),
        None => format!(
            "{} segment(s){}{}",
            parsed.commands.len(),
            if parsed.has_redirection { ", redirected" } else { "" },
            if parsed.has_heredoc { ", heredoc" } else { "" },
        ),
    };
    log::info!("step={step}\t{cmd_truncated}\t{outcome}");
}
