//! Logger setup for the sanjaya binary.
//!
//! The file target writes `./sanjaya.log` in the working directory. Terminal
//! output goes to stderr so it does not interleave with the progress lines.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use super::cli::LogTarget;

const LOG_PATH: &str = "./sanjaya.log";

/// Maps the `-v` count to a level filter.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn initialize(target: LogTarget, verbose: u8) {
    let level = level_for(verbose);
    let loggers = build_loggers(target, level, Path::new(LOG_PATH));
    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

fn build_loggers(target: LogTarget, level: LevelFilter, log_path: &Path) -> Vec<Box<dyn SharedLogger>> {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(target, LogTarget::Terminal | LogTarget::Both) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if matches!(target, LogTarget::File | LogTarget::Both) {
        match File::create(log_path) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("Warning: could not create log file {:?}: {}", log_path, err),
        }
    }
    loggers
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // reqwest and hyper are chatty at debug.
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(level_for(0), LevelFilter::Info);
        assert_eq!(level_for(1), LevelFilter::Debug);
        assert_eq!(level_for(5), LevelFilter::Trace);
    }

    #[test]
    fn targets_select_loggers() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("sanjaya.log");

        assert_eq!(build_loggers(LogTarget::Terminal, LevelFilter::Info, &path).len(), 1);
        assert!(!path.exists());
        assert_eq!(build_loggers(LogTarget::File, LevelFilter::Info, &path).len(), 1);
        assert!(path.exists());
        assert_eq!(build_loggers(LogTarget::Both, LevelFilter::Info, &path).len(), 2);
    }

    #[test]
    fn unwritable_log_path_is_skipped() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing").join("sanjaya.log");
        assert!(build_loggers(LogTarget::File, LevelFilter::Info, &path).is_empty());
    }
}
