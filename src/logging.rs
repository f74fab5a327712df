//! File logging with rotation. `RUST_LOG` overrides the default level.

use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming};
use std::fs;
use std::path::PathBuf;

const DEFAULT_SPEC: &str = "info";
const BASENAME: &str = "hellspawner";
const ROTATE_SIZE: u64 = 256 * 1024;
const KEEP_FILES: usize = 3;

/// `<local data dir>/hellspawner/logs`, created on demand
pub fn log_dir() -> Option<PathBuf> {
    let dir = dirs::data_local_dir()?.join(BASENAME).join("logs");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Start logging to rotating files, duplicating warnings to stderr. Falls
/// back to stderr only when no log directory is available. Keep the handle
/// alive for the lifetime of the program.
pub fn init() -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str(DEFAULT_SPEC)?;
    match log_dir() {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(&dir).basename(BASENAME).suffix("log").suppress_timestamp())
            .rotate(Criterion::Size(ROTATE_SIZE), Naming::Numbers, Cleanup::KeepLogFiles(KEEP_FILES))
            .duplicate_to_stderr(Duplicate::Warn)
            .start(),
        None => logger.log_to_stderr().start(),
    }
}
