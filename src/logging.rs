use directories::ProjectDirs;
use flexi_logger::{
    detailed_format, Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming,
};

use crate::config::LoggingConfig;
use crate::error::DashboardError;

const LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;
const LOG_FILES_KEPT: usize = 7;

/// Starts file logging under `<data dir>/logs`. Warnings and errors are
/// duplicated to stderr. The returned handle must outlive the program's
/// logging, so callers keep it bound in `main`.
pub fn setup_logging(
    project_dirs: &ProjectDirs,
    logging: &LoggingConfig,
) -> Result<LoggerHandle, DashboardError> {
    let log_dir = project_dirs.data_local_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    Logger::try_with_str(logging.log_spec())
        .and_then(|logger| {
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(&log_dir)
                        .basename("soc-dashboard"),
                )
                .duplicate_to_stderr(Duplicate::Warn)
                .format_for_files(detailed_format)
                .rotate(
                    Criterion::Size(LOG_FILE_SIZE),
                    Naming::Timestamps,
                    Cleanup::KeepLogFiles(LOG_FILES_KEPT),
                )
                .start()
        })
        .map_err(|e| DashboardError::Error(format!("Failed to start logger: {}", e)))
}
