use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

use crate::error::{Error, Result};

/// Installs the process logger. Lines carry only the message: to stderr by
/// default, or appended to `log_file` when one is configured.
pub(crate) fn init(log_file: Option<&Path>, verbose: usize) -> Result<()> {
    let verbosity = verbose + 2;
    match log_file {
        None => stderrlog::new()
            .verbosity(verbosity)
            .show_level(false)
            .init()?,
        Some(path) => {
            let logger = FileLogger::open(path, level_for(verbosity))?;
            let level = logger.level;
            log::set_boxed_logger(Box::new(logger))?;
            log::set_max_level(level);
        }
    }
    Ok(())
}

/// Same mapping stderrlog uses for its verbosity count.
fn level_for(verbosity: usize) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl FileLogger {
    fn open(path: &Path, level: LevelFilter) -> Result<FileLogger> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| Error::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(FileLogger {
            level,
            file: Mutex::new(file),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // A poisoned lock or failed write has nowhere else to be reported.
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
