//! File-backed `log::Log` implementation: writes level-filtered records to a
//! fixed log file and installs a panic hook that logs panics before the
//! default handler prints them.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::ops::Deref;
use std::panic;
use std::path::Path;
use std::sync::Mutex;

use log::LevelFilter;

pub fn setup(debug: bool, log_path: &Path) {
    panic::set_hook(Box::new(|panic_info| {
        let (file, line) = panic_info
            .location()
            .map(|loc| (loc.file(), loc.line()))
            .unwrap_or(("<unknown>", 0));

        let cause = panic_info
            .payload()
            .downcast_ref::<String>()
            .map(String::deref)
            .or_else(|| panic_info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("<cause unknown>");

        log::error!("panic at {file}:{line}: {cause}");
    }));

    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };
    let ignore = vec!["mio".to_string(), "polling".to_string()];

    match Logger::new(level, log_path, ignore) {
        Ok(logger) => logger.init(),
        Err(e) => eprintln!("failed to open log file {log_path:?}: {e}"),
    }
}

struct Logger {
    level: LevelFilter,
    output_file: Mutex<File>,
    ignore_targets: Vec<String>,
}

impl Logger {
    fn new(level: LevelFilter, path: &Path, ignore: Vec<String>) -> std::io::Result<Logger> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Logger { level, output_file: Mutex::new(file), ignore_targets: ignore })
    }

    fn init(self) {
        log::set_max_level(self.level);
        let _ = log::set_boxed_logger(Box::new(self));
    }

    fn is_ignored(&self, target: &str) -> bool {
        self.ignore_targets.iter().any(|t| t == target)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level && !self.is_ignored(metadata.target())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.output_file.lock() {
            let _ = writeln!(
                file,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.output_file.lock() {
            let _ = file.flush();
        }
    }
}
