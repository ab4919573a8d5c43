use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "VERSE_LOG";

pub fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("terminal-bible").join("terminal-bible.log"))
}

/// Logs go to a file; the terminal belongs to the UI. Logging stays off if
/// the file cannot be opened.
pub fn init() {
    let Some(path) = log_file_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
}
