//! File logging set up from the `[logging]` section.
//!
//! Kept in its own test binary: it installs the global subscriber.

use std::fs;

use subtime_core::config::LoggingSettings;
use subtime_core::logging::{init_from_settings, LogLevel, LOG_FILE_NAME};
use subtime_core::timing::{Selection, StackDirection, SubtitleList, TimingEngine};

#[test]
fn refusals_reach_the_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = LoggingSettings {
        level: LogLevel::Info,
        log_to_file: true,
        logs_folder: dir.path().join("logs").to_string_lossy().into_owned(),
    };

    let guard = init_from_settings(&settings).unwrap();
    assert!(guard.is_some());

    let mut list = SubtitleList::new();
    let result = TimingEngine::default().stack(
        &mut list,
        &Selection::default(),
        StackDirection::FromStart,
    );
    assert!(result.is_err());

    // Dropping the guard flushes the non-blocking writer.
    drop(guard);

    let log = fs::read_to_string(dir.path().join("logs").join(LOG_FILE_NAME)).unwrap();
    assert!(log.contains("Stack refused"));
}
