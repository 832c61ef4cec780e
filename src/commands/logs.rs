use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Session logs kept besides `latest.log`.
const MAX_SESSIONS: usize = 10;

/// Installs the global subscriber: human-readable output on stderr plus a
/// plain-text copy in `.finanzas/logs/latest.log` under the site root.
///
/// The level comes from `RUST_LOG` and defaults to `info`. If the log file
/// cannot be opened only stderr is used.
pub fn init_logging(root: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match open_session_log(&logs_dir(root)) {
        Some(file) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(file_layer)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .try_init();
        }
    }
}

pub fn logs_dir(root: &Path) -> PathBuf {
    root.join(".finanzas").join("logs")
}

/// Rotates `latest.log` to `session-{timestamp}.log`, prunes old sessions
/// and opens a fresh `latest.log`.
fn open_session_log(logs_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(logs_dir).ok()?;

    let latest = logs_dir.join("latest.log");
    if latest.exists() {
        let rotated = logs_dir.join(format!("session-{}.log", unix_timestamp()));
        let _ = std::fs::rename(&latest, &rotated);
    }

    cleanup_old_sessions(logs_dir, MAX_SESSIONS);

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&latest)
        .ok()
}

fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Keep only the `max` most recent `session-*.log` files.
fn cleanup_old_sessions(logs_dir: &Path, max: usize) {
    let mut session_files: Vec<PathBuf> = std::fs::read_dir(logs_dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with("session-") && name.ends_with(".log")
        })
        .map(|entry| entry.path())
        .collect();

    // Timestamps are embedded in the name, so lexicographic = chronological
    session_files.sort();

    while session_files.len() > max {
        let oldest = session_files.remove(0);
        let _ = std::fs::remove_file(oldest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_sessions_are_pruned_oldest_first() {
        let tmp = tempfile::tempdir().expect("tempdir");
        for ts in 1_700_000_000u64..1_700_000_013 {
            std::fs::write(tmp.path().join(format!("session-{ts}.log")), "x").expect("write");
        }
        std::fs::write(tmp.path().join("latest.log"), "x").expect("write");

        cleanup_old_sessions(tmp.path(), MAX_SESSIONS);

        let remaining: Vec<String> = std::fs::read_dir(tmp.path())
            .expect("read_dir")
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with("session-"))
            .collect();
        assert_eq!(remaining.len(), MAX_SESSIONS);
        assert!(!tmp.path().join("session-1700000000.log").exists());
        assert!(tmp.path().join("session-1700000012.log").exists());
        assert!(tmp.path().join("latest.log").exists());
    }

    #[test]
    fn opening_a_session_rotates_latest() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("latest.log"), "previous run").expect("write");

        let file = open_session_log(tmp.path());
        assert!(file.is_some());

        let rotated = std::fs::read_dir(tmp.path())
            .expect("read_dir")
            .flatten()
            .any(|e| e.file_name().to_string_lossy().starts_with("session-"));
        assert!(rotated);
        assert_eq!(std::fs::read_to_string(tmp.path().join("latest.log")).expect("read"), "");
    }
}
