//! Tracing subscriber bootstrap for the binaries.
//!
//! Logs go to `PATCH_RELAY_LOG_FILE` when set so they never interleave with the
//! interactive transcript; otherwise to stderr.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File,
    /// A global subscriber was already installed; this call changed nothing.
    AlreadyInstalled,
}

/// Installs the global subscriber. Returns where logs will go.
///
/// Calling this twice is harmless; the first subscriber wins and later calls return
/// [`LogSink::AlreadyInstalled`].
pub fn init(config: &EnvConfig) -> io::Result<LogSink> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));

    match config.log_file.as_deref() {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
            Ok(installed.map_or(LogSink::AlreadyInstalled, |()| LogSink::File))
        }
        None => {
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init();
            Ok(installed.map_or(LogSink::AlreadyInstalled, |()| LogSink::Stderr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{init, LogSink};
    use crate::config::EnvConfig;

    #[test]
    fn file_sink_is_created_even_with_a_bad_filter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("relay.log");
        let config = EnvConfig {
            log_filter: "not a [valid filter".to_string(),
            log_file: Some(path.display().to_string()),
            ..EnvConfig::default()
        };

        assert_eq!(init(&config).expect("init"), LogSink::File);
        assert!(path.exists());

        assert_eq!(
            init(&EnvConfig::default()).expect("second init is harmless"),
            LogSink::AlreadyInstalled
        );
        assert_eq!(
            init(&config).expect("file sink is not reinstalled"),
            LogSink::AlreadyInstalled
        );
    }

    #[test]
    fn unwritable_log_path_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = EnvConfig {
            log_file: Some(dir.path().join("missing/dir/relay.log").display().to_string()),
            ..EnvConfig::default()
        };
        assert!(init(&config).is_err());
    }
}
