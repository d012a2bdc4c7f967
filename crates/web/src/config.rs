//! Server configuration.
//!
//! A [`ServerConfig`] is built once, usually in `main`, either in code with the
//! `with_*` setters or from a TOML file:
//!
//! ```toml
//! address = "0.0.0.0"
//! port = 8080
//! backlog = 128
//! access_log = "stdout"
//! error_log = "/var/log/webby/error.log"
//! log_level = "info"
//! ```
//!
//! Every key is optional.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't read config file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },
}

/// Where a log stream is written to.
///
/// In config files a sink is written as `"stdout"`, `"stderr"`, or a file path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum LogSink {
    Stdout,
    Stderr,
    /// A file opened in append mode, created if missing.
    File(PathBuf),
}

impl LogSink {
    /// Opens the sink.
    ///
    /// # Errors
    ///
    /// Fails if a file sink can't be opened for appending.
    pub fn make_writer(&self) -> io::Result<BoxMakeWriter> {
        let writer = match self {
            Self::Stdout => BoxMakeWriter::new(io::stdout),
            Self::Stderr => BoxMakeWriter::new(io::stderr),
            Self::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                BoxMakeWriter::new(Mutex::new(file))
            }
        };
        Ok(writer)
    }
}

impl From<String> for LogSink {
    fn from(value: String) -> Self {
        match value.as_str() {
            "stdout" => Self::Stdout,
            "stderr" => Self::Stderr,
            _ => Self::File(PathBuf::from(value)),
        }
    }
}

impl From<LogSink> for String {
    fn from(sink: LogSink) -> Self {
        match sink {
            LogSink::Stdout => "stdout".to_owned(),
            LogSink::Stderr => "stderr".to_owned(),
            LogSink::File(path) => path.to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name or IP address to listen on.
    address: String,

    port: u16,

    /// Depth of the queue of connections waiting to be accepted.
    backlog: u32,

    access_log: LogSink,

    error_log: LogSink,

    /// Maximum level of the error log, e.g. `"debug"`.
    log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "localhost".to_owned(),
            port: 8080,
            backlog: 128,
            access_log: LogSink::Stdout,
            error_log: LogSink::Stderr,
            log_level: "info".to_owned(),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or is not a valid config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;
        Self::from_toml(&content)
    }

    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML and on keys of the wrong type.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_backlog(mut self, backlog: u32) -> Self {
        self.backlog = backlog;
        self
    }

    #[must_use]
    pub fn with_access_log(mut self, sink: LogSink) -> Self {
        self.access_log = sink;
        self
    }

    #[must_use]
    pub fn with_error_log(mut self, sink: LogSink) -> Self {
        self.error_log = sink;
        self
    }

    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn backlog(&self) -> u32 {
        self.backlog
    }

    pub fn access_log(&self) -> &LogSink {
        &self.access_log
    }

    pub fn error_log(&self) -> &LogSink {
        &self.error_log
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "localhost");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.backlog(), 128);
        assert_eq!(config.access_log(), &LogSink::Stdout);
        assert_eq!(config.error_log(), &LogSink::Stderr);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml(indoc! {r#"
            port = 9000
            error_log = "/tmp/webby-error.log"
        "#})
        .unwrap();

        assert_eq!(config.port(), 9000);
        assert_eq!(config.address(), "localhost");
        assert_eq!(config.error_log(), &LogSink::File(PathBuf::from("/tmp/webby-error.log")));
        assert_eq!(config.access_log(), &LogSink::Stdout);
    }

    #[test]
    fn reject_wrong_types() {
        let result = ServerConfig::from_toml("port = 70000");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));

        let result = ServerConfig::from_toml("port = \"http\"");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"address = \"127.0.0.1\"\nbacklog = 16\naccess_log = \"stderr\"\n").unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.address(), "127.0.0.1");
        assert_eq!(config.backlog(), 16);
        assert_eq!(config.access_log(), &LogSink::Stderr);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ServerConfig::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn setters_chain() {
        let config = ServerConfig::new().with_address("0.0.0.0").with_port(0).with_backlog(1).with_log_level("debug");
        assert_eq!(config.address(), "0.0.0.0");
        assert_eq!(config.port(), 0);
        assert_eq!(config.backlog(), 1);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        std::fs::write(&path, "first\n").unwrap();

        let sink = LogSink::File(path.clone());
        drop(sink.make_writer().unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n");
    }
}
