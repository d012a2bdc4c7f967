//! Installs the access and error logs as a global `tracing` subscriber.
//!
//! Access events are the ones emitted under
//! [`ACCESS_LOG_TARGET`](webby_http::connection::ACCESS_LOG_TARGET), one per
//! served response. Every other event goes to the error log, filtered by the
//! configured level. Calling [`init`] is optional: a server embedded in an
//! application that already installed a subscriber logs through that one.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};
use webby_http::connection::ACCESS_LOG_TARGET;

use crate::config::ServerConfig;
use crate::server::ServerError;

/// Installs the logs described by `config` as the global default subscriber.
///
/// # Errors
///
/// Fails if the log level is unknown, a log file can't be opened, or a global
/// subscriber was already installed.
pub fn init(config: &ServerConfig) -> Result<(), ServerError> {
    let level = parse_level(config.log_level())?;

    let access_writer = config.access_log().make_writer().map_err(|source| ServerError::LogSink { sink: config.access_log().clone(), source })?;
    let error_writer = config.error_log().make_writer().map_err(|source| ServerError::LogSink { sink: config.error_log().clone(), source })?;

    let access_layer = fmt::layer()
        .with_writer(access_writer)
        .with_ansi(false)
        .with_filter(filter_fn(|metadata| metadata.target() == ACCESS_LOG_TARGET));

    let error_layer = fmt::layer()
        .with_writer(error_writer)
        .with_ansi(false)
        .with_filter(filter_fn(move |metadata| metadata.target() != ACCESS_LOG_TARGET && *metadata.level() <= level));

    tracing_subscriber::registry()
        .with(access_layer)
        .with(error_layer)
        .try_init()
        .map_err(|e| ServerError::Logging { reason: e.to_string() })
}

fn parse_level(level: &str) -> Result<LevelFilter, ServerError> {
    level.parse::<LevelFilter>().map_err(|e| ServerError::Logging { reason: format!("unknown log level `{level}`: {e}") })
}
