//! Tracing setup
//!
//! One subscriber for the whole process: level from configuration (with
//! `RUST_LOG` taking precedence when set), console output by default, and a
//! daily-rolling file under the data directory once it exists. Settlement
//! operations each emit one structured line, so file output is what makes
//! an order's history reconstructable after the fact.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Prefix of the rolling log files ("market-server.2026-08-27" etc.)
const LOG_FILE_PREFIX: &str = "market-server";

/// Install the global subscriber
///
/// `level` is the configured default filter; `log_dir` switches output to a
/// daily-rolling file when it names an existing directory.
pub fn init_tracing(level: &str, log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    match log_dir.filter(|dir| dir.is_dir()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            builder.with_writer(appender).with_ansi(false).init();
        }
        None => builder.init(),
    }
}
