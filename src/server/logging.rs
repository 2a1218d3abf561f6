//! Module implementing logging for the application.
//!
//! The `log` macros used throughout the code (and in the library crate)
//! are forwarded to a `slog` logger that writes to standard error.

use std::env;

use slog::{self, Drain, FilterLevel, Logger};
use slog_async::Async;
use slog_envlogger::LogBuilder;
use slog_scope::GlobalLoggerGuard;
use slog_term::{FullFormat, TermDecorator};


/// Environment variable that can override the logging level filters.
const RUST_LOG_VAR: &str = "RUST_LOG";

/// Modules whose debug logs are just noise.
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "tokio"];


/// Initialize logging with given verbosity.
///
/// The verbosity value has the same meaning as in `args::Options::verbosity`.
/// The returned guard must be kept alive for as long as the logging is needed.
pub fn init(verbosity: isize) -> Result<GlobalLoggerGuard, log::SetLoggerError> {
    let level = level_for(verbosity);

    let decorator = TermDecorator::new().stderr().build();
    let drain = FullFormat::new(decorator).build().fuse();

    let mut builder = LogBuilder::new(drain).filter(None, level);
    if verbosity > 0 {
        for &module in NOISY_MODULES {
            builder = builder.filter(Some(module), FilterLevel::Info);
        }
    }
    if let Ok(ref filters) = env::var(RUST_LOG_VAR) {
        builder = builder.parse(filters);
    }
    let drain = Async::new(builder.build().fuse()).build().fuse();

    let logger = Logger::root(drain, slog::o!());
    let guard = slog_scope::set_global_logger(logger);
    slog_stdlog::init()?;

    debug!("Logging initialized with level {:?}", level);
    Ok(guard)
}

/// Map the command line verbosity onto a logging level.
fn level_for(verbosity: isize) -> FilterLevel {
    match verbosity {
        v if v < -2 => FilterLevel::Critical,
        -2 => FilterLevel::Error,
        -1 => FilterLevel::Warning,
        0 => FilterLevel::Info,
        1 => FilterLevel::Debug,
        _ => FilterLevel::Trace,
    }
}


#[cfg(test)]
mod tests {
    use slog::FilterLevel;
    use super::level_for;

    #[test]
    fn verbosity_levels() {
        assert_eq!(FilterLevel::Warning, level_for(-1));
        assert_eq!(FilterLevel::Info, level_for(0));
        assert_eq!(FilterLevel::Debug, level_for(1));
        assert_eq!(FilterLevel::Trace, level_for(2));
        assert_eq!(FilterLevel::Trace, level_for(5));
        assert_eq!(FilterLevel::Critical, level_for(-5));
    }
}
