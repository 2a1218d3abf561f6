//! Module implementing logging for the application.

use std::env;

use slog::{self, Drain, FilterLevel, Logger};
use slog_async::Async;
use slog_envlogger::LogBuilder;
use slog_scope::GlobalLoggerGuard;
use slog_term::{CompactFormat, TermDecorator};


const RUST_LOG_VAR: &str = "RUST_LOG";


/// Initialize logging with given verbosity.
/// The verbosity value has the same meaning as in `args::Options::verbosity`.
pub fn init(verbosity: isize) -> Result<GlobalLoggerGuard, log::SetLoggerError> {
    let level = match verbosity {
        v if v < -2 => FilterLevel::Critical,
        -2 => FilterLevel::Error,
        -1 => FilterLevel::Warning,
        0 => FilterLevel::Info,
        1 => FilterLevel::Debug,
        _ => FilterLevel::Trace,
    };

    // Standard output may be taken by the image,
    // so all logging goes to stderr.
    let decorator = TermDecorator::new().stderr().build();
    let drain = CompactFormat::new(decorator).build().fuse();

    let mut builder = LogBuilder::new(drain).filter(None, level);
    if let Ok(ref filters) = env::var(RUST_LOG_VAR) {
        builder = builder.parse(filters);
    }
    let drain = Async::new(builder.build().fuse()).build().fuse();

    let guard = slog_scope::set_global_logger(Logger::root(drain, slog::o!()));
    slog_stdlog::init()?;

    debug!("Logging initialized with level {:?}", level);
    Ok(guard)
}
