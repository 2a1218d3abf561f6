//!
//! memecraftd  -- Memes on demand, over HTTP
//!

#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;

#[cfg(test)] #[macro_use] extern crate spectral;


mod ai;
mod args;
mod backend;
mod handlers;
mod logging;
mod service;


use std::env;
use std::io::{self, Write};
use std::pin::pin;
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

use clap::error::ErrorKind as ClapErrorKind;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::runtime;
use tokio::signal;
use tokio::time;

use crate::args::{ArgsError, Options};
use crate::backend::Backend;
use crate::service::Memecraft;


lazy_static! {
    /// Application / package name, as filled out by Cargo.
    static ref NAME: &'static str = option_env!("CARGO_PKG_NAME").unwrap_or("memecraftd");

    /// Application version, as filled out by Cargo.
    static ref VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

    /// Application revision, such as Git SHA.
    /// This is generated by a build script and written to an output file.
    static ref REVISION: Option<&'static str> = Some(
        include_str!(concat!(env!("OUT_DIR"), "/", "revision")).trim()
    ).filter(|r| !r.is_empty());
}


fn main() {
    let opts = args::parse().unwrap_or_else(|e| {
        let code = print_args_error(e);
        exit(code);
    });

    let _guard = logging::init(opts.verbosity).unwrap_or_else(|e| {
        let _ = writeln!(&mut io::stderr(), "Failed to initialize logging: {}", e);
        exit(exitcode::OSERR);
    });
    info!("{} {}{}", *NAME,
        VERSION.map(|v| format!("v{}", v)).unwrap_or_else(|| "<UNKNOWN VERSION>".into()),
        REVISION.map(|r| format!(" (rev. {})", r)).unwrap_or_default());
    if cfg!(debug_assertions) {
        warn!("Debug mode! The program will likely be much slower.");
    }
    for (i, arg) in env::args().enumerate() {
        debug!("argv[{}] = {:?}", i, arg);
    }
    trace!("Options parsed from argv:\n{:#?}", opts);

    let runtime = runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("memecraftd")
        .build()
        .unwrap_or_else(|e| {
            error!("Failed to start the async runtime: {}", e);
            exit(exitcode::OSERR);
        });
    if let Err(e) = runtime.block_on(start_server(opts)) {
        error!("Failed to start the server: {}", e);
        exit(exitcode::UNAVAILABLE);
    }
}

/// Print an error that may occur while parsing arguments.
/// Returns the exit code to use.
fn print_args_error(e: ArgsError) -> i32 {
    match e {
        ArgsError::Parse(ref e) => {
            // In case of generic parse error,
            // message provided by the clap library will be the usage string.
            let _ = e.print();
            match e.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => exitcode::OK,
                _ => exitcode::USAGE,
            }
        }
        e => {
            let _ = writeln!(&mut io::stderr(), "Failed to parse arguments: {}", e);
            exitcode::USAGE
        }
    }
}


/// Start the server with given options.
/// This function only returns when the server is shut down.
async fn start_server(opts: Options) -> io::Result<()> {
    let backend = Arc::new(Backend::from_options(&opts)?);

    let listener = TcpListener::bind(opts.address).await?;
    info!("Starting the server to listen on {}...", listener.local_addr()?);

    let http = http1::Builder::new();
    let graceful = GracefulShutdown::new();
    let mut interrupt = pin!(signal::ctrl_c());

    debug!("Entering event loop...");
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, remote) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                };
                trace!("Accepted connection from {}", remote);

                let service = Memecraft::new(backend.clone(), remote);
                let conn = graceful.watch(http.serve_connection(TokioIo::new(stream), service));
                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        debug!("Error while serving connection from {}: {}", remote, e);
                    }
                });
            }
            result = &mut interrupt => {
                if let Err(e) = result {
                    error!("Failed to listen for the interrupt signal: {}", e);
                }
                info!("Shutting down the server...");
                break;
            }
        }
    }
    drop(listener);

    shutdown(graceful, opts.shutdown_timeout).await;
    info!("Server shut down");
    Ok(())
}

/// Wait for the remaining connections to finish, up to given timeout.
async fn shutdown(graceful: GracefulShutdown, timeout: Duration) {
    if timeout == Duration::ZERO {
        debug!("Not waiting for remaining connections");
        return;
    }
    debug!("Waiting up to {} secs for remaining connections...", timeout.as_secs());
    tokio::select! {
        _ = graceful.shutdown() => {
            debug!("All connections closed");
        }
        _ = time::sleep(timeout) => {
            warn!("Some connections were still open after {} secs", timeout.as_secs());
        }
    }
}
