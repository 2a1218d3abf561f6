//!
//! memecraftsh  -- Memes in the shell
//!

#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;

#[cfg(test)] #[macro_use] extern crate spectral;


mod args;
mod logging;


use std::env;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::process::exit;

use clap::error::ErrorKind as ClapErrorKind;
use memecraft::{EngineBuilder, FontLoader, ImageMacro, TemplateLoader};

use crate::args::{ArgsError, Options};


lazy_static! {
    /// Application / package name, as filled out by Cargo.
    static ref NAME: &'static str = option_env!("CARGO_PKG_NAME").unwrap_or("memecraftsh");

    /// Application version, as filled out by Cargo.
    static ref VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
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
    if cfg!(debug_assertions) {
        warn!("Debug mode! The program will likely be much slower.");
    }
    for (i, arg) in env::args().enumerate() {
        debug!("argv[{}] = {:?}", i, arg);
    }
    trace!("Options parsed from argv:\n{:#?}", opts);

    let Options{image_macro, template_directory, font_directory, output_path, ..} = opts;
    let engine = EngineBuilder::<TemplateLoader, FontLoader>::new()
        .template_directory(&template_directory)
        .font_directory(&font_directory)
        .build().unwrap_or_else(|e| {
            error!("Failed to create the captioning engine: {}", e);
            exit(exitcode::CONFIG);
        });
    let bytes = render(&engine, image_macro).unwrap_or_else(|e| {
        error!("Error while rendering image macro: {}", e);
        exit(exitcode::UNAVAILABLE);
    });

    let written = match output_path.as_ref() {
        Some(path) => {
            trace!("Opening --output file {}...", path.display());
            let file = fs::OpenOptions::new()
                .create(true).write(true).truncate(true)
                .open(path).unwrap_or_else(|e| {
                    error!("Failed to open output file {} for writing: {}", path.display(), e);
                    exit(exitcode::CANTCREAT);
                });
            debug!("File {} opened successfully", path.display());
            write_output(&bytes, file)
        }
        None => {
            trace!("No --output given, using standard output");
            if io::stdout().is_terminal() {
                warn!("Standard output is a terminal.");
            }
            write_output(&bytes, io::stdout().lock())
        }
    };
    if let Err(e) = written {
        error!("Failed to write the image: {}", e);
        exit(exitcode::IOERR);
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


/// Render given `ImageMacro` into the bytes of the finished image.
fn render(engine: &memecraft::Engine, im: ImageMacro) -> Result<Vec<u8>, String> {
    trace!("Rendering macro {:#?}", im);
    let captioned = engine.caption(im).map_err(|e| e.to_string())?;
    debug!("Rendered {:?}", captioned);
    Ok(captioned.into_bytes())
}

fn write_output<W: Write>(bytes: &[u8], mut output: W) -> io::Result<()> {
    trace!("Writing {} bytes of output...", bytes.len());
    output.write_all(bytes)?;
    output.flush()
}
