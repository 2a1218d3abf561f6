//! Module for handling command line arguments.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::net::{AddrParseError, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{self, crate_authors, Arg, ArgAction, ArgMatches, Command};
use thiserror::Error;

use crate::{NAME, VERSION};


/// Parse command line arguments and return `Options` object.
#[inline]
pub fn parse() -> Result<Options, ArgsError> {
    parse_from_argv(env::args_os())
}

/// Parse application options from given array of arguments
/// (*all* arguments, including binary name).
#[inline]
pub fn parse_from_argv<I, T>(argv: I) -> Result<Options, ArgsError>
    where I: IntoIterator<Item=T>, T: Clone + Into<OsString>
{
    let parser = create_parser();
    let matches = parser.try_get_matches_from(argv)?;
    Options::try_from(matches)
}


/// Structure to hold options received from the command line.
#[derive(Clone, PartialEq, Eq)]
pub struct Options {
    /// Verbosity of the logging output.
    ///
    /// Corresponds to the number of times the -v flag has been passed.
    /// If -q has been used instead, this will be negative.
    pub verbosity: isize,

    /// Address where the server should listen on.
    pub address: SocketAddr,

    /// Directory with template images.
    pub template_directory: PathBuf,
    /// Directory with font files.
    pub font_directory: PathBuf,
    /// JSON file with the template & category catalog.
    /// If omitted, the built-in catalog is used.
    pub catalog_path: Option<PathBuf>,

    /// Number of threads to use for image captioning.
    /// If omitted, the actual count will be based on the number of CPUs.
    pub render_threads: Option<usize>,

    /// Size of the template cache.
    pub template_cache_size: Option<usize>,
    /// Size of the font cache.
    pub font_cache_size: Option<usize>,
    /// Which kinds of resources to preload.
    pub preload: BTreeSet<Resource>,

    /// API key for the OpenAI chat completions API.
    /// Without it, captions are picked from a canned list.
    pub openai_api_key: Option<String>,
    /// Model used to generate captions.
    pub openai_model: String,
    /// Base URL of the OpenAI-compatible API.
    pub openai_base_url: String,

    // Maximum time allowed for a single caption request.
    pub request_timeout: Duration,
    // Maximum time allowed for generating captions with AI.
    pub ai_timeout: Duration,
    // Maximum time the server will wait for pending connections to terminate.
    pub shutdown_timeout: Duration,
}

#[allow(dead_code)]
impl Options {
    #[inline]
    pub fn verbose(&self) -> bool { self.verbosity > 0 }
    #[inline]
    pub fn quiet(&self) -> bool { self.verbosity < 0 }
}

impl fmt::Debug for Options {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Options")
            .field("verbosity", &self.verbosity)
            .field("address", &self.address)
            .field("template_directory", &self.template_directory)
            .field("font_directory", &self.font_directory)
            .field("catalog_path", &self.catalog_path)
            .field("render_threads", &self.render_threads)
            .field("template_cache_size", &self.template_cache_size)
            .field("font_cache_size", &self.font_cache_size)
            .field("preload", &self.preload)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("ai_timeout", &self.ai_timeout)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}

impl TryFrom<ArgMatches> for Options {
    type Error = ArgsError;

    fn try_from(matches: ArgMatches) -> Result<Self, Self::Error> {
        let verbose_count = matches.get_count(OPT_VERBOSE) as isize;
        let quiet_count = matches.get_count(OPT_QUIET) as isize;
        let verbosity = verbose_count - quiet_count;

        let address = parse_address(value_of(&matches, ARG_ADDR).unwrap_or(DEFAULT_ADDRESS))?;

        let template_directory = PathBuf::from(
            value_of(&matches, OPT_TEMPLATE_DIR).unwrap_or(DEFAULT_TEMPLATE_DIR));
        let font_directory = PathBuf::from(
            value_of(&matches, OPT_FONT_DIR).unwrap_or(DEFAULT_FONT_DIR));
        let catalog_path = value_of(&matches, OPT_CATALOG).map(PathBuf::from);

        let render_threads = match value_of(&matches, OPT_RENDER_THREADS) {
            Some(rt) => Some(rt.parse::<usize>().map_err(ArgsError::RenderThreads)?),
            None => None,
        };

        let template_cache_size = match value_of(&matches, OPT_TEMPLATE_CACHE_SIZE) {
            Some(tcs) => Some(tcs.parse::<usize>().map_err(ArgsError::TemplateCache)?),
            None => None,
        };
        let font_cache_size = match value_of(&matches, OPT_FONT_CACHE_SIZE) {
            Some(fcs) => Some(fcs.parse::<usize>().map_err(ArgsError::FontCache)?),
            None => None,
        };
        let preload = {
            let values: Vec<&str> = matches.get_many::<String>(OPT_PRELOAD)
                .map(|vs| vs.map(|v| v.as_str()).collect())
                .unwrap_or_default();
            parse_preload(&values)?
        };

        let openai_api_key = value_of(&matches, OPT_OPENAI_KEY)
            .map(str::trim).filter(|k| !k.is_empty()).map(str::to_owned);
        let openai_model = value_of(&matches, OPT_OPENAI_MODEL)
            .unwrap_or(DEFAULT_OPENAI_MODEL).to_owned();
        let openai_base_url = value_of(&matches, OPT_OPENAI_URL)
            .unwrap_or(DEFAULT_OPENAI_URL).to_owned();

        let request_timeout = parse_secs(&matches, OPT_REQUEST_TIMEOUT)
            .map_err(ArgsError::RequestTimeout)?;
        let ai_timeout = parse_secs(&matches, OPT_AI_TIMEOUT)
            .map_err(ArgsError::AiTimeout)?;
        let shutdown_timeout = parse_secs(&matches, OPT_SHUTDOWN_TIMEOUT)
            .map_err(ArgsError::ShutdownTimeout)?;

        Ok(Options{
            verbosity, address,
            template_directory, font_directory, catalog_path,
            render_threads, template_cache_size, font_cache_size, preload,
            openai_api_key, openai_model, openai_base_url,
            request_timeout, ai_timeout, shutdown_timeout,
        })
    }
}

#[inline]
fn value_of<'m>(matches: &'m ArgMatches, name: &str) -> Option<&'m str> {
    matches.get_one::<String>(name).map(|s| s.as_str())
}

/// Parse the server address, filling in the default host or port if missing.
fn parse_address(addr: &str) -> Result<SocketAddr, AddrParseError> {
    let mut addr: Cow<str> = addr.trim().into();

    // If the address is just a port (e.g. ":4242"),
    // then we will prepend it with the default host.
    if addr.starts_with(':') && addr.chars().skip(1).all(|c| c.is_ascii_digit()) {
        addr = format!("{}{}", DEFAULT_HOST, addr).into();
    }

    // Alternatively, it can be just an interface address, without a port,
    // in which case we'll add the default port.
    let is_just_ipv4 = addr.contains('.') && !addr.contains(':');
    let is_just_ipv6 = addr.starts_with('[') && addr.ends_with(']');
    if is_just_ipv4 || is_just_ipv6 {
        addr = format!("{}:{}", addr, DEFAULT_PORT).into();
    }

    addr.parse()
}

/// Interpret the values of --preload flags.
fn parse_preload(values: &[&str]) -> Result<BTreeSet<Resource>, PreloadError> {
    let mut result = BTreeSet::new();
    let (mut all_count, mut none_count) = (0, 0);
    for &v in values {
        match v {
            "all" | "both" => { all_count += 1; }
            "none" => { none_count += 1; }
            v => { result.insert(v.parse::<Resource>()?); }
        }
    }

    if all_count > 0 && none_count > 0 {
        return Err(PreloadError::Conflict(
            "cannot specify `--preload all` and `--preload none` simultaneously"));
    }
    if all_count > 0 && all_count < values.len() {
        return Err(PreloadError::Conflict(
            "cannot specify `--preload all` alongside specific resource types"));
    }
    if none_count > 0 && none_count < values.len() {
        return Err(PreloadError::Conflict(
            "cannot specify `--preload none` alongside specific resource types"));
    }

    if all_count > 0 {
        result.extend(Resource::all());
    }
    Ok(result)
}

/// Parse a number of seconds from a flag that has a default value.
fn parse_secs(matches: &ArgMatches, name: &str) -> Result<Duration, ParseIntError> {
    value_of(matches, name).unwrap_or("0").parse::<u64>().map(Duration::from_secs)
}


/// Error that can occur while parsing of command line arguments.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// General when parsing the arguments.
    #[error("{0}")]
    Parse(#[from] clap::Error),
    /// Error while parsing the server address.
    #[error("invalid server address: {0}")]
    Address(#[from] AddrParseError),
    /// Error while parsing --render-threads flag.
    #[error("invalid --render-threads value: {0}")]
    RenderThreads(#[source] ParseIntError),
    /// Error while parsing --template-cache flag.
    #[error("invalid --template-cache value: {0}")]
    TemplateCache(#[source] ParseIntError),
    /// Error while parsing --font-cache flag.
    #[error("invalid --font-cache value: {0}")]
    FontCache(#[source] ParseIntError),
    /// Error while parsing --preload flag.
    #[error("invalid --preload value: {0}")]
    Preload(#[from] PreloadError),
    /// Error while parsing --request-timeout flag.
    #[error("invalid --request-timeout value: {0}")]
    RequestTimeout(#[source] ParseIntError),
    /// Error while parsing --ai-timeout flag.
    #[error("invalid --ai-timeout value: {0}")]
    AiTimeout(#[source] ParseIntError),
    /// Error while parsing --shutdown-timeout flag.
    #[error("invalid --shutdown-timeout value: {0}")]
    ShutdownTimeout(#[source] ParseIntError),
}

/// Error that can occur while parsing the --preload flag.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreloadError {
    /// "all" or "none" is used alongside other options.
    #[error("{0}")]
    Conflict(&'static str),
    /// Unknown resource type.
    #[error("unknown resource type `{0}`")]
    InvalidResource(String),
}


/// One of the resources used for rendering image macros.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource { Template, Font }

impl Resource {
    #[inline]
    pub fn all() -> [Resource; 2] {
        [Resource::Template, Resource::Font]
    }
}

impl FromStr for Resource {
    type Err = PreloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_end_matches('s');  // accept singular/plural
        Resource::all().into_iter()
            .find(|r| r.to_string().trim_end_matches('s') == s)
            .ok_or_else(|| PreloadError::InvalidResource(s.to_owned()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}s", format!("{:?}", self).to_lowercase())
    }
}


// Parser configuration

const ARG_ADDR: &str = "address";
const OPT_TEMPLATE_DIR: &str = "template-dir";
const OPT_FONT_DIR: &str = "font-dir";
const OPT_CATALOG: &str = "catalog";
const OPT_RENDER_THREADS: &str = "render-threads";
const OPT_TEMPLATE_CACHE_SIZE: &str = "template-cache";
const OPT_FONT_CACHE_SIZE: &str = "font-cache";
const OPT_PRELOAD: &str = "preload";
const OPT_OPENAI_KEY: &str = "openai-key";
const OPT_OPENAI_MODEL: &str = "openai-model";
const OPT_OPENAI_URL: &str = "openai-url";
const OPT_REQUEST_TIMEOUT: &str = "request-timeout";
const OPT_AI_TIMEOUT: &str = "ai-timeout";
const OPT_SHUTDOWN_TIMEOUT: &str = "shutdown-timeout";
const OPT_VERBOSE: &str = "verbose";
const OPT_QUIET: &str = "quiet";

const VALID_PRELOAD: [&str; 5] = ["all", "both", "none", "templates", "fonts"];

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 1337;
const DEFAULT_ADDRESS: &str = "0.0.0.0:1337";
const DEFAULT_TEMPLATE_DIR: &str = "data/templates";
const DEFAULT_FONT_DIR: &str = "data/fonts";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AI_TIMEOUT: &str = "30";

// Request timeouts and waiting for shutdown are disabled in debug mode
// unless specifically requested.
const DEFAULT_REQUEST_TIMEOUT: &str = if cfg!(debug_assertions) { "0" } else { "10" };
const DEFAULT_SHUTDOWN_TIMEOUT: &str = if cfg!(debug_assertions) { "0" } else { "30" };


/// Create the parser for application's command line.
fn create_parser() -> Command {
    let mut parser = Command::new(*NAME);
    if let Some(version) = *VERSION {
        parser = parser.version(version);
    }
    parser
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap_or(""))
        .author(crate_authors!(", "))

        .arg(Arg::new(ARG_ADDR)
            .value_name("ADDRESS:PORT")
            .required(false)
            .default_value(DEFAULT_ADDRESS)
            .help("Binds the server to given address")
            .long_help(concat!(
                "The address and/or port for the server to listen on.\n\n",
                "This argument can be an IP address of a network interface, ",
                "optionally followed by colon and a port number. ",
                "Alternatively, a colon and port alone is also allowed, ",
                "in which case the server will listen on all network interfaces.")))

        // Resource options.
        .arg(Arg::new(OPT_TEMPLATE_DIR)
            .long("template-dir")
            .value_name("DIR")
            .default_value(DEFAULT_TEMPLATE_DIR)
            .help("Directory with template images"))
        .arg(Arg::new(OPT_FONT_DIR)
            .long("font-dir")
            .value_name("DIR")
            .default_value(DEFAULT_FONT_DIR)
            .help("Directory with fonts"))
        .arg(Arg::new(OPT_CATALOG)
            .long("catalog")
            .value_name("FILE")
            .required(false)
            .help("JSON file with the template catalog")
            .long_help(concat!(
                "JSON file listing the template categories and templates ",
                "served by the /api/templates endpoints.\n\n",
                "If omitted, the built-in catalog is used.")))

        // Rendering options.
        .arg(Arg::new(OPT_RENDER_THREADS)
            .long("render-threads")
            .value_name("N")
            .required(false)
            .help("Number of render threads to use")
            .long_help(concat!(
                "Maximum number of images rendered at the same time.\n\n",
                "If omitted, one per each CPU core will be used.")))

        // Cache options.
        .arg(Arg::new(OPT_TEMPLATE_CACHE_SIZE)
            .long("template-cache")
            .value_name("SIZE")
            .required(false)
            .help("Size of the template cache"))
        .arg(Arg::new(OPT_FONT_CACHE_SIZE)
            .long("font-cache")
            .value_name("SIZE")
            .required(false)
            .help("Size of the font cache"))
        .arg(Arg::new(OPT_PRELOAD)
            .long("preload")
            .value_name("WHAT")
            .required(false)
            .value_parser(VALID_PRELOAD)
            .action(ArgAction::Append)
            .help("What resources to preload on server startup")
            .long_help(concat!(
                "Which resource caches should be filled when the server starts\n\n",
                "All the resources found during server startup will be loaded & cached ",
                "(up to the relevant caches' capacities). ",
                "The exact subset of resources to preload in this way is randomized.")))

        // Caption generation options.
        .arg(Arg::new(OPT_OPENAI_KEY)
            .long("openai-key")
            .value_name("KEY")
            .env("OPENAI_API_KEY")
            .hide_env_values(true)
            .required(false)
            .help("API key for generating captions with OpenAI")
            .long_help(concat!(
                "API key for the OpenAI chat completions API.\n\n",
                "Without it, /api/meme/generate picks captions from a canned list.")))
        .arg(Arg::new(OPT_OPENAI_MODEL)
            .long("openai-model")
            .value_name("MODEL")
            .default_value(DEFAULT_OPENAI_MODEL)
            .help("Model used to generate captions"))
        .arg(Arg::new(OPT_OPENAI_URL)
            .long("openai-url")
            .value_name("URL")
            .default_value(DEFAULT_OPENAI_URL)
            .help("Base URL of the OpenAI-compatible API"))

        // Timeout flags.
        .arg(Arg::new(OPT_REQUEST_TIMEOUT)
            .long("request-timeout")
            .value_name("SECS")
            .default_value(DEFAULT_REQUEST_TIMEOUT)
            .help("Maximum time allowed for rendering a single image (secs)"))
        .arg(Arg::new(OPT_AI_TIMEOUT)
            .long("ai-timeout")
            .value_name("SECS")
            .default_value(DEFAULT_AI_TIMEOUT)
            .help("Maximum time allowed for generating captions (secs)"))
        .arg(Arg::new(OPT_SHUTDOWN_TIMEOUT)
            .long("shutdown-timeout")
            .value_name("SECS")
            .default_value(DEFAULT_SHUTDOWN_TIMEOUT)
            .help("Time to wait for remaining connections during shutdown (secs)"))

        // Verbosity flags.
        .arg(Arg::new(OPT_VERBOSE)
            .long("verbose").short('v')
            .action(ArgAction::Count)
            .conflicts_with(OPT_QUIET)
            .help("Increase logging verbosity"))
        .arg(Arg::new(OPT_QUIET)
            .long("quiet").short('q')
            .action(ArgAction::Count)
            .conflicts_with(OPT_VERBOSE)
            .help("Decrease logging verbosity"))
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;
    use spectral::prelude::*;
    use crate::NAME;
    use super::{parse_from_argv, parse_preload, PreloadError, Resource, VALID_PRELOAD};

    /// Check that the VALID_PRELOAD options make sense.
    #[test]
    fn preload_is_consistent() {
        let mut valid_preload_opts: HashSet<_> = VALID_PRELOAD.iter().collect();
        let resources: HashSet<_> = Resource::all().into_iter().collect();

        // Remove the broad / special values for the --preload flag.
        for x in ["all", "none"].iter() {
            assert!(valid_preload_opts.contains(x),
                "{:?} does not contain {:?}", VALID_PRELOAD, x);
            valid_preload_opts.remove(x);
        }
        assert!(valid_preload_opts.remove(&"both") == (resources.len() == 2),
            "{:?} may only contain {:?} iff there are exactly two resource types",
            VALID_PRELOAD, "both");

        // What remains should be convertible to resources -- all resources.
        let mut converted_resources = HashSet::new();
        for &vp in valid_preload_opts {
            let resource = vp.parse::<Resource>()
                .unwrap_or_else(|_| panic!("{:?} doesn't convert to a Resource", vp));
            converted_resources.insert(resource);
        }
        assert_eq!(resources, converted_resources,
            "{:?} doesn't contain values for all Resources", VALID_PRELOAD);
    }

    #[test]
    fn resource_names() {
        assert_eq!("templates", Resource::Template.to_string());
        assert_eq!("fonts", Resource::Font.to_string());
        assert_that!("font".parse::<Resource>()).is_ok().is_equal_to(Resource::Font);
        assert_that!("cats".parse::<Resource>()).is_err()
            .is_equal_to(PreloadError::InvalidResource("cat".into()));
    }

    #[test]
    fn no_args() {
        assert_that!(parse_from_argv(Vec::<&str>::new())).is_ok();
        assert_that!(parse_from_argv(vec![*NAME])).is_ok();
    }

    #[test]
    fn defaults() {
        let opts = parse_from_argv(vec![*NAME, "--openai-key", ""]).unwrap();
        assert_eq!(0, opts.verbosity);
        assert_eq!("0.0.0.0:1337", opts.address.to_string());
        assert_that!(opts.template_directory.to_str()).is_some().is_equal_to("data/templates");
        assert_that!(opts.font_directory.to_str()).is_some().is_equal_to("data/fonts");
        assert_that!(opts.catalog_path).is_none();
        assert_that!(opts.openai_api_key).is_none();
        assert_eq!("gpt-4o", opts.openai_model);
        assert_eq!(Duration::from_secs(30), opts.ai_timeout);
        assert!(opts.preload.is_empty());
    }

    #[test]
    fn verbosity_args() {
        assert_that!(parse_from_argv(vec![*NAME, "-v"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "-v", "-v"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "-vv"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "-q"])).is_ok();
        // -v & -q are contradictory
        assert_that!(parse_from_argv(vec![*NAME, "-q", "-v"])).is_err();

        let opts = parse_from_argv(vec![*NAME, "-vv"]).unwrap();
        assert_eq!(2, opts.verbosity);
        let opts = parse_from_argv(vec![*NAME, "-q"]).unwrap();
        assert_eq!(-1, opts.verbosity);
    }

    #[test]
    fn address_arg() {
        assert_that!(parse_from_argv(vec![*NAME, ":"])).is_err();
        // IP addresses alone are fine.
        assert_that!(parse_from_argv(vec![*NAME, "127.0.0.1"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "[0::1]"])).is_ok();
        // Port alone is fine, with colon.
        assert_that!(parse_from_argv(vec![*NAME, ":1234"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, ":31337"])).is_ok();
        // Both are fine.
        assert_that!(parse_from_argv(vec![*NAME, "127.0.0.1:2345"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "[0::1]:2345"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "[::1]:2345"])).is_ok();
        // Invalid address.
        assert_that!(parse_from_argv(vec![*NAME, "0.0.1"])).is_err();
        assert_that!(parse_from_argv(vec![*NAME, "[::1"])).is_err();
        assert_that!(parse_from_argv(vec![*NAME, "127.0.0.1:"])).is_err();
        // Invalid port.
        assert_that!(parse_from_argv(vec![*NAME, "4242"])).is_err();  // need colon
        assert_that!(parse_from_argv(vec![*NAME, ":123456789"])).is_err();  // >65536

        let opts = parse_from_argv(vec![*NAME, ":8080"]).unwrap();
        assert_eq!("0.0.0.0:8080", opts.address.to_string());
        let opts = parse_from_argv(vec![*NAME, "127.0.0.1"]).unwrap();
        assert_eq!("127.0.0.1:1337", opts.address.to_string());
    }

    #[test]
    fn render_threads_arg() {
        // Needs a value.
        assert_that!(parse_from_argv(vec![*NAME, "--render-threads"])).is_err();
        // Value must be a number.
        assert_that!(parse_from_argv(vec![*NAME, "--render-threads", "foo"])).is_err();
        // A positive number.
        assert_that!(parse_from_argv(vec![*NAME, "--render-threads", "-42"])).is_err();
        // This is fine.
        assert_that!(parse_from_argv(vec![*NAME, "--render-threads", "16"])).is_ok();
    }

    #[test]
    fn template_cache_arg() {
        // Needs a value.
        assert_that!(parse_from_argv(vec![*NAME, "--template-cache"])).is_err();
        // Value must be a number.
        assert_that!(parse_from_argv(vec![*NAME, "--template-cache", "foo"])).is_err();
        // A positive number.
        assert_that!(parse_from_argv(vec![*NAME, "--template-cache", "-42"])).is_err();
        // This is fine.
        assert_that!(parse_from_argv(vec![*NAME, "--template-cache", "16"])).is_ok();
    }

    #[test]
    fn font_cache_arg() {
        // Needs a value.
        assert_that!(parse_from_argv(vec![*NAME, "--font-cache"])).is_err();
        // Value must be a number.
        assert_that!(parse_from_argv(vec![*NAME, "--font-cache", "foo"])).is_err();
        // A positive number.
        assert_that!(parse_from_argv(vec![*NAME, "--font-cache", "-42"])).is_err();
        // This is fine.
        assert_that!(parse_from_argv(vec![*NAME, "--font-cache", "16"])).is_ok();
    }

    #[test]
    fn preload_arg() {
        // Needs a value.
        assert_that!(parse_from_argv(vec![*NAME, "--preload"])).is_err();
        // Value can be all/none.
        assert_that!(parse_from_argv(vec![*NAME, "--preload", "all"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "--preload", "none"])).is_ok();
        // It can also be a resource type.
        assert_that!(parse_from_argv(vec![*NAME, "--preload", "templates"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "--preload", "fonts"])).is_ok();
        // But not both, since that doesn't make sense.
        assert_that!(parse_from_argv(vec![
            *NAME, "--preload", "templates", "--preload", "all"])).is_err();
        assert_that!(parse_from_argv(vec![
            *NAME, "--preload", "none", "--preload", "fonts"])).is_err();
        // Unknown values are rejected by the parser.
        assert_that!(parse_from_argv(vec![*NAME, "--preload", "memes"])).is_err();
    }

    #[test]
    fn preload_values() {
        let all: Vec<_> = Resource::all().into_iter().collect();
        assert_that!(parse_preload(&["all"]).map(|p| p.into_iter().collect::<Vec<_>>()))
            .is_ok().is_equal_to(all);
        assert_that!(parse_preload(&["none"])).is_ok().matches(|p| p.is_empty());
        assert_that!(parse_preload(&["fonts", "fonts"]).map(|p| p.len()))
            .is_ok().is_equal_to(1);
        assert_that!(parse_preload(&["all", "none"])).is_err();
    }

    #[test]
    fn timeout_args() {
        assert_that!(parse_from_argv(vec![*NAME, "--request-timeout", "foo"])).is_err();
        assert_that!(parse_from_argv(vec![*NAME, "--ai-timeout", "-1"])).is_err();
        let opts = parse_from_argv(vec![
            *NAME, "--request-timeout", "5", "--shutdown-timeout", "7"]).unwrap();
        assert_eq!(Duration::from_secs(5), opts.request_timeout);
        assert_eq!(Duration::from_secs(7), opts.shutdown_timeout);
    }

    #[test]
    fn openai_args() {
        let opts = parse_from_argv(vec![
            *NAME, "--openai-key", "sk-test", "--openai-model", "gpt-4o-mini"]).unwrap();
        assert_that!(opts.openai_api_key).is_some().is_equal_to("sk-test".to_owned());
        assert_eq!("gpt-4o-mini", opts.openai_model);
        // The key itself is never logged.
        assert!(!format!("{:?}", opts).contains("sk-test"));
    }
}
