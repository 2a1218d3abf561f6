//! Module defining the command line argument parser.

use std::path::{Path, PathBuf};

use clap::{crate_authors, Arg, ArgAction, ArgMatches, Command};
use memecraft::{ImageMacro, IMAGE_FORMAT_EXTENSIONS};

use crate::{NAME, VERSION};
use super::model::{ArgsError, Options};


impl TryFrom<ArgMatches> for Options {
    type Error = ArgsError;

    fn try_from(matches: ArgMatches) -> Result<Self, Self::Error> {
        let verbose_count = matches.get_count(OPT_VERBOSE) as isize;
        let quiet_count = matches.get_count(OPT_QUIET) as isize;
        let verbosity = verbose_count - quiet_count;

        let mut template_directory = PathBuf::from(
            value_of(&matches, OPT_TEMPLATE_DIR).unwrap_or(DEFAULT_TEMPLATE_DIR));
        let font_directory = PathBuf::from(
            value_of(&matches, OPT_FONT_DIR).unwrap_or(DEFAULT_FONT_DIR));

        // The template can also be given as path to the image file,
        // in which case it's loaded from the file's directory.
        let mut template = value_of(&matches, ARG_TEMPLATE).unwrap_or("").trim().to_owned();
        if let Some((directory, name)) = split_template_path(&template) {
            template_directory = directory;
            template = name;
        }

        let mut builder = ImageMacro::builder().template(template);
        if let Some(width) = value_of(&matches, OPT_WIDTH) {
            builder = builder.width(width.trim().parse()?);
        }
        if let Some(height) = value_of(&matches, OPT_HEIGHT) {
            builder = builder.height(height.trim().parse()?);
        }
        if let Some(font) = value_of(&matches, OPT_FONT) {
            builder = builder.font(font.trim());
        }
        if let Some(text) = value_of(&matches, OPT_TOP_TEXT) {
            builder = builder.top_text(text);
        }
        if let Some(text) = value_of(&matches, OPT_BOTTOM_TEXT) {
            builder = builder.bottom_text(text);
        }
        let image_macro = builder.build()?;

        // Output path can be set explicit to stdout via `-`.
        let output_path = value_of(&matches, OPT_OUTPUT)
            .map(|p| p.trim())
            .filter(|&p| p != "-")
            .map(PathBuf::from);

        Ok(Options{verbosity, image_macro, template_directory, font_directory, output_path})
    }
}

#[inline]
fn value_of<'m>(matches: &'m ArgMatches, name: &str) -> Option<&'m str> {
    matches.get_one::<String>(name).map(|s| s.as_str())
}

/// If the template argument is a path to an image file,
/// split it into the directory and the template name.
fn split_template_path(template: &str) -> Option<(PathBuf, String)> {
    let path = Path::new(template);
    let has_directory = path.parent().map(|p| !p.as_os_str().is_empty()).unwrap_or(false);
    let has_image_extension = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_FORMAT_EXTENSIONS.contains_key(e.to_lowercase().as_str()))
        .unwrap_or(false);
    if !(has_directory || has_image_extension) {
        return None;
    }

    let name = path.file_stem().and_then(|s| s.to_str())?.to_owned();
    let directory = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_owned(),
        _ => PathBuf::from("."),
    };
    Some((directory, name))
}


// Parser definition

const ARG_TEMPLATE: &str = "template";
const OPT_TOP_TEXT: &str = "top";
const OPT_BOTTOM_TEXT: &str = "bottom";
const OPT_WIDTH: &str = "width";
const OPT_HEIGHT: &str = "height";
const OPT_FONT: &str = "font";
const OPT_TEMPLATE_DIR: &str = "template-dir";
const OPT_FONT_DIR: &str = "font-dir";
const OPT_OUTPUT: &str = "output";
const OPT_VERBOSE: &str = "verbose";
const OPT_QUIET: &str = "quiet";

const DEFAULT_TEMPLATE_DIR: &str = "data/templates";
const DEFAULT_FONT_DIR: &str = "data/fonts";


/// Create the parser for application's command line.
pub fn create_parser() -> Command {
    let mut parser = Command::new(*NAME);
    if let Some(version) = *VERSION {
        parser = parser.version(version);
    }
    parser
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap_or(""))
        .author(crate_authors!(", "))

        // Image macro.
        .arg(Arg::new(ARG_TEMPLATE)
            .value_name("TEMPLATE")
            .required(true)
            .help("Template to render the meme with")
            .long_help(concat!(
                "Name of the template image to render the meme with.\n\n",
                "This can also be a path to an image file ",
                "(e.g. `./drake.png`), which is then used as the template.")))
        .arg(Arg::new(OPT_TOP_TEXT)
            .long("top").short('t')
            .value_name("TEXT")
            .help("Text at the top of the image"))
        .arg(Arg::new(OPT_BOTTOM_TEXT)
            .long("bottom").short('b')
            .value_name("TEXT")
            .help("Text at the bottom of the image"))
        .arg(Arg::new(OPT_WIDTH)
            .long("width")
            .value_name("PIXELS")
            .help("Width of the rendered image")
            .long_help(concat!(
                "Width of the rendered image.\n\n",
                "The template is scaled to fit the image, preserving its aspect ratio. ",
                "By default, the template's own width is used.")))
        .arg(Arg::new(OPT_HEIGHT)
            .long("height")
            .value_name("PIXELS")
            .help("Height of the rendered image"))
        .arg(Arg::new(OPT_FONT)
            .long("font")
            .value_name("NAME")
            .help("Font to render the text with"))

        // Resource flags.
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

        // Output flags.
        .arg(Arg::new(OPT_OUTPUT)
            .long("output").short('o')
            .value_name("FILE")
            .required(false)
            .help("File to write the rendered image to")
            .long_help(concat!(
                "What file should the final image be written to.\n\n",
                "By default, or when this flag is set to `-` (single dash), the image is written ",
                "to standard output so it can be e.g. piped to the ImageMagick `display` program.")))

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
