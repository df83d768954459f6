use crate::linkage::DEFAULT_HAPLOTYPE_THRESHOLD;
use crate::utils::Result;
use clap::{ArgAction, ArgGroup, Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter};
use owo_colors::{
    colors::{Blue, Green, Magenta, Red, Yellow},
    OwoColorize, Stream, Style,
};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub const FULL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name="ldval",
          version=FULL_VERSION,
          about="Detects linkage disequilibrium patterns in HLA GL String genotypes",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable or disable color output in logging
    #[arg(long, value_enum, default_value_t = Color::Auto, global = true, help_heading = "Advanced")]
    color: Color,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Linkage Disequilibrium Detector")]
    Detect(DetectArgs),
    #[clap(about = "GL String Format Validator")]
    Validate(ValidateArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Detect(_) => "detect",
            Command::Validate(_) => "validate",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("detect")))]
#[command(arg_required_else_help(true))]
pub struct DetectArgs {
    /// File with GL String genotypes, one subject per line
    #[arg(
        short = 'g',
        long = "gl-strings",
        value_name = "GL_STRINGS",
        value_parser = check_file_exists,
        required = true
    )]
    pub gl_strings_path: PathBuf,

    /// Directory with disequilibrium frequency tables (<linkage>.tsv)
    #[arg(
        short = 'f',
        long = "frequencies",
        value_name = "DIR",
        value_parser = check_dir_exists,
        required = true
    )]
    pub frequencies_dir: PathBuf,

    /// Antigen recognition site equivalence table
    #[arg(
        short = 'a',
        long = "ars",
        value_name = "ARS",
        value_parser = check_file_exists,
        required = true
    )]
    pub ars_path: PathBuf,

    /// Common and well-documented allele table
    #[arg(
        short = 'c',
        long = "cwd",
        value_name = "CWD",
        value_parser = check_file_exists,
        required = true
    )]
    pub cwd_path: PathBuf,

    /// Write the findings report to a file [standard output]
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path
    )]
    pub output_path: Option<PathBuf>,

    /// Linkage groups to evaluate (comma-separated short names)
    #[arg(
        long = "linkages",
        value_name = "LINKAGES",
        value_delimiter = ',',
        help_heading = "Advanced"
    )]
    pub linkages: Option<Vec<String>>,

    /// HLA database version the CWD table is read for
    #[arg(
        long = "hladb",
        value_name = "VERSION",
        default_value = "latest",
        help_heading = "Advanced"
    )]
    pub hladb_version: String,

    /// Skip pairing when a locus group links more haplotypes than this
    #[arg(
        long = "haplotype-threshold",
        value_name = "COUNT",
        default_value_t = DEFAULT_HAPLOTYPE_THRESHOLD,
        help_heading = "Advanced"
    )]
    pub haplotype_threshold: usize,

    /// Number of threads
    #[arg(
        short = 't',
        long = "threads",
        value_name = "THREADS",
        default_value = "1",
        value_parser = threads_in_range
    )]
    pub num_threads: usize,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("validate")))]
#[command(arg_required_else_help(true))]
pub struct ValidateArgs {
    /// File with GL String genotypes, one subject per line
    #[arg(
        short = 'g',
        long = "gl-strings",
        value_name = "GL_STRINGS",
        value_parser = check_file_exists,
        required = true
    )]
    pub gl_strings_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Color {
    Always,
    Auto,
    Never,
}

impl Color {
    fn apply(self) {
        match self {
            Color::Always => owo_colors::set_override(true),
            Color::Auto => {}
            Color::Never => owo_colors::set_override(false),
        }
    }
}

pub fn init_verbose(args: &Cli) {
    args.color.apply();

    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(format_log)
        .filter_level(filter_level)
        .init();
}

#[inline(always)]
fn level_style(level: Level) -> (&'static str, Style) {
    match level {
        Level::Error => ("ERROR", Style::new().fg::<Red>().bold()),
        Level::Warn => ("WARN", Style::new().fg::<Yellow>()),
        Level::Info => ("INFO", Style::new().fg::<Green>()),
        Level::Debug => ("DEBUG", Style::new().fg::<Blue>()),
        Level::Trace => ("TRACE", Style::new().fg::<Magenta>()),
    }
}

fn format_log(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> std::io::Result<()> {
    let (label, style) = level_style(record.level());
    let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let painted_label = label.if_supports_color(Stream::Stderr, |t| style.style(t));
    writeln!(buf, "{ts} [{}] - {}", painted_label, record.args())
}

fn check_prefix_path(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(PathBuf::from(s))
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn check_dir_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.is_dir() {
        Err(format!("Directory does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}
