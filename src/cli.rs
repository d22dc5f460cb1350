// src/cli.rs

use crate::{constants, scanner::MediaKind};
use clap::{Parser, ValueEnum, builder::FalseyValueParser, command, crate_version};
use std::path::PathBuf;

/// Log file verbosity
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    // --- Course ---
    /// Account e-mail address
    #[arg(help_heading = "Course")]
    pub email: String,
    /// Account password ('-' to type it in without echo)
    #[arg(help_heading = "Course")]
    pub password: String,
    /// Course identifier, as in /courses/<COURSE>/<RUN>
    #[arg(help_heading = "Course")]
    pub course: String,
    /// Course run number
    #[arg(help_heading = "Course")]
    pub run: u32,
    /// Only download this week (1-based); all weeks when omitted
    #[arg(value_parser = clap::value_parser!(u32).range(1..), help_heading = "Course")]
    pub week: Option<u32>,

    // --- Options ---
    /// Media types to look for: 'mp4' videos, 'vtt' subtitles, anything else is a linked document extension
    #[arg(short, long, value_delimiter = ',', default_value = constants::DEFAULT_MEDIA_TYPES, help_heading = "Options")]
    pub types: Vec<MediaKind>,
    /// Root of the download tree
    #[arg(short, long, value_name = "DIR", env = "OP_DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_OUTPUT_DIR), help_heading = "Options")]
    pub output: PathBuf,
    /// Root for the scratch directory (defaults to the system temp dir)
    #[arg(long, value_name = "DIR", env = "TMP_DIR", help_heading = "Options")]
    pub temp_dir: Option<PathBuf>,
    /// Re-download files that already exist and are not empty
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub force_redownload: bool,
    /// Minimum pause before each download, in seconds
    #[arg(long, value_name = "SECS", env = "FL_MIN_DELAY", default_value_t = constants::DEFAULT_MIN_DELAY_SECS, help_heading = "Options")]
    pub min_delay: u64,
    /// Maximum pause before each download, in seconds
    #[arg(long, value_name = "SECS", env = "FL_MAX_DELAY", default_value_t = constants::DEFAULT_MAX_DELAY_SECS, help_heading = "Options")]
    pub max_delay: u64,
    /// Scan the pages and list what would be downloaded, without downloading
    #[arg(short = 'n', long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub dry_run: bool,
    /// Skip malformed markup instead of aborting
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub best_effort: bool,
    /// Wait for <return> after each step page
    #[arg(long, action = clap::ArgAction::SetTrue, env = "FL_PAUSE", value_parser = FalseyValueParser::new(), help_heading = "Options")]
    pub pause: bool,
    /// List the downloadable URLs found on every step page
    #[arg(short, long, action = clap::ArgAction::SetTrue, env = "FL_VERBOSE", value_parser = FalseyValueParser::new(), help_heading = "Options")]
    pub verbose: bool,
    /// Keep dumps of the sign-in, course and week pages in the scratch directory
    #[arg(long, action = clap::ArgAction::SetTrue, env = "FL_DEBUG", value_parser = FalseyValueParser::new(), help_heading = "Options")]
    pub debug: bool,

    // --- General ---
    /// Print help
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// Print version
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (hidden) log file verbosity, for troubleshooting
    #[arg(long, value_enum, env = "FL_LOG_LEVEL", default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
