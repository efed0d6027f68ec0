//! Command-line interface definitions
//!
//! Lives in the library so `xtask` can generate man pages from it.

use clap::{Args, Parser, Subcommand};

use crate::backend::BackendKind;
use crate::time::parse_time;

/// Version string shown by `--version`.
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", ",
    env!("YTLOOP_BUILD_DATE"),
    ")"
);

/// Version string shown by `--version`.
#[cfg(feature = "release")]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("YTLOOP_BUILD_DATE"),
    ")"
);

const AFTER_HELP: &str = concat!(
    "Times accept SS, MM:SS or H:MM:SS with optional fractions (e.g. 1:02.5).\n",
    "Project: https://github.com/",
    env!("YTLOOP_REPO_NAME")
);

/// YouTube Looper - loop a section of a YouTube video
#[derive(Parser, Debug)]
#[command(name = "ytloop")]
#[command(version = VERSION)]
#[command(about = "Loop a section of a YouTube video between two timestamps")]
#[command(long_about = "Loop a section of a YouTube video between two timestamps.\n\n\
    Paste a video ID, a YouTube URL or a loop link, pick a start and end on the range \
    bar, and playback repeats between them. The loop is shared as a link carrying \
    the videoId, start and end query parameters.\n\n\
    Running without a subcommand is the same as `ytloop play`.")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Log debug output to the log file
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Loop a video in the terminal
    #[command(long_about = "Open the looper for a video.\n\n\
        INPUT may be an 11-character video ID, a YouTube URL (watch, youtu.be, \
        embed, shorts, live) or a loop link such as \
        '?videoId=dQw4w9WgXcQ&start=43&end=51'. --start/--end override the \
        link's bounds. The final loop link is printed on exit.")]
    Play(PlayArgs),

    /// Print the loop link for a video and range
    Link(LinkArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct PlayArgs {
    /// Video ID, YouTube URL or loop link (default from config)
    pub input: Option<String>,

    /// Loop start
    #[arg(long, value_parser = parse_time, value_name = "TIME")]
    pub start: Option<f64>,

    /// Loop end
    #[arg(long, value_parser = parse_time, value_name = "TIME")]
    pub end: Option<f64>,

    /// Playback speed (0.25 to 2, snapped to YouTube's rates)
    #[arg(long)]
    pub speed: Option<f64>,

    /// Player backend (overrides config)
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,
}

#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Video ID, YouTube URL or loop link
    pub input: String,

    /// Loop start
    #[arg(long, value_parser = parse_time, value_name = "TIME")]
    pub start: Option<f64>,

    /// Loop end
    #[arg(long, value_parser = parse_time, value_name = "TIME")]
    pub end: Option<f64>,

    /// URL to append the query to (overrides config)
    #[arg(long, value_name = "URL")]
    pub base: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Open configuration file in $EDITOR
    Edit,
    /// Add missing fields to the configuration file
    Migrate,
}
