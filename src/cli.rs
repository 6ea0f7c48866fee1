use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::http::range::SuffixMode;

#[derive(Parser, Debug, Default)]
#[command(
    name = "couchtv",
    about = "Self-hosted TV channels and VOD seasons, streamed to the browser over HTTP ranges",
    long_about = None,
    version,
)]
pub struct Args {
    /// HTTP port to listen on [default: 5000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding channels.json, seasons.json and shows.json [default: ./data]
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Static frontend served for non-API routes [default: ./frontend]
    #[arg(long, value_name = "DIR")]
    pub frontend: Option<PathBuf>,

    /// Path to TOML config file (overrides default search: ./couchtv.toml, ~/.config/couchtv/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bind to localhost only (127.0.0.1) instead of all interfaces
    #[arg(long)]
    pub localhost: bool,

    /// How `Range: bytes=-N` is interpreted [default: standard]
    #[arg(long, value_enum, value_name = "MODE")]
    pub suffix_ranges: Option<SuffixRanges>,
}

/// Command-line spelling of [`SuffixMode`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixRanges {
    /// Last N bytes of the file
    Standard,
    /// Bytes 0 through N
    Legacy,
}

impl From<SuffixRanges> for SuffixMode {
    fn from(value: SuffixRanges) -> Self {
        match value {
            SuffixRanges::Standard => SuffixMode::Standard,
            SuffixRanges::Legacy => SuffixMode::Legacy,
        }
    }
}
