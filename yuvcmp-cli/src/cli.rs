// yuvcmp-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use yuvcmp_core::config::{AnalysisMode, DEFAULT_SKIP_FRAMES, DEFAULT_WINDOW_SIZE};
use yuvcmp_core::CoreError;

use crate::error::CliResult;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "yuvcmp: compare and align raw YUV 4:2:0 streams",
    long_about = "Generates mse/psnr/sharpness/DCT-hash statistics for a pair of raw I420 files.\n\
                  The best-match mode searches a window of frames for the lowest luma error, \
                  optionally after skipping frames of file 1. The DCT hash mode hashes a window \
                  of frames from each file and prints trimming instructions that align them."
)]
pub struct Cli {
    /// First raw I420 input file
    #[arg(short = '1', long = "input1", value_name = "FILE1")]
    pub input1: PathBuf,

    /// Second raw I420 input file (optional in DCT hash mode)
    #[arg(short = '2', long = "input2", value_name = "FILE2")]
    pub input2: Option<PathBuf>,

    /// Frame width in pixels; detected from the file size when omitted
    #[arg(short = 'W', long, value_name = "PIXELS", requires = "height")]
    pub width: Option<usize>,

    /// Frame height in pixels; detected from the file size when omitted
    #[arg(short = 'H', long, value_name = "PIXELS", requires = "width")]
    pub height: Option<usize>,

    /// Raise verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Find the best luma mse match for each frame within the window
    #[arg(short = 'b', long = "bestmatch", conflicts_with = "dcthash")]
    pub bestmatch: bool,

    /// Align the files by DCT hash and print trimming instructions
    #[arg(short = 'D', long = "dcthash")]
    pub dcthash: bool,

    /// Number of frames to process (best-match and DCT hash modes)
    #[arg(
        short = 'w',
        long = "window",
        value_name = "FRAMES",
        env = "YUVCMP_WINDOW",
        default_value_t = DEFAULT_WINDOW_SIZE
    )]
    pub window: u64,

    /// Number of frames to skip before processing (best-match and DCT hash modes)
    #[arg(
        short = 's',
        long = "skip",
        value_name = "FRAMES",
        env = "YUVCMP_SKIP",
        default_value_t = DEFAULT_SKIP_FRAMES
    )]
    pub skip: u64,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Fixed-width text columns
    Text,
    /// One JSON object per line
    Json,
}

impl Cli {
    /// The analysis mode selected by the flags.
    pub fn mode(&self) -> AnalysisMode {
        if self.bestmatch {
            AnalysisMode::BestMatch
        } else if self.dcthash {
            AnalysisMode::HashAlign
        } else {
            AnalysisMode::Compare
        }
    }

    /// Explicit frame dimensions, if both were given.
    pub fn dimensions(&self) -> CliResult<Option<(usize, usize)>> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Ok(Some((width, height))),
            (None, None) => Ok(None),
            _ => Err(CoreError::Config(
                "width (-W) and height (-H) must be given together".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["yuvcmp", "-1", "a.yuv", "-2", "b.yuv"]).unwrap();
        assert_eq!(cli.mode(), AnalysisMode::Compare);
        assert_eq!(cli.window, DEFAULT_WINDOW_SIZE);
        assert_eq!(cli.skip, 0);
        assert_eq!(cli.format, ReportFormat::Text);
        assert_eq!(cli.dimensions().unwrap(), None);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "yuvcmp", "-1", "a.yuv", "-2", "b.yuv", "-W", "1280", "-H", "720", "-b", "-w", "10",
            "-s", "3", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.mode(), AnalysisMode::BestMatch);
        assert_eq!(cli.dimensions().unwrap(), Some((1280, 720)));
        assert_eq!((cli.window, cli.skip, cli.verbose), (10, 3, 2));
    }

    #[test]
    fn test_dcthash_with_single_input() {
        let cli = Cli::try_parse_from(["yuvcmp", "-1", "a.yuv", "-D", "--format", "json"]).unwrap();
        assert_eq!(cli.mode(), AnalysisMode::HashAlign);
        assert!(cli.input2.is_none());
        assert_eq!(cli.format, ReportFormat::Json);
    }

    #[test]
    fn test_modes_conflict() {
        assert!(Cli::try_parse_from(["yuvcmp", "-1", "a.yuv", "-b", "-D"]).is_err());
    }

    #[test]
    fn test_width_requires_height() {
        assert!(Cli::try_parse_from(["yuvcmp", "-1", "a.yuv", "-W", "640"]).is_err());
    }
}
