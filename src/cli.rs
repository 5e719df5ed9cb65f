use clap::Parser;
use std::path::PathBuf;

/// Burn a subtitle and a watermark into a video, then upload the result.
///
/// Every decision (video source, audio track, subtitle source, output name)
/// is asked interactively.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for downloads, temporary subtitles and the output file
    #[arg(short = 'C', long)]
    pub work_dir: Option<PathBuf>,

    /// Also write logs to daily rotated files in this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
