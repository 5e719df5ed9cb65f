// Media processing over the ffmpeg / ffprobe command line tools
//
// - Probe: ffprobe JSON parsing into audio and subtitle tracks
// - Commands: command builders and filter strings
// - Processor: the ffmpeg-backed implementation

pub mod commands;
pub mod probe;
pub mod processor;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use commands::*;
pub use probe::*;
pub use processor::*;

use crate::config::{MediaConfig, RenderConfig};
use crate::error::Result;
use crate::subtitle::SubtitleSource;

/// Everything the renderer needs for one burn-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardsubJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub subtitle: SubtitleSource,
    /// Container stream index of the audio to keep
    pub audio_stream_index: u32,
}

/// Main trait for media processing operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessorTrait: Send + Sync {
    /// Check that the transcoder is installed and runnable
    async fn check_availability(&self) -> Result<()>;

    /// List the audio streams of a container
    async fn probe_audio_tracks(&self, video_path: &Path) -> Result<Vec<AudioTrack>>;

    /// List the subtitle streams of a container
    async fn probe_subtitle_tracks(&self, video_path: &Path) -> Result<Vec<SubtitleTrack>>;

    /// Extract one subtitle stream to a SubRip file
    async fn extract_subtitle(
        &self,
        video_path: &Path,
        stream_index: u32,
        output_path: &Path,
    ) -> Result<()>;

    /// Burn the subtitle and watermark into a re-encoded copy
    async fn render_hardsub(&self, job: &HardsubJob) -> Result<()>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (FFmpeg-based)
    pub fn create_processor(config: MediaConfig, render: RenderConfig) -> Box<dyn MediaProcessorTrait> {
        Box::new(processor::MediaProcessorImpl::new(config, render))
    }
}
