use async_trait::async_trait;
use std::path::Path;
use tracing::{info, debug};

use crate::config::{MediaConfig, RenderConfig};
use crate::error::Result;
use crate::setup::{self, Dependency};
use super::{
    parse_audio_tracks, parse_subtitle_tracks, AudioTrack, HardsubJob, MediaCommandBuilder,
    MediaProcessorTrait, StreamKind, SubtitleTrack,
};

/// Concrete implementation of media processor (FFmpeg-based)
pub struct MediaProcessorImpl {
    render: RenderConfig,
    command_builder: MediaCommandBuilder,
}

impl MediaProcessorImpl {
    /// Create a new media processor implementation
    pub fn new(config: MediaConfig, render: RenderConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config);

        Self {
            render,
            command_builder,
        }
    }

    async fn probe(&self, video_path: &Path, kind: StreamKind) -> Result<String> {
        debug!("Probing {:?} streams of {}", kind, video_path.display());
        self.command_builder.probe_streams(video_path, kind).stdout().await
    }
}

#[async_trait]
impl MediaProcessorTrait for MediaProcessorImpl {
    async fn check_availability(&self) -> Result<()> {
        setup::require(Dependency::ffmpeg(), self.command_builder.version_check()).await
    }

    async fn probe_audio_tracks(&self, video_path: &Path) -> Result<Vec<AudioTrack>> {
        let json = self.probe(video_path, StreamKind::Audio).await?;
        let tracks = parse_audio_tracks(&json)?;
        info!("Found {} audio track(s) in {}", tracks.len(), video_path.display());
        Ok(tracks)
    }

    async fn probe_subtitle_tracks(&self, video_path: &Path) -> Result<Vec<SubtitleTrack>> {
        let json = self.probe(video_path, StreamKind::Subtitle).await?;
        let tracks = parse_subtitle_tracks(&json)?;
        info!("Found {} subtitle track(s) in {}", tracks.len(), video_path.display());
        Ok(tracks)
    }

    async fn extract_subtitle(
        &self,
        video_path: &Path,
        stream_index: u32,
        output_path: &Path,
    ) -> Result<()> {
        info!("Extracting subtitle stream {} from {} to {}",
              stream_index, video_path.display(), output_path.display());

        self.command_builder
            .extract_subtitle(video_path, stream_index, output_path)
            .execute()
            .await?;

        info!("Subtitle extraction completed");
        Ok(())
    }

    async fn render_hardsub(&self, job: &HardsubJob) -> Result<()> {
        let command = self.command_builder.hardsub(job, &self.render);

        println!("Running: {}", command.command_line());
        command.execute_inherited().await?;

        info!("Hardsub render completed: {}", job.output.display());
        Ok(())
    }
}
