use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::download::{Downloader, HttpDownloader};
use crate::error::{HardsubError, Result};
use crate::media::{HardsubJob, MediaProcessorFactory, MediaProcessorTrait, SubtitleTrack};
use crate::prompt::{choose_number, confirm, Prompter};
use crate::remote::{RcloneStorage, RemoteStorage};
use crate::setup;
use crate::subtitle::{SubtitleMenu, SubtitleOption, SubtitleSource};
use crate::tempfiles::{short_id, TempFiles};
use crate::translate::{SubtitleTranslator, TranslatorFactory};

/// Where the input video came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoOrigin {
    DirectUrl,
    RemoteStorage,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredVideo {
    pub path: PathBuf,
    pub origin: VideoOrigin,
}

impl AcquiredVideo {
    /// Fetched copies may be deleted at the end; local inputs never are
    pub fn is_downloaded(&self) -> bool {
        self.origin != VideoOrigin::Local
    }
}

pub struct Workflow {
    config: Config,
    media: Box<dyn MediaProcessorTrait>,
    remote: Box<dyn RemoteStorage>,
    downloader: Box<dyn Downloader>,
    translator: Box<dyn SubtitleTranslator>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let media = MediaProcessorFactory::create_processor(config.media.clone(), config.render.clone());
        let remote = Box::new(RcloneStorage::new(config.remote.clone()));
        let downloader = Box::new(HttpDownloader::new(config.download.clone())?);
        let translator = TranslatorFactory::create_translator(config.translate.clone())?;

        Ok(Self::with_components(config, media, remote, downloader, translator))
    }

    pub fn with_components(
        config: Config,
        media: Box<dyn MediaProcessorTrait>,
        remote: Box<dyn RemoteStorage>,
        downloader: Box<dyn Downloader>,
        translator: Box<dyn SubtitleTranslator>,
    ) -> Self {
        Self {
            config,
            media,
            remote,
            downloader,
            translator,
        }
    }

    /// One interactive run.
    ///
    /// Only a missing dependency or a closed input stream is returned as an error;
    /// step failures are reported on stdout and end the run normally.
    pub async fn run(&self, prompter: &mut dyn Prompter) -> Result<()> {
        setup::check_dependencies(self.media.as_ref(), self.remote.as_ref()).await?;

        let Some(video) = self.acquire_video(prompter).await? else {
            return Ok(());
        };

        let mut temp_files = TempFiles::new();
        let processed = self.process_video(&video.path, prompter, &mut temp_files).await;

        if video.is_downloaded() && video.path.exists() {
            self.offer_delete(&video.path, prompter);
        }
        self.cleanup(&mut temp_files);

        processed
    }

    async fn acquire_video(&self, prompter: &mut dyn Prompter) -> Result<Option<AcquiredVideo>> {
        println!("\nChoose the video source:");
        println!("  [1] Direct URL (MP4/MKV)");
        println!("  [2] Remote storage (by file name)");
        println!("  [3] Local file");

        let choice = prompter.ask("Choose a number (1/2/3): ")?;
        let acquired = match choice.trim() {
            "1" => {
                let url = prompter.ask("\nEnter the direct video URL: ")?;
                self.download_direct(url.trim()).await
            }
            "2" => {
                let name = prompter.ask("\nEnter the file name on the remote: ")?;
                self.fetch_remote(name.trim()).await
            }
            "3" => {
                let path = prompter.ask("\nEnter the LOCAL video file path: ")?;
                let path = PathBuf::from(path.trim());
                if path.exists() {
                    Some(AcquiredVideo { path, origin: VideoOrigin::Local })
                } else {
                    println!("ERROR: File '{}' not found.", path.display());
                    None
                }
            }
            _ => {
                println!("Invalid choice.");
                return Ok(None);
            }
        };

        if acquired.is_none() {
            println!("\nCould not obtain the video file. Stopping.");
        }
        Ok(acquired)
    }

    async fn download_direct(&self, url: &str) -> Option<AcquiredVideo> {
        let destination = self.config.downloaded_video_path();
        println!("Downloading video: {}", url);

        match self.downloader.download_video(url, &destination).await {
            Ok(_) => {
                println!("Video download finished: {}", destination.display());
                Some(AcquiredVideo { path: destination, origin: VideoOrigin::DirectUrl })
            }
            Err(e) => {
                println!("Failed to download the video file: {}", e);
                None
            }
        }
    }

    async fn fetch_remote(&self, name: &str) -> Option<AcquiredVideo> {
        if name.is_empty() {
            println!("No file name given.");
            return None;
        }
        println!("Fetching '{}' from remote storage...", name);

        let fetched = match self.remote.fetch_by_name(name, &self.config.work_dir).await {
            Ok(path) => path,
            Err(HardsubError::RemoteNotFound(_)) => {
                println!("Failed to download with rclone: '{}' was not found.", name);
                println!("Make sure the file name is correct and exists on the remote.");
                return None;
            }
            Err(HardsubError::ToolNotFound(binary)) => {
                println!("The rclone command was not found ({}).", binary);
                return None;
            }
            Err(e) => {
                println!("Failed to download with rclone.\n   Error: {}", e);
                return None;
            }
        };

        let destination = self.config.downloaded_video_path();
        if let Err(e) = std::fs::rename(&fetched, &destination) {
            println!("Failed to move '{}' to '{}': {}", fetched.display(), destination.display(), e);
            return None;
        }

        println!("Fetched '{}' and saved it as '{}'", name, destination.display());
        Some(AcquiredVideo { path: destination, origin: VideoOrigin::RemoteStorage })
    }

    async fn process_video(
        &self,
        video_path: &Path,
        prompter: &mut dyn Prompter,
        temp_files: &mut TempFiles,
    ) -> Result<()> {
        let Some(audio_stream_index) = self.select_audio(video_path, prompter).await? else {
            return Ok(());
        };

        let Some(subtitle) = self.select_subtitle(video_path, prompter, temp_files).await? else {
            println!("Failed to prepare the subtitle.");
            return Ok(());
        };

        let output_name = prompter.ask("\nEnter the output file name (e.g. movie.mp4): ")?;
        let output_name = output_name.trim();
        if output_name.is_empty() {
            println!("No output file name given, skipping render.");
            return Ok(());
        }

        let job = HardsubJob {
            input: video_path.to_path_buf(),
            output: self.config.work_dir.join(output_name),
            subtitle,
            audio_stream_index,
        };
        self.render_and_upload(&job).await;

        Ok(())
    }

    async fn select_audio(&self, video_path: &Path, prompter: &mut dyn Prompter) -> Result<Option<u32>> {
        println!("\nAnalysing audio tracks in '{}'...", video_path.display());

        let tracks = self.media.probe_audio_tracks(video_path).await.unwrap_or_else(|e| {
            println!("Failed to analyse audio tracks: {}", e);
            Vec::new()
        });

        match tracks.as_slice() {
            [] => {
                println!("No audio track found in the video. Cannot continue.");
                Ok(None)
            }
            [only] => {
                println!("Only one audio track, selecting it: {}", only.label);
                Ok(Some(only.stream_index))
            }
            _ => {
                println!("\nChoose an audio track:");
                for (i, track) in tracks.iter().enumerate() {
                    println!("   [{}] - {}", i + 1, track.label);
                }

                let choice = choose_number(
                    prompter,
                    &format!("Audio track number (1-{}): ", tracks.len()),
                    tracks.len(),
                )?;
                let track = &tracks[choice - 1];
                println!("Selected audio: {}", track.label);
                Ok(Some(track.stream_index))
            }
        }
    }

    async fn select_subtitle(
        &self,
        video_path: &Path,
        prompter: &mut dyn Prompter,
        temp_files: &mut TempFiles,
    ) -> Result<Option<SubtitleSource>> {
        println!("\nAnalysing subtitles in '{}'...", video_path.display());

        let tracks = self.media.probe_subtitle_tracks(video_path).await.unwrap_or_else(|e| {
            println!("Failed to analyse subtitles: {}", e);
            Vec::new()
        });
        let menu = SubtitleMenu::new(tracks.len());

        println!("\nChoose the subtitle source:");
        if tracks.is_empty() {
            println!("No internal subtitles found.");
        }
        for (i, track) in tracks.iter().enumerate() {
            println!("   [{}] - [Internal] Title: {} | Language: {}", i + 1, track.title, track.language);
        }
        if let Some(translate) = menu.translate_option() {
            println!("   [{}] - Translate an internal subtitle", translate);
        }
        println!("   [{}] - Use a subtitle from an external URL", menu.external_option());

        let choice = choose_number(
            prompter,
            &format!("\nSubtitle option number (1-{}): ", menu.max_choice()),
            menu.max_choice(),
        )?;

        match menu.resolve(choice) {
            Some(SubtitleOption::Internal(position)) => {
                let track = tracks[position].clone();
                println!("\nSelected internal subtitle: [{}] - {}", choice, track.title);
                Ok(Some(SubtitleSource::Internal(track)))
            }
            Some(SubtitleOption::TranslateInternal) => {
                let which = choose_number(
                    prompter,
                    &format!("Internal subtitle number to translate (1-{}): ", tracks.len()),
                    tracks.len(),
                )?;
                let track = &tracks[which - 1];
                println!("Translating subtitle: {} ({})", track.title, track.language);
                Ok(self.translate_internal(video_path, track, temp_files).await)
            }
            Some(SubtitleOption::ExternalUrl) => {
                let url = prompter.ask("\nEnter the subtitle file URL: ")?;
                Ok(self.download_external(url.trim(), temp_files).await)
            }
            None => Ok(None),
        }
    }

    async fn translate_internal(
        &self,
        video_path: &Path,
        track: &SubtitleTrack,
        temp_files: &mut TempFiles,
    ) -> Option<SubtitleSource> {
        let original = self.config.work_dir.join(format!("{}_original.srt", short_id()));
        temp_files.track(&original);

        if let Err(e) = self
            .media
            .extract_subtitle(video_path, track.stream_index, &original)
            .await
        {
            println!("Failed to extract the subtitle: {}", e);
            return None;
        }
        println!("Subtitle extracted to: {}", original.display());

        println!(
            "Translating subtitle from '{}' to '{}'...",
            self.config.translate.source_language, self.config.translate.target_language
        );
        match self.translator.translate_file(&original, &self.config.work_dir).await {
            Ok(translated) => {
                println!("Translation saved to: {}", translated.display());
                temp_files.track(&translated);
                Some(SubtitleSource::External(translated))
            }
            Err(e) => {
                println!("Failed to translate the subtitle: {}", e);
                None
            }
        }
    }

    async fn download_external(&self, url: &str, temp_files: &mut TempFiles) -> Option<SubtitleSource> {
        if url.is_empty() {
            return None;
        }

        println!("Downloading subtitle from: {}", url);
        match self.downloader.download_subtitle(url, &self.config.work_dir).await {
            Ok(path) => {
                println!("External subtitle saved to: {}", path.display());
                temp_files.track(&path);
                Some(SubtitleSource::External(path))
            }
            Err(e) => {
                println!("Failed to download the subtitle: {}", e);
                None
            }
        }
    }

    async fn render_and_upload(&self, job: &HardsubJob) {
        println!("\nStarting hardsub...");
        println!("   Input: {}", job.input.display());
        println!("   Output: {}", job.output.display());
        println!("   Audio stream index: {}", job.audio_stream_index);
        println!("   Subtitle source: {}", job.subtitle);

        if let Err(e) = self.media.render_hardsub(job).await {
            println!("Hardsub failed: {}", e);
            return;
        }
        println!("\nDone! Hardsubbed video: {}", job.output.display());

        println!("\nUploading '{}' with rclone...", job.output.display());
        match self.remote.upload(&job.output).await {
            Ok(()) => println!("Upload of '{}' succeeded.", job.output.display()),
            Err(e) => println!("Upload failed: {}", e),
        }
    }

    fn offer_delete(&self, video_path: &Path, prompter: &mut dyn Prompter) {
        let question = format!(
            "\nDelete the downloaded original '{}'? (y/n): ",
            video_path.display()
        );

        match confirm(prompter, &question) {
            Ok(true) => match std::fs::remove_file(video_path) {
                Ok(()) => println!("Downloaded file '{}' deleted.", video_path.display()),
                Err(e) => println!("Failed to delete '{}': {}", video_path.display(), e),
            },
            Ok(false) => info!("Keeping {}", video_path.display()),
            Err(e) => warn!("No answer to the delete question: {}", e),
        }
    }

    fn cleanup(&self, temp_files: &mut TempFiles) {
        if temp_files.is_empty() {
            return;
        }

        println!("\nCleaning up temporary files...");
        for removed in temp_files.cleanup() {
            println!("   - Removed '{}'", removed.display());
        }
    }
}
