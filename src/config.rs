use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::error::{Result, HardsubError};

/// Translation endpoint baked in at build time.
pub const TRANSLATE_API_URL: &str = match option_env!("HARDSUB_TRANSLATE_URL") {
    Some(url) => url,
    None => "https://api.gungrate.id/subtranslate3.php",
};

/// Translation API key baked in at build time.
pub const TRANSLATE_API_KEY: &str = match option_env!("HARDSUB_TRANSLATE_API_KEY") {
    Some(key) => key,
    None => "secret1234",
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for downloads, temporary subtitles and relative output names
    pub work_dir: PathBuf,
    pub media: MediaConfig,
    pub render: RenderConfig,
    pub remote: RemoteConfig,
    pub translate: TranslateConfig,
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Path to ffprobe binary
    pub probe_binary_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// ASS style override passed to the subtitles filter
    pub subtitle_style: String,
    pub watermark: WatermarkConfig,
    pub video_codec: String,
    /// Encoding speed (ultrafast, faster, medium, slow, ...)
    pub preset: String,
    /// Quality (0-51, lower = better quality)
    pub crf: u32,
    pub profile: String,
    pub level: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub audio_channels: u32,
    /// 0 lets the encoder use every available thread
    pub threads: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Unescaped text; colons are escaped when the filter is built
    pub text: String,
    pub font: String,
    pub font_size: u32,
    pub font_color: String,
    /// Length of the repeating cycle in seconds
    pub cycle_secs: u32,
    /// Seconds the watermark stays visible at the start of each cycle
    pub visible_secs: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Path to rclone binary
    pub binary_path: String,
    /// Remote that name-based video lookups are copied from
    pub source_remote: String,
    /// Destination the rendered output is copied to
    pub upload_destination: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub endpoint: String,
    pub api_key: String,
    pub source_language: String,
    pub target_language: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Fixed name for a fetched video inside the work directory
    pub video_filename: String,
    pub user_agent: String,
    pub subtitle_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            media: MediaConfig::default(),
            render: RenderConfig::default(),
            remote: RemoteConfig::default(),
            translate: TranslateConfig::default(),
            download: DownloadConfig::default(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            probe_binary_path: "ffprobe".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            subtitle_style: "FontName=Noto Sans,FontSize=20,PrimaryColour=&H00FFFFFF,BorderStyle=1,Outline=1,Shadow=1,BackColour=&H00000000,Alignment=2,MarginV=25".to_string(),
            watermark: WatermarkConfig::default(),
            video_codec: "libx264".to_string(),
            preset: "faster".to_string(),
            crf: 30,
            profile: "main".to_string(),
            level: "4.1".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
            audio_channels: 2,
            threads: 0,
        }
    }
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: "http://bioskop.stream".to_string(),
            font: "Sansation".to_string(),
            font_size: 20,
            font_color: "white@0.7".to_string(),
            cycle_secs: 600,
            visible_secs: 120,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            binary_path: "rclone".to_string(),
            source_remote: "gdrive".to_string(),
            upload_destination: "file:file/".to_string(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: TRANSLATE_API_URL.to_string(),
            api_key: TRANSLATE_API_KEY.to_string(),
            source_language: "auto".to_string(),
            target_language: "id".to_string(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            video_filename: "downloaded_video.mkv".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            subtitle_timeout_secs: 15,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HardsubError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| HardsubError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Location of the fetched video inside the work directory
    pub fn downloaded_video_path(&self) -> PathBuf {
        self.work_dir.join(&self.download.video_filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            work_dir = "/tmp/jobs"

            [remote]
            upload_destination = "s3:bucket/out"

            [render.watermark]
            text = "example.org"
            "#,
        )
        .unwrap();

        assert_eq!(config.work_dir, PathBuf::from("/tmp/jobs"));
        assert_eq!(config.remote.upload_destination, "s3:bucket/out");
        assert_eq!(config.remote.binary_path, "rclone");
        assert_eq!(config.render.watermark.text, "example.org");
        assert_eq!(config.render.watermark.cycle_secs, 600);
        assert_eq!(config.render.crf, 30);
        assert_eq!(config.translate.target_language, "id");
    }

    #[test]
    fn test_downloaded_video_path() {
        let mut config = Config::default();
        config.work_dir = PathBuf::from("jobs");
        assert_eq!(config.downloaded_video_path(), PathBuf::from("jobs/downloaded_video.mkv"));
    }

    #[test]
    fn test_from_file_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hardsub.toml");
        std::fs::write(&path, "work_dir = [").unwrap();

        match Config::from_file(&path) {
            Err(HardsubError::Config(msg)) => assert!(msg.contains("Failed to parse")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
