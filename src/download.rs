use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::REFERER;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, debug, warn};

use crate::config::DownloadConfig;
use crate::error::Result;
use crate::subtitle::subtitle_extension;
use crate::tempfiles::short_id;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Stream `url` into `destination`, returning the number of bytes written.
    /// No file is left behind on failure.
    async fn download_video(&self, url: &str, destination: &Path) -> Result<u64>;

    /// Fetch a subtitle file into `directory` under a random name
    async fn download_subtitle(&self, url: &str, directory: &Path) -> Result<PathBuf>;
}

pub struct HttpDownloader {
    client: Client,
    config: DownloadConfig,
}

impl HttpDownloader {
    pub fn new(config: DownloadConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    fn progress_bar(&self, total: Option<u64>, label: &str) -> ProgressBar {
        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                {
                    bar.set_style(style.progress_chars("#>-"));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} {bytes} ({bytes_per_sec})")
                {
                    bar.set_style(style);
                }
                bar
            }
        };
        bar.set_message(label.to_string());
        bar
    }

    async fn stream_to_file(&self, url: &str, destination: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .header(REFERER, url)
            .send()
            .await?
            .error_for_status()?;

        let label = destination
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| destination.display().to_string());
        let bar = self.progress_bar(response.content_length(), &label);

        let mut file = fs::File::create(destination).await?;
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            bar.set_position(written);
        }

        file.flush().await?;
        bar.finish();
        Ok(written)
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download_video(&self, url: &str, destination: &Path) -> Result<u64> {
        info!("Downloading video from {} to {}", url, destination.display());

        match self.stream_to_file(url, destination).await {
            Ok(written) => {
                info!("Video download completed: {} bytes", written);
                Ok(written)
            }
            Err(e) => {
                if destination.exists() {
                    if let Err(remove_err) = fs::remove_file(destination).await {
                        warn!("Failed to remove partial download {}: {}", destination.display(), remove_err);
                    }
                }
                Err(e)
            }
        }
    }

    async fn download_subtitle(&self, url: &str, directory: &Path) -> Result<PathBuf> {
        info!("Downloading subtitle from {}", url);

        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.subtitle_timeout_secs))
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;

        let path = directory.join(format!("{}_external{}", short_id(), subtitle_extension(url)));
        fs::write(&path, &body).await?;

        debug!("Wrote {} bytes to {}", body.len(), path.display());
        Ok(path)
    }
}
