use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, debug, warn};

use crate::config::TranslateConfig;
use crate::error::{HardsubError, Result};
use crate::tempfiles::short_id;
use super::SubtitleTranslator;

/// Form field carrying the subtitle file
const SUBTITLE_FIELD: &str = "subtitle_content";

/// Translator backed by the subtitle translation HTTP endpoint
pub struct ApiTranslator {
    client: Client,
    config: TranslateConfig,
}

impl ApiTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Multipart form: API key, language pair and the file itself
    fn build_form(&self, file_name: String, content: Vec<u8>) -> Form {
        Form::new()
            .text("apikey", self.config.api_key.clone())
            .text("from", self.config.source_language.clone())
            .text("to", self.config.target_language.clone())
            .part(SUBTITLE_FIELD, Part::bytes(content).file_name(file_name))
    }

    pub fn output_name(&self) -> String {
        format!("{}_translated_{}.srt", short_id(), self.config.target_language)
    }
}

#[async_trait]
impl SubtitleTranslator for ApiTranslator {
    async fn translate_file(&self, subtitle_path: &Path, directory: &Path) -> Result<PathBuf> {
        info!("Translating {} from '{}' to '{}'",
              subtitle_path.display(), self.config.source_language, self.config.target_language);

        let content = fs::read(subtitle_path).await?;
        let file_name = subtitle_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "subtitle.srt".to_string());

        debug!("Sending translation request to: {}", self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(self.build_form(file_name, content))
            .send()
            .await
            .map_err(|e| HardsubError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(HardsubError::Translation(format!(
                "Translation API error {}: {}", status, error_text
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| HardsubError::Translation(format!("Failed to read response: {}", e)))?;

        let output_path = directory.join(self.output_name());
        if let Err(e) = fs::write(&output_path, &body).await {
            if fs::try_exists(&output_path).await.unwrap_or(false) {
                if let Err(remove_err) = fs::remove_file(&output_path).await {
                    warn!("Failed to remove partial translation {}: {}", output_path.display(), remove_err);
                }
            }
            return Err(e.into());
        }

        info!("Translation saved to {}", output_path.display());
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;

    fn closed_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/subtranslate.php", addr)
    }

    #[test]
    fn test_output_name() {
        let translator = ApiTranslator::new(TranslateConfig::default()).unwrap();
        let name = translator.output_name();
        assert!(name.ends_with("_translated_id.srt"), "{}", name);
        assert_eq!(name.len(), 8 + "_translated_id.srt".len());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("ab12cd34_original.srt");
        std::fs::write(&source, "1\n00:00:01,000 --> 00:00:02,000\nHello\n").unwrap();

        let translator = ApiTranslator::new(TranslateConfig {
            endpoint: closed_endpoint(),
            ..TranslateConfig::default()
        })
        .unwrap();

        let result = translator.translate_file(&source, dir.path()).await;

        assert!(matches!(result, Err(HardsubError::Translation(_))));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("ab12cd34_original.srt")]);
    }

    #[tokio::test]
    async fn test_missing_source_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let translator = ApiTranslator::new(TranslateConfig::default()).unwrap();

        let result = translator
            .translate_file(&dir.path().join("missing.srt"), dir.path())
            .await;

        assert!(matches!(result, Err(HardsubError::Io(_))));
    }

    #[tokio::test]
    async fn test_translation_saved_from_response_body() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("ab12cd34_original.srt");
        std::fs::write(&source, "1\n00:00:01,000 --> 00:00:02,000\nHello\n").unwrap();
        let (base, server) = serve_once("200 OK", b"1\n00:00:01,000 --> 00:00:02,000\nHalo\n").await;

        let translator = ApiTranslator::new(TranslateConfig {
            endpoint: format!("{}/subtranslate.php", base),
            ..TranslateConfig::default()
        })
        .unwrap();

        let output = translator.translate_file(&source, dir.path()).await.unwrap();

        assert_eq!(output.parent().unwrap(), dir.path());
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "1\n00:00:01,000 --> 00:00:02,000\nHalo\n"
        );

        let request = &server.await.unwrap()[0];
        assert!(request.starts_with("POST /subtranslate.php "), "{}", request);
        for field in ["name=\"apikey\"", "name=\"from\"", "name=\"to\"", "name=\"subtitle_content\""] {
            assert!(request.contains(field), "missing {} in {}", field, request);
        }
        assert!(request.contains("filename=\"ab12cd34_original.srt\""));
        assert!(request.contains("Hello"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("ab12cd34_original.srt");
        std::fs::write(&source, "1\n").unwrap();
        // A regular file where the output directory should be.
        let not_a_dir = dir.path().join("out");
        std::fs::write(&not_a_dir, "").unwrap();
        let (base, _) = serve_once("200 OK", b"translated").await;

        let translator = ApiTranslator::new(TranslateConfig {
            endpoint: format!("{}/subtranslate.php", base),
            ..TranslateConfig::default()
        })
        .unwrap();

        let result = translator.translate_file(&source, &not_a_dir).await;

        assert!(matches!(result, Err(HardsubError::Io(_))));
        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["ab12cd34_original.srt", "out"]);
    }
}
