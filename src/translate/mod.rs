// Subtitle translation
//
// Translation is delegated to a remote HTTP service that accepts a whole
// subtitle file and answers with the translated file.

pub mod api;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use api::*;
use crate::config::TranslateConfig;
use crate::error::Result;

/// Main trait for translation operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubtitleTranslator: Send + Sync {
    /// Translate `subtitle_path` and write the result into `directory`.
    /// The output file only exists if the translation succeeded.
    async fn translate_file(&self, subtitle_path: &Path, directory: &Path) -> Result<PathBuf>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    pub fn create_translator(config: TranslateConfig) -> Result<Box<dyn SubtitleTranslator>> {
        Ok(Box::new(api::ApiTranslator::new(config)?))
    }
}
