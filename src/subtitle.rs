use std::fmt;
use std::path::{Path, PathBuf};

use crate::media::SubtitleTrack;

const DEFAULT_SUBTITLE_EXTENSION: &str = ".srt";

/// Subtitle burned into the output: exactly one per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleSource {
    /// A subtitle stream inside the input container
    Internal(SubtitleTrack),
    /// A subtitle file on disk (downloaded or translated)
    External(PathBuf),
}

impl fmt::Display for SubtitleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(track) => write!(
                f,
                "internal subtitle #{} (stream {}, {})",
                track.position + 1,
                track.stream_index,
                track.language
            ),
            Self::External(path) => write!(f, "{}", path.display()),
        }
    }
}

/// What a subtitle menu number stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleOption {
    /// Zero-based position of an internal subtitle
    Internal(usize),
    TranslateInternal,
    ExternalUrl,
}

/// Numbering of the subtitle menu.
///
/// Internal subtitles take `1..=N`, translation is `N + 1` and the external URL
/// is `N + 2`. Without internal subtitles only the external URL (1) is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtitleMenu {
    internal_count: usize,
}

impl SubtitleMenu {
    pub fn new(internal_count: usize) -> Self {
        Self { internal_count }
    }

    pub fn translate_option(&self) -> Option<usize> {
        (self.internal_count > 0).then_some(self.internal_count + 1)
    }

    pub fn external_option(&self) -> usize {
        match self.translate_option() {
            Some(translate) => translate + 1,
            None => 1,
        }
    }

    pub fn max_choice(&self) -> usize {
        self.external_option()
    }

    pub fn resolve(&self, choice: usize) -> Option<SubtitleOption> {
        if choice == self.external_option() {
            Some(SubtitleOption::ExternalUrl)
        } else if Some(choice) == self.translate_option() {
            Some(SubtitleOption::TranslateInternal)
        } else if (1..=self.internal_count).contains(&choice) {
            Some(SubtitleOption::Internal(choice - 1))
        } else {
            None
        }
    }
}

/// Extension (with the dot) of the last URL path segment, query stripped
pub fn subtitle_extension(url: &str) -> String {
    let last_segment = url.rsplit('/').next().unwrap_or_default();
    let file_name = last_segment.split(['?', '#']).next().unwrap_or_default();

    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_SUBTITLE_EXTENSION.to_string())
}
