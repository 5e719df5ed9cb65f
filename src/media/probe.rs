use serde::Deserialize;

use crate::error::Result;

const UNKNOWN: &str = "N/A";
const UNTITLED: &str = "Untitled";

/// Stream type filter for ffprobe's `-select_streams`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Audio,
    Subtitle,
}

impl StreamKind {
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Audio => "a",
            Self::Subtitle => "s",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTrack {
    /// Container stream index
    pub stream_index: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    /// Zero-based position among the subtitle streams
    pub position: usize,
    /// Container stream index
    pub stream_index: u32,
    pub language: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    index: u32,
    codec_name: Option<String>,
    #[serde(default)]
    tags: ProbeTags,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeTags {
    language: Option<String>,
    title: Option<String>,
}

/// Parse `ffprobe -print_format json -show_streams -select_streams a` output
pub fn parse_audio_tracks(json: &str) -> Result<Vec<AudioTrack>> {
    let output: ProbeOutput = serde_json::from_str(json)?;

    Ok(output
        .streams
        .into_iter()
        .map(|stream| {
            let language = stream.tags.language.as_deref().unwrap_or(UNKNOWN);
            let codec = stream.codec_name.as_deref().unwrap_or(UNKNOWN);
            let mut label = format!("Language: {}, Codec: {}", language, codec);
            if let Some(title) = stream.tags.title.as_deref().filter(|t| !t.is_empty()) {
                label.push_str(&format!(", Title: {}", title));
            }

            AudioTrack {
                stream_index: stream.index,
                label,
            }
        })
        .collect())
}

/// Parse `ffprobe -print_format json -show_streams -select_streams s` output
pub fn parse_subtitle_tracks(json: &str) -> Result<Vec<SubtitleTrack>> {
    let output: ProbeOutput = serde_json::from_str(json)?;

    Ok(output
        .streams
        .into_iter()
        .enumerate()
        .map(|(position, stream)| SubtitleTrack {
            position,
            stream_index: stream.index,
            language: stream.tags.language.unwrap_or_else(|| UNKNOWN.to_string()),
            title: stream.tags.title.unwrap_or_else(|| UNTITLED.to_string()),
        })
        .collect())
}
