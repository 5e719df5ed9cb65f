use std::path::Path;

use crate::command::ToolCommand;
use crate::config::{MediaConfig, RenderConfig, WatermarkConfig};
use crate::subtitle::SubtitleSource;
use super::{HardsubJob, StreamKind};

/// Escape a value for use inside an ffmpeg filter argument.
///
/// Backslashes become forward slashes and colons are quoted.
pub fn escape_filter_value(value: &str) -> String {
    escape_filter_colons(&value.replace('\\', "/"))
}

/// Quote only the colons of a path that must reach ffmpeg unchanged
pub fn escape_filter_colons(value: &str) -> String {
    value.replace(':', "\\:")
}

/// `subtitles=` filter burning `source` into the frames of `input`
pub fn subtitle_filter(input: &Path, source: &SubtitleSource, style: &str) -> String {
    match source {
        SubtitleSource::Internal(track) => format!(
            "subtitles='{}':si={}:force_style='{}'",
            escape_filter_colons(&input.to_string_lossy()),
            track.position,
            style
        ),
        SubtitleSource::External(path) => format!(
            "subtitles='{}':force_style='{}'",
            escape_filter_value(&path.to_string_lossy()),
            style
        ),
    }
}

/// `drawtext=` filter shown for the first `visible_secs` of every cycle after the first
pub fn watermark_filter(watermark: &WatermarkConfig) -> String {
    format!(
        "drawtext=text='{}':font='{}':x=10:y=H-th-10:fontsize={}:fontcolor={}:enable='if(gte(t,{cycle}),lt(mod(t,{cycle}),{visible}))'",
        escape_filter_value(&watermark.text),
        watermark.font,
        watermark.font_size,
        watermark.font_color,
        cycle = watermark.cycle_secs,
        visible = watermark.visible_secs,
    )
}

/// Builder for the ffmpeg and ffprobe invocations
pub struct MediaCommandBuilder {
    binary_path: String,
    probe_binary_path: String,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            binary_path: config.binary_path.clone(),
            probe_binary_path: config.probe_binary_path.clone(),
        }
    }

    /// Build version check command
    pub fn version_check(&self) -> ToolCommand {
        ToolCommand::new(&self.binary_path, "Version check").arg("-version")
    }

    /// Build stream listing command for one stream type
    pub fn probe_streams(&self, video_path: &Path, kind: StreamKind) -> ToolCommand {
        ToolCommand::new(&self.probe_binary_path, "Stream probe")
            .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
            .arg("-select_streams")
            .arg(kind.selector())
            .path(video_path)
    }

    /// Build subtitle extraction command (converted to SubRip)
    pub fn extract_subtitle(&self, video_path: &Path, stream_index: u32, output_path: &Path) -> ToolCommand {
        ToolCommand::new(&self.binary_path, "Subtitle extraction")
            .arg("-i")
            .path(video_path)
            .arg("-map")
            .arg(format!("0:{}", stream_index))
            .args(["-c:s", "srt", "-y"])
            .path(output_path)
    }

    /// Build the burn-in command: first video stream, one chosen audio stream
    pub fn hardsub(&self, job: &HardsubJob, render: &RenderConfig) -> ToolCommand {
        let video_filter = format!(
            "{},{}",
            subtitle_filter(&job.input, &job.subtitle, &render.subtitle_style),
            watermark_filter(&render.watermark)
        );

        ToolCommand::new(&self.binary_path, "Hardsub render")
            .arg("-i")
            .path(&job.input)
            .arg("-vf")
            .arg(video_filter)
            .args(["-map", "0:v:0"])
            .arg("-map")
            .arg(format!("0:{}", job.audio_stream_index))
            .arg("-c:v")
            .arg(&render.video_codec)
            .arg("-preset")
            .arg(&render.preset)
            .arg("-crf")
            .arg(render.crf.to_string())
            .arg("-profile:v")
            .arg(&render.profile)
            .arg("-level")
            .arg(&render.level)
            .args(["-movflags", "+faststart"])
            .arg("-c:a")
            .arg(&render.audio_codec)
            .arg("-b:a")
            .arg(&render.audio_bitrate)
            .arg("-ac")
            .arg(render.audio_channels.to_string())
            .arg("-threads")
            .arg(render.threads.to_string())
            .arg("-y")
            .path(&job.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SubtitleTrack;
    use std::path::PathBuf;

    fn builder() -> MediaCommandBuilder {
        MediaCommandBuilder::new(&MediaConfig::default())
    }

    fn internal_track() -> SubtitleTrack {
        SubtitleTrack {
            position: 1,
            stream_index: 4,
            language: "eng".to_string(),
            title: "Signs".to_string(),
        }
    }

    fn values_after<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
        args.windows(2)
            .filter(|pair| pair[0] == flag)
            .map(|pair| pair[1].as_str())
            .collect()
    }

    #[test]
    fn test_escape_filter_value() {
        assert_eq!(escape_filter_value("C:\\Videos\\sub.srt"), "C\\:/Videos/sub.srt");
        assert_eq!(escape_filter_value("plain.srt"), "plain.srt");
        assert_eq!(escape_filter_value("http://bioskop.stream"), "http\\://bioskop.stream");
    }

    #[test]
    fn test_watermark_filter_defaults() {
        assert_eq!(
            watermark_filter(&WatermarkConfig::default()),
            "drawtext=text='http\\://bioskop.stream':font='Sansation':x=10:y=H-th-10:fontsize=20:fontcolor=white@0.7:enable='if(gte(t,600),lt(mod(t,600),120))'"
        );
    }

    #[test]
    fn test_subtitle_filter_internal_uses_subtitle_position() {
        let filter = subtitle_filter(
            Path::new("movie.mkv"),
            &SubtitleSource::Internal(internal_track()),
            "FontSize=20",
        );
        assert_eq!(filter, "subtitles='movie.mkv':si=1:force_style='FontSize=20'");
    }

    #[test]
    fn test_subtitle_filter_internal_keeps_input_backslashes() {
        let filter = subtitle_filter(
            Path::new("/media/a\\b:c.mkv"),
            &SubtitleSource::Internal(internal_track()),
            "FontSize=20",
        );
        assert_eq!(filter, "subtitles='/media/a\\b\\:c.mkv':si=1:force_style='FontSize=20'");
    }

    #[test]
    fn test_subtitle_filter_external_escapes_path() {
        let filter = subtitle_filter(
            Path::new("movie.mkv"),
            &SubtitleSource::External(PathBuf::from("D:\\work\\ab12cd34_external.ass")),
            "FontSize=20",
        );
        assert_eq!(
            filter,
            "subtitles='D\\:/work/ab12cd34_external.ass':force_style='FontSize=20'"
        );
    }

    #[test]
    fn test_hardsub_maps_one_video_and_one_audio_stream() {
        let job = HardsubJob {
            input: PathBuf::from("movie.mkv"),
            output: PathBuf::from("out.mp4"),
            subtitle: SubtitleSource::Internal(internal_track()),
            audio_stream_index: 2,
        };
        let cmd = builder().hardsub(&job, &RenderConfig::default());

        assert_eq!(cmd.binary_path, "ffmpeg");
        assert_eq!(values_after(&cmd.args, "-map"), vec!["0:v:0", "0:2"]);
        assert_eq!(values_after(&cmd.args, "-i"), vec!["movie.mkv"]);

        let filter = values_after(&cmd.args, "-vf");
        assert_eq!(filter.len(), 1);
        assert!(filter[0].starts_with("subtitles='movie.mkv':si=1:force_style='FontName=Noto Sans,"));
        assert!(filter[0].contains(",drawtext=text="));

        assert_eq!(values_after(&cmd.args, "-c:v"), vec!["libx264"]);
        assert_eq!(values_after(&cmd.args, "-preset"), vec!["faster"]);
        assert_eq!(values_after(&cmd.args, "-crf"), vec!["30"]);
        assert_eq!(values_after(&cmd.args, "-profile:v"), vec!["main"]);
        assert_eq!(values_after(&cmd.args, "-level"), vec!["4.1"]);
        assert_eq!(values_after(&cmd.args, "-movflags"), vec!["+faststart"]);
        assert_eq!(values_after(&cmd.args, "-c:a"), vec!["aac"]);
        assert_eq!(values_after(&cmd.args, "-b:a"), vec!["128k"]);
        assert_eq!(values_after(&cmd.args, "-ac"), vec!["2"]);
        assert_eq!(values_after(&cmd.args, "-threads"), vec!["0"]);
        assert_eq!(cmd.args[cmd.args.len() - 2..], ["-y".to_string(), "out.mp4".to_string()]);
    }

    #[test]
    fn test_probe_and_extract_commands() {
        let probe = builder().probe_streams(Path::new("movie.mkv"), StreamKind::Subtitle);
        assert_eq!(
            probe.command_line(),
            "ffprobe -v quiet -print_format json -show_streams -select_streams s movie.mkv"
        );

        let extract = builder().extract_subtitle(Path::new("movie.mkv"), 7, Path::new("ab_original.srt"));
        assert_eq!(
            extract.command_line(),
            "ffmpeg -i movie.mkv -map 0:7 -c:s srt -y ab_original.srt"
        );
    }
}
