use yt_dlp::{DownloadOptions, Format, VideoInfo};

use crate::formats::MP3_FORMAT_ID;

/// Format id meaning "let yt-dlp pick the best video and audio".
pub const BEST_FORMAT_ID: &str = "best";

const CONCURRENT_FRAGMENTS: u32 = 5;
const BUFFER_SIZE: &str = "16K";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Mp3,
    Mp4
}

impl MediaKind {
    pub fn for_format(format_id: &str) -> Self {
        if format_id == MP3_FORMAT_ID {
            MediaKind::Mp3
        } else {
            MediaKind::Mp4
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Mp3 => "mp3",
            MediaKind::Mp4 => "mp4"
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            MediaKind::Mp3 => "audio/mpeg",
            MediaKind::Mp4 => "video/mp4"
        }
    }
}

/// Everything the download handler needs to know before spawning yt-dlp.
#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub kind: MediaKind,
    pub filename: String,
    pub content_length: Option<u64>,
    pub options: DownloadOptions
}

impl DownloadPlan {
    pub fn new(info: &VideoInfo, format_id: &str) -> Self {
        let kind = MediaKind::for_format(format_id);
        Self {
            kind,
            filename: format!("{}.{}", sanitize_title(&info.title), kind.extension()),
            content_length: info.find_format(format_id).and_then(Format::estimated_size),
            options: download_options(format_id)
        }
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Keeps ASCII word characters, whitespace and hyphens. Whitespace is
/// normalised to plain spaces so the result is always a valid header value.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned.to_string()
    }
}

pub fn download_options(format_id: &str) -> DownloadOptions {
    let options = DownloadOptions::new()
        .concurrent_fragments(CONCURRENT_FRAGMENTS)
        .buffer_size(BUFFER_SIZE);

    match format_id {
        MP3_FORMAT_ID => options
            .extract_audio(true)
            .audio_format("mp3")
            .audio_quality("0"),
        BEST_FORMAT_ID => options.format("bestvideo+bestaudio/best"),
        id => options.format(format!("{id}+bestaudio/best"))
    }
}
