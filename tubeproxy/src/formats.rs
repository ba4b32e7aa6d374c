use std::cmp::Reverse;
use std::collections::HashSet;

use serde::Serialize;
use yt_dlp::Format;

/// Video choices kept after sorting, not counting the MP3 entry.
pub const MAX_VIDEO_FORMATS: usize = 8;
pub const MP3_FORMAT_ID: &str = "mp3";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentedFormat {
    pub format_id: String,
    pub ext: String,
    pub resolution: String,
    pub quality: String
}

impl PresentedFormat {
    pub fn mp3() -> Self {
        Self {
            format_id: MP3_FORMAT_ID.to_string(),
            ext: "mp3".to_string(),
            resolution: "audio only".to_string(),
            quality: "MP3 (audio only)".to_string()
        }
    }

    fn from_raw(format: &Format) -> Self {
        let resolution = format
            .resolution
            .clone()
            .or_else(|| format.display_size())
            .unwrap_or_else(|| "unknown".to_string());

        let quality = format
            .format_note
            .clone()
            .filter(|note| !note.is_empty())
            .or_else(|| format.height.map(|h| format!("{h}p")))
            .unwrap_or_else(|| resolution.clone());

        Self {
            format_id: format.format_id.clone(),
            ext: format.ext.clone().unwrap_or_else(|| "unknown".to_string()),
            resolution,
            quality
        }
    }
}

/// Turns the raw yt-dlp format list into the choices offered to the user.
///
/// Video-bearing formats are deduplicated on `(resolution, ext)` keeping the
/// first one seen, ordered by the leading number of the resolution label
/// (largest first, labels without one last) and capped at
/// [`MAX_VIDEO_FORMATS`]. The MP3 extraction entry always comes first.
pub fn present_formats(formats: &[Format]) -> Vec<PresentedFormat> {
    let mut seen = HashSet::new();
    let mut video: Vec<PresentedFormat> = formats
        .iter()
        .filter(|f| f.has_video() && !f.is_audio_only())
        .map(PresentedFormat::from_raw)
        .filter(|p| seen.insert((p.resolution.clone(), p.ext.clone())))
        .collect();

    video.sort_by_key(|p| Reverse(resolution_rank(&p.resolution)));
    video.truncate(MAX_VIDEO_FORMATS);

    let mut presented = Vec::with_capacity(video.len() + 1);
    presented.push(PresentedFormat::mp3());
    presented.extend(video);
    presented
}

/// Leading decimal number of a resolution label, 0 when there is none.
pub fn resolution_rank(resolution: &str) -> u64 {
    let digits: String = resolution
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
