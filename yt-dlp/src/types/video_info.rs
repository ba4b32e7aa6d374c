use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub duration_string: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub formats: Vec<Format>,
    #[serde(default)]
    pub is_live: Option<bool>
}

impl VideoInfo {
    pub fn best_thumbnail(&self) -> Option<&str> {
        if let Some(ref url) = self.thumbnail {
            return Some(url);
        }
        self.thumbnails
            .iter()
            .max_by_key(|t| t.width.unwrap_or(0))
            .map(|t| t.url.as_str())
    }

    /// Uploader name, falling back to the channel name some extractors use instead.
    pub fn uploader_name(&self) -> Option<&str> {
        self.uploader.as_deref().or(self.channel.as_deref())
    }

    pub fn find_format(&self, format_id: &str) -> Option<&Format> {
        self.formats.iter().find(|f| f.format_id == format_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Format {
    pub format_id: String,
    #[serde(default)]
    pub format_note: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub tbr: Option<f64>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub protocol: Option<String>
}

impl Format {
    pub fn has_video(&self) -> bool {
        self.vcodec.as_ref().is_some_and(|v| v != "none")
    }

    pub fn is_audio_only(&self) -> bool {
        self.resolution.as_deref() == Some("audio only")
    }

    pub fn display_size(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{w}x{h}")),
            _ => self.resolution.clone()
        }
    }

    pub fn estimated_size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_single_json() {
        let json = r#"{
            "id": "abc",
            "title": "Some video",
            "uploader": "someone",
            "duration_string": "3:32",
            "thumbnail": "https://i.example.com/abc.jpg",
            "formats": [
                {"format_id": "140", "ext": "m4a", "resolution": "audio only", "vcodec": "none", "acodec": "mp4a.40.2", "filesize": 3400000},
                {"format_id": "137", "ext": "mp4", "resolution": "1920x1080", "height": 1080, "vcodec": "avc1", "acodec": "none", "filesize_approx": 52000000}
            ],
            "unknown_field": [1, 2, 3]
        }"#;
        let info: VideoInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.title, "Some video");
        assert_eq!(info.duration_string.as_deref(), Some("3:32"));
        assert_eq!(info.formats.len(), 2);
        assert!(info.formats[0].is_audio_only());
        assert!(!info.formats[0].has_video());
        assert!(info.formats[1].has_video());
        assert_eq!(info.find_format("137").and_then(Format::estimated_size), Some(52_000_000));
        assert!(info.find_format("999").is_none());
    }

    #[test]
    fn test_estimated_size_prefers_exact() {
        let format = Format {
            format_id: "22".to_string(),
            filesize: Some(100),
            filesize_approx: Some(120),
            ..Format::default()
        };
        assert_eq!(format.estimated_size(), Some(100));
    }

    #[test]
    fn test_uploader_falls_back_to_channel() {
        let info: VideoInfo =
            serde_json::from_str(r#"{"id": "x", "title": "t", "channel": "chan"}"#).unwrap();
        assert_eq!(info.uploader_name(), Some("chan"));
        assert!(info.best_thumbnail().is_none());
    }

    #[test]
    fn test_best_thumbnail_picks_widest() {
        let info: VideoInfo = serde_json::from_str(
            r#"{"id": "x", "title": "t", "thumbnails": [
                {"url": "small", "width": 120},
                {"url": "large", "width": 1280},
                {"url": "unsized"}
            ]}"#
        )
        .unwrap();
        assert_eq!(info.best_thumbnail(), Some("large"));
    }
}
