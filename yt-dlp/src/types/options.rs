/// Options for a streamed download.
///
/// Only the knobs that influence what ends up on stdout are modelled here.
/// Client-wide arguments belong on [`crate::YtDlp::set_extra_args`].
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub format: Option<String>,
    pub extract_audio: bool,
    pub audio_format: Option<String>,
    pub audio_quality: Option<String>,
    pub concurrent_fragments: Option<u32>,
    pub buffer_size: Option<String>
}

impl DownloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn extract_audio(mut self, extract: bool) -> Self {
        self.extract_audio = extract;
        self
    }

    pub fn audio_format(mut self, format: impl Into<String>) -> Self {
        self.audio_format = Some(format.into());
        self
    }

    pub fn audio_quality(mut self, quality: impl Into<String>) -> Self {
        self.audio_quality = Some(quality.into());
        self
    }

    pub fn concurrent_fragments(mut self, count: u32) -> Self {
        self.concurrent_fragments = Some(count);
        self
    }

    pub fn buffer_size(mut self, size: impl Into<String>) -> Self {
        self.buffer_size = Some(size.into());
        self
    }
}
