use futures::future::BoxFuture;
use yt_dlp::{DownloadOptions, MediaStream, VideoInfo, YtDlp};

use crate::config::Config;

/// Browser user agent sent with every yt-dlp request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// The operations handlers need from the downloader tool.
pub trait MediaTool: Send + Sync {
    fn video_info<'a>(&'a self, url: &'a str) -> BoxFuture<'a, yt_dlp::Result<VideoInfo>>;

    fn stream(&self, url: &str, options: &DownloadOptions) -> yt_dlp::Result<MediaStream>;
}

impl MediaTool for YtDlp {
    fn video_info<'a>(&'a self, url: &'a str) -> BoxFuture<'a, yt_dlp::Result<VideoInfo>> {
        Box::pin(self.get_video_info(url))
    }

    fn stream(&self, url: &str, options: &DownloadOptions) -> yt_dlp::Result<MediaStream> {
        YtDlp::stream(self, url, options)
    }
}

pub fn build_client(config: &Config) -> YtDlp {
    let mut client = YtDlp::with_binary(&config.ytdlp_path)
        .user_agent(USER_AGENT)
        .no_check_certificates(true);

    if !config.ytdlp_extra_args.is_empty() {
        client.set_extra_args(config.ytdlp_extra_args.clone());
    }

    client
}
