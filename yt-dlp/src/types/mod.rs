mod options;
mod video_info;

pub use options::DownloadOptions;
pub use video_info::{Format, Thumbnail, VideoInfo};
