//! Async Rust wrapper for the yt-dlp CLI.
//!
//! Covers the two things an HTTP front-end needs from yt-dlp: a metadata
//! lookup and a download whose bytes are streamed from the child's stdout.
//!
//! # Example
//!
//! ```no_run
//! use tokio_stream::StreamExt;
//! use yt_dlp::{DownloadOptions, YtDlp};
//!
//! #[tokio::main]
//! async fn main() -> yt_dlp::Result<()> {
//!     let client = YtDlp::new().user_agent("Mozilla/5.0").no_check_certificates(true);
//!
//!     let info = client.get_video_info("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!     println!("Title: {}", info.title);
//!
//!     let options = DownloadOptions::new().format("bestvideo+bestaudio/best");
//!     let mut stream = client.stream("https://www.youtube.com/watch?v=dQw4w9WgXcQ", &options)?;
//!     while let Some(chunk) = stream.next().await {
//!         println!("{} bytes", chunk?.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod command;
pub mod error;
pub mod types;

pub use client::{MediaStream, YtDlp};
pub use error::{Error, Result};
pub use types::{DownloadOptions, Format, Thumbnail, VideoInfo};
