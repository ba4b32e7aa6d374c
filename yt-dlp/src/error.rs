use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("yt-dlp binary not executable: {0}")]
    BinaryNotExecutable(PathBuf),

    #[error("failed to execute yt-dlp: {0}")]
    ExecutionFailed(#[from] std::io::Error),

    #[error("yt-dlp command failed with exit code {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    #[error("failed to parse JSON output: {0}")]
    JsonParseFailed(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String)
}

pub type Result<T> = std::result::Result<T, Error>;
