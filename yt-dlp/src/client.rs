use std::collections::VecDeque;
use std::path::PathBuf;
use std::pin::Pin;

use bytes::Bytes;
use futures_core::Stream;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio_stream::StreamExt;
use tokio_util::io::ReaderStream;

use crate::command::CommandBuilder;
use crate::error::{Error, Result};
use crate::types::{DownloadOptions, VideoInfo};

/// Bytes produced by a running yt-dlp process.
///
/// The stream owns the child process. Dropping it before the end kills the
/// child; reaching the end reaps it and yields `Error::CommandFailed` as the
/// last item if yt-dlp exited unsuccessfully.
pub type MediaStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    user_agent: Option<String>,
    no_check_certificates: bool,
    extra_args: Vec<String>
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlp {
    pub fn new() -> Self {
        Self::with_binary("yt-dlp")
    }

    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: path.into(),
            user_agent: None,
            no_check_certificates: false,
            extra_args: Vec::new()
        }
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    #[must_use]
    pub fn no_check_certificates(mut self, skip: bool) -> Self {
        self.no_check_certificates = skip;
        self
    }

    pub fn set_extra_args(&mut self, args: Vec<String>) {
        self.extra_args = args;
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    pub async fn check_binary(&self) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(Error::BinaryNotExecutable(self.binary.clone()))
        }
    }

    pub async fn get_video_info(&self, url: &str) -> Result<VideoInfo> {
        validate_url(url)?;

        let builder = self
            .command()
            .single_json_output()
            .skip_download()
            .no_warnings()
            .no_playlist()
            .url(url);

        tracing::debug!(
            binary = %self.binary.display(),
            args = ?builder.get_args(),
            "fetching video info"
        );

        let output = builder.build_captured().output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(Error::CommandFailed {
                code: output.status.code().unwrap_or(-1),
                stderr
            });
        }

        let info: VideoInfo = serde_json::from_slice(&output.stdout)?;
        Ok(info)
    }

    /// Spawns yt-dlp writing the selected media to stdout and returns its bytes
    /// as they are produced.
    ///
    /// Spawn failures are returned directly; failures of the running process
    /// surface through the stream.
    pub fn stream(&self, url: &str, options: &DownloadOptions) -> Result<MediaStream> {
        validate_url(url)?;

        let builder = self
            .command()
            .no_progress()
            .no_playlist()
            .with_options(options)
            .stdout_output()
            .url(url);

        tracing::debug!(
            binary = %self.binary.display(),
            args = ?builder.get_args(),
            "spawning yt-dlp"
        );

        let mut child = builder.build_piped().spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::ExecutionFailed(std::io::Error::other("stdout not captured")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::ExecutionFailed(std::io::Error::other("stderr not captured")))?;

        let stderr_task = tokio::spawn(collect_stderr(stderr));

        Ok(Box::pin(async_stream::try_stream! {
            let mut reader = ReaderStream::new(stdout);

            while let Some(chunk) = reader.next().await {
                yield chunk?;
            }

            let status = child.wait().await?;
            let stderr = stderr_task.await.unwrap_or_default();

            if !status.success() {
                Err::<(), Error>(Error::CommandFailed {
                    code: status.code().unwrap_or(-1),
                    stderr
                })?;
            }
        }))
    }

    fn command(&self) -> CommandBuilder {
        let mut builder = CommandBuilder::new(&self.binary)
            .user_agent_opt(self.user_agent.as_ref());

        if self.no_check_certificates {
            builder = builder.no_check_certificates();
        }

        builder.args(self.extra_args.iter().map(String::as_str))
    }
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::InvalidUrl(url.to_string()))
    }
}

/// Drains stderr, logging each line, and keeps the last few lines for the error report.
async fn collect_stderr(stderr: impl AsyncRead + Unpin) -> String {
    let mut reader = BufReader::new(stderr).lines();
    let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);

    while let Ok(Some(line)) = reader.next_line().await {
        log_stderr_line(&line);
        if tail.len() == STDERR_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line);
    }

    Vec::from(tail).join("\n")
}

fn log_stderr_line(line: &str) {
    let line = line.trim();

    if let Some(message) = line.strip_prefix("ERROR:") {
        tracing::warn!(message = %message.trim(), "yt-dlp error");
    } else if let Some(message) = line.strip_prefix("WARNING:") {
        tracing::warn!(message = %message.trim(), "yt-dlp warning");
    } else {
        tracing::trace!(line = %line, "yt-dlp stderr");
    }
}
