use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use crate::types::DownloadOptions;

pub struct CommandBuilder {
    binary: PathBuf,
    args: Vec<String>
}

impl CommandBuilder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn url(self, url: impl Into<String>) -> Self {
        self.arg(url)
    }

    pub fn single_json_output(self) -> Self {
        self.arg("--dump-single-json")
    }

    pub fn skip_download(self) -> Self {
        self.arg("--skip-download")
    }

    pub fn stdout_output(self) -> Self {
        self.arg("-o").arg("-")
    }

    pub fn format(self, format: impl Into<String>) -> Self {
        self.arg("-f").arg(format)
    }

    pub fn extract_audio(self) -> Self {
        self.arg("-x")
    }

    pub fn audio_format(self, format: impl Into<String>) -> Self {
        self.arg("--audio-format").arg(format)
    }

    pub fn audio_quality(self, quality: impl Into<String>) -> Self {
        self.arg("--audio-quality").arg(quality)
    }

    pub fn user_agent(self, agent: impl Into<String>) -> Self {
        self.arg("--user-agent").arg(agent)
    }

    pub fn user_agent_opt(self, agent: Option<&String>) -> Self {
        match agent {
            Some(a) => self.user_agent(a.clone()),
            None => self
        }
    }

    pub fn no_check_certificates(self) -> Self {
        self.arg("--no-check-certificates")
    }

    pub fn concurrent_fragments(self, count: u32) -> Self {
        self.arg("--concurrent-fragments").arg(count.to_string())
    }

    pub fn buffer_size(self, size: impl Into<String>) -> Self {
        self.arg("--buffer-size").arg(size)
    }

    pub fn no_warnings(self) -> Self {
        self.arg("--no-warnings")
    }

    pub fn no_playlist(self) -> Self {
        self.arg("--no-playlist")
    }

    pub fn no_progress(self) -> Self {
        self.arg("--no-progress")
    }

    pub fn with_options(mut self, options: &DownloadOptions) -> Self {
        if let Some(count) = options.concurrent_fragments {
            self = self.concurrent_fragments(count);
        }

        if let Some(ref size) = options.buffer_size {
            self = self.buffer_size(size.clone());
        }

        if options.extract_audio {
            self = self.extract_audio();
        }

        if let Some(ref format) = options.audio_format {
            self = self.audio_format(format.clone());
        }

        if let Some(ref quality) = options.audio_quality {
            self = self.audio_quality(quality.clone());
        }

        if let Some(ref format) = options.format {
            self = self.format(format.clone());
        }

        self
    }

    pub fn build(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args);
        cmd
    }

    /// Builds a command for `output()` that is killed if the future awaiting
    /// it is dropped.
    pub fn build_captured(&self) -> Command {
        let mut cmd = self.build();
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    /// Builds a command whose stdout and stderr are both piped and which is
    /// killed when the returned `Child` is dropped.
    pub fn build_piped(&self) -> Command {
        let mut cmd = self.build_captured();
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}
