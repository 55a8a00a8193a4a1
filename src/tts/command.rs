use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::interface::{SpeechSettings, SpeechSynthesizer};

/// Runs a local TTS program (espeak-ng by default) with the text on stdin.
///
/// Arguments are templates: `{rate}`, `{volume}`, `{voice}` and `{output}`
/// are substituted per call. If no argument mentions `{output}`, the
/// program's stdout is taken as the audio.
#[derive(Debug, Clone)]
pub struct CommandSpeechSynthesizer {
    program: String,
    args: Vec<String>,
    /// Appended only when a voice is configured
    voice_args: Vec<String>,
    timeout: Duration,
}

impl CommandSpeechSynthesizer {
    /// Create a synthesizer for `program`.
    ///
    /// # Arguments
    /// * `program` - Executable name or path
    /// * `args` - Argument templates passed on every call
    /// * `voice_args` - Argument templates appended when a voice is set, e.g. `["-v", "{voice}"]`
    /// * `timeout` - Upper bound for feeding the text and waiting for the program
    pub fn new(program: String, args: Vec<String>, voice_args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program,
            args,
            voice_args,
            timeout,
        }
    }

    fn writes_to_stdout(&self) -> bool {
        !self.args.iter().any(|arg| arg.contains("{output}"))
    }

    fn render_args(&self, settings: &SpeechSettings, output: &Path) -> Vec<String> {
        let rate = settings.rate.to_string();
        let volume = settings.amplitude().to_string();
        let voice = settings.voice.as_deref().unwrap_or_default();
        let output = output.to_string_lossy();

        let voice_args = settings.voice.as_ref().map(|_| self.voice_args.iter()).into_iter().flatten();
        self.args
            .iter()
            .chain(voice_args)
            .map(|arg| {
                arg.replace("{rate}", &rate)
                    .replace("{volume}", &volume)
                    .replace("{voice}", voice)
                    .replace("{output}", &output)
            })
            .collect()
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSpeechSynthesizer {
    async fn synthesize(&self, text: &str, settings: &SpeechSettings, output: &Path) -> Result<()> {
        let args = self.render_args(settings, output);
        debug!("Running {} {:?}", self.program, args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| anyhow::anyhow!("failed to start {}: {}", self.program, e))?;

        // Feed stdin while collecting output so neither pipe can stall the other
        let stdin = child.stdin.take();
        let feed = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(text.as_bytes()).await,
                None => Ok(()),
            }
        };
        let (fed, result) = tokio::time::timeout(self.timeout, async {
            tokio::join!(feed, child.wait_with_output())
        })
        .await
        .map_err(|_| anyhow::anyhow!("{} timed out after {:?}", self.program, self.timeout))?;
        let result = result?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            warn!(
                "TTS command failed; program={} code={:?} stderr={}",
                self.program,
                result.status.code(),
                stderr
            );
            anyhow::bail!("{} exited with {:?}: {}", self.program, result.status.code(), stderr);
        }
        fed.map_err(|e| anyhow::anyhow!("failed to write text to {}: {}", self.program, e))?;

        if self.writes_to_stdout() {
            if result.stdout.is_empty() {
                anyhow::bail!("{} produced no audio", self.program);
            }
            tokio::fs::write(output, &result.stdout).await?;
        }
        Ok(())
    }
}
