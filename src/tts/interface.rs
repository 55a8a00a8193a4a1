use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Voice parameters applied to every synthesis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Words per minute
    pub rate: u32,
    /// 0.0 (silent) to 1.0 (full)
    pub volume: f32,
    pub voice: Option<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            rate: 160,
            volume: 1.0,
            voice: None,
        }
    }
}

impl SpeechSettings {
    /// Volume as an espeak amplitude: 1.0 maps to 100, espeak's normal level.
    /// espeak accepts up to 200, but volume is clamped at 1.0 so 100 is the max.
    pub fn amplitude(&self) -> u32 {
        (self.volume.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// Speech synthesis capability - the engine itself runs outside this process
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech and write it to a file
    ///
    /// # Arguments
    /// * `text` - The text to synthesize, possibly empty
    /// * `settings` - Rate, volume and voice to apply
    /// * `output` - Path of an existing file owned by the caller; overwritten with the audio
    ///
    /// # Returns
    /// `Ok(())` once a complete audio file is at `output`
    async fn synthesize(
        &self,
        text: &str,
        settings: &SpeechSettings,
        output: &Path,
    ) -> Result<(), anyhow::Error>;
}
