use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use super::client::HttpSpeechSynthesizer;
use super::command::CommandSpeechSynthesizer;
use super::interface::{SpeechSettings, SpeechSynthesizer};
use crate::config::TtsConfig;

/// Factory for creating TTS engines/clients
pub struct SpeechSynthesizerFactory;

impl SpeechSynthesizerFactory {
    /// Create a speech synthesizer based on configuration
    ///
    /// # Arguments
    /// * `config` - TTS section of the service configuration
    ///
    /// # Returns
    /// Shared SpeechSynthesizer implementation for the configured engine
    pub fn create(config: &TtsConfig) -> Result<Arc<dyn SpeechSynthesizer>> {
        info!("Initializing TTS engine: {}", config.engine);
        let timeout = Duration::from_secs(config.timeout_secs);

        match config.engine.as_str() {
            "command" => {
                if config.program.is_empty() {
                    anyhow::bail!("tts.program must be set for the command engine");
                }
                Ok(Arc::new(CommandSpeechSynthesizer::new(
                    config.program.clone(),
                    config.args.clone(),
                    config.voice_args.clone(),
                    timeout,
                )))
            }
            "http" => {
                let base_url = if config.base_url.is_empty() {
                    std::env::var("TTS_SERVICE_URL")
                        .unwrap_or_else(|_| "http://localhost:5002".to_string())
                } else {
                    config.base_url.clone()
                };
                info!("TTS service at {}", base_url);
                Ok(Arc::new(HttpSpeechSynthesizer::new(base_url, timeout)?))
            }
            other => Err(anyhow::anyhow!("Unsupported TTS engine: {}", other)),
        }
    }

    /// Per-call voice parameters (rate, volume, voice) from configuration
    pub fn settings(config: &TtsConfig) -> SpeechSettings {
        SpeechSettings {
            rate: config.rate,
            volume: config.volume,
            voice: config.voice.clone(),
        }
    }
}
