use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

use super::interface::{SpeechSettings, SpeechSynthesizer};

/// TTS client for a service exposing `POST /tts/synthesize` that answers
/// with the audio bytes
#[derive(Debug, Clone)]
pub struct HttpSpeechSynthesizer {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SynthesizeBody<'a> {
    text: &'a str,
    rate: u32,
    volume: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<&'a str>,
}

impl HttpSpeechSynthesizer {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    async fn synthesize(&self, text: &str, settings: &SpeechSettings, output: &Path) -> Result<()> {
        let url = format!("{}/tts/synthesize", self.base_url);
        let body = SynthesizeBody {
            text,
            rate: settings.rate,
            volume: settings.volume,
            voice: settings.voice.as_deref(),
        };

        debug!("Sending TTS request: {} chars", text.chars().count());
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("TTS synthesis failed with {}: {}", status, detail);
            anyhow::bail!("TTS service returned {}: {}", status, detail);
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            anyhow::bail!("TTS service returned no audio");
        }
        tokio::fs::write(output, &audio).await?;
        debug!("TTS synthesis successful: {} ({} bytes)", output.display(), audio.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn synthesizer(base_url: String) -> HttpSpeechSynthesizer {
        HttpSpeechSynthesizer::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn audio_bytes_are_written_to_output() {
        let router = Router::new().route(
            "/tts/synthesize",
            post(|Json(body): Json<Value>| async move {
                format!(
                    "RIFF:{}@{}:{}",
                    body["text"].as_str().unwrap_or_default(),
                    body["rate"],
                    body["voice"].as_str().unwrap_or("none"),
                )
            }),
        );
        let base_url = spawn_server(router).await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.wav");
        let settings = SpeechSettings {
            voice: Some("fr".to_string()),
            ..SpeechSettings::default()
        };

        synthesizer(base_url)
            .synthesize("Bonjour", &settings, &output)
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "RIFF:Bonjour@160:fr");
    }

    #[tokio::test]
    async fn error_status_is_an_error() {
        let router = Router::new().route(
            "/tts/synthesize",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model loading") }),
        );
        let base_url = spawn_server(router).await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.wav");

        let err = synthesizer(base_url)
            .synthesize("Bonjour", &SpeechSettings::default(), &output)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"), "{}", err);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn empty_body_is_an_error() {
        let router = Router::new().route("/tts/synthesize", post(|| async { StatusCode::OK }));
        let base_url = spawn_server(router).await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.wav");

        let err = synthesizer(base_url)
            .synthesize("Bonjour", &SpeechSettings::default(), &output)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no audio"), "{}", err);
        assert!(!output.exists());
    }
}
