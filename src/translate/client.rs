use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::interface::{TranslateRequest, TranslateResponse, Translator};

/// Talks to a model server exposing `POST /translate`
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: Client,
    base_url: String,
    model: Option<String>,
}

#[derive(Debug, Serialize)]
struct ServiceRequest<'a> {
    text: &'a str,
    src_lang: &'a str,
    tgt_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslationOutput {
    translation_text: String,
}

/// Pipelines answer with a list; single-result servers with an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServiceResponse {
    Batch(Vec<TranslationOutput>),
    Single(TranslationOutput),
}

impl ServiceResponse {
    fn into_text(self) -> Result<String> {
        match self {
            ServiceResponse::Single(output) => Ok(output.translation_text),
            ServiceResponse::Batch(outputs) => outputs
                .into_iter()
                .next()
                .map(|output| output.translation_text)
                .ok_or_else(|| anyhow::anyhow!("translation service returned no results")),
        }
    }
}

impl HttpTranslator {
    pub fn new(base_url: String, model: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse> {
        let url = format!("{}/translate", self.base_url);
        debug!(
            "Sending translation request: {} -> {}, {} chars",
            request.source_lang,
            request.target_lang,
            request.text.chars().count()
        );

        let body = ServiceRequest {
            text: &request.text,
            src_lang: &request.source_lang,
            tgt_lang: &request.target_lang,
            model: self.model.as_deref(),
        };
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("Translation service returned {}: {}", status, detail);
            anyhow::bail!("translation service returned {}: {}", status, detail);
        }

        let translated_text = response.json::<ServiceResponse>().await?.into_text()?;
        Ok(TranslateResponse { translated_text })
    }
}
