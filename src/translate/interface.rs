use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Text plus resolved FLORES-200 codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

/// Translation capability - the model itself runs behind this trait
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate text between two FLORES-200 languages
    ///
    /// # Arguments
    /// * `request` - Text plus resolved source and target codes
    ///
    /// # Returns
    /// The model's translation; an empty input may yield an empty string
    async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse, anyhow::Error>;
}
