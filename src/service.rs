use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::audio::{AudioHandle, AudioStore};
use crate::error::TranslateError;
use crate::language::LanguageTable;
use crate::translate::{TranslateRequest, Translator};
use crate::tts::{SpeechSettings, SpeechSynthesizer};

/// One form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source_language: String,
    #[serde(default)]
    pub target_language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub audio: AudioHandle,
}

/// What the page shows: either the translation and its clip, or a message
/// and no clip.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationOutcome {
    pub display_text: String,
    pub audio: Option<AudioHandle>,
    pub error: Option<&'static str>,
}

impl From<Result<TranslationResult, TranslateError>> for TranslationOutcome {
    fn from(result: Result<TranslationResult, TranslateError>) -> Self {
        match result {
            Ok(result) => Self {
                display_text: result.translated_text,
                audio: Some(result.audio),
                error: None,
            },
            Err(e) => Self {
                display_text: e.to_string(),
                audio: None,
                error: Some(e.kind()),
            },
        }
    }
}

/// Resolves language names, translates, then speaks the translation.
pub struct TranslationService {
    languages: Arc<LanguageTable>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    speech: SpeechSettings,
    audio: AudioStore,
}

impl TranslationService {
    pub fn new(
        languages: Arc<LanguageTable>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        speech: SpeechSettings,
        audio: AudioStore,
    ) -> Self {
        Self {
            languages,
            translator,
            synthesizer,
            speech,
            audio,
        }
    }

    pub fn languages(&self) -> &LanguageTable {
        &self.languages
    }

    pub fn audio(&self) -> &AudioStore {
        &self.audio
    }

    /// Never fails: every error becomes the display text with no audio.
    pub async fn handle(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> TranslationOutcome {
        let result = self.translate_and_speak(text, source_language, target_language).await;
        match &result {
            Err(TranslateError::InvalidLanguage { name }) => {
                warn!("Rejected unknown language {:?} ({} -> {})", name, source_language, target_language);
            }
            Err(e) => warn!("Request {} -> {} failed: {:#}", source_language, target_language, e),
            Ok(_) => {}
        }
        result.into()
    }

    pub async fn translate_and_speak(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslationResult, TranslateError> {
        let source_lang = self.resolve(source_language)?;
        let target_lang = self.resolve(target_language)?;

        let response = self
            .translator
            .translate(TranslateRequest {
                text: text.to_string(),
                source_lang,
                target_lang,
            })
            .await
            .map_err(TranslateError::Translation)?;
        let translated_text = response.translated_text;
        debug!("Translated {} chars into {} chars", text.chars().count(), translated_text.chars().count());

        let audio = self.speak(&translated_text).await?;
        info!(
            "Translated {} -> {}, audio clip {}",
            source_language, target_language, audio.id
        );

        Ok(TranslationResult {
            translated_text,
            audio,
        })
    }

    fn resolve(&self, name: &str) -> Result<String, TranslateError> {
        self.languages
            .code(name)
            .map(str::to_string)
            .ok_or_else(|| TranslateError::InvalidLanguage {
                name: name.to_string(),
            })
    }

    async fn speak(&self, text: &str) -> Result<AudioHandle, TranslateError> {
        let pending = self.audio.allocate().map_err(TranslateError::Audio)?;
        // On failure `pending` is dropped here and its file deleted
        self.synthesizer
            .synthesize(text, &self.speech, pending.path())
            .await
            .map_err(TranslateError::Synthesis)?;
        Ok(self.audio.commit(pending))
    }
}
