use thiserror::Error;

/// Failure kinds of a translate-and-speak request
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Invalid language selected.")]
    InvalidLanguage { name: String },
    #[error("Translation error: {0}")]
    Translation(#[source] anyhow::Error),
    #[error("Speech synthesis error: {0}")]
    Synthesis(#[source] anyhow::Error),
    #[error("Speech synthesis error: could not allocate audio file: {0}")]
    Audio(#[source] anyhow::Error),
}

impl TranslateError {
    pub fn kind(&self) -> &'static str {
        match self {
            TranslateError::InvalidLanguage { .. } => "invalid_language",
            TranslateError::Translation(_) => "translation",
            TranslateError::Synthesis(_) => "synthesis",
            TranslateError::Audio(_) => "audio",
        }
    }
}
