use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::audio::AudioStore;
use crate::config::Config;
use crate::language::LanguageTable;
use crate::service::TranslationService;
use crate::translate::{Translator, TranslatorFactory};
use crate::tts::{SpeechSynthesizer, SpeechSynthesizerFactory};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<TranslationService>,
}

impl AppState {
    /// Build every collaborator from config
    pub fn new(config: Config) -> Result<Self> {
        let languages = LanguageTable::load(Path::new(&config.languages.path));
        let translator = TranslatorFactory::create(&config.translation)?;
        let synthesizer = SpeechSynthesizerFactory::create(&config.tts)?;
        Self::with_parts(config, languages, translator, synthesizer)
    }

    pub fn with_parts(
        config: Config,
        languages: LanguageTable,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Result<Self> {
        let audio = AudioStore::new(
            config.audio.dir.clone(),
            Duration::from_secs(config.audio.ttl_secs),
        )?;
        let service = TranslationService::new(
            Arc::new(languages),
            translator,
            synthesizer,
            SpeechSynthesizerFactory::settings(&config.tts),
            audio,
        );

        Ok(Self {
            config: Arc::new(config),
            service: Arc::new(service),
        })
    }

    pub fn audio(&self) -> &AudioStore {
        self.service.audio()
    }

    pub fn languages(&self) -> &LanguageTable {
        self.service.languages()
    }
}
