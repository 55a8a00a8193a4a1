use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use super::client::HttpTranslator;
use super::interface::Translator;
use crate::config::TranslationConfig;

/// Factory for creating translation backends
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create a translator based on configuration
    ///
    /// # Arguments
    /// * `config` - Translation section of the service configuration
    ///
    /// # Returns
    /// Shared Translator implementation for the configured provider
    pub fn create(config: &TranslationConfig) -> Result<Arc<dyn Translator>> {
        info!("Initializing translator: {}", config.provider);

        match config.provider.as_str() {
            "http" => {
                let base_url = Self::resolve_base_url(&config.base_url);
                info!("Translation service at {}", base_url);
                Ok(Arc::new(HttpTranslator::new(
                    base_url,
                    config.model.clone(),
                    Duration::from_secs(config.timeout_secs),
                )?))
            }
            other => Err(anyhow::anyhow!("Unsupported translation provider: {}", other)),
        }
    }

    fn resolve_base_url(configured: &str) -> String {
        if !configured.is_empty() {
            return configured.to_string();
        }
        std::env::var("TRANSLATION_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string())
    }
}
