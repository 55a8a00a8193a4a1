use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::utils::{load_text_file_with_guess_encoding, substitute_env_vars};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub languages: LanguagesConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub tts: TtsConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7860
}

fn default_title() -> String {
    "MultiLanguage Translator".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            title: default_title(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagesConfig {
    #[serde(default = "default_language_path")]
    pub path: String,
    #[serde(default = "default_source_language")]
    pub default_source: String,
    #[serde(default = "default_target_language")]
    pub default_target: String,
}

fn default_language_path() -> String {
    "lang_code.json".to_string()
}

fn default_source_language() -> String {
    "English".to_string()
}

fn default_target_language() -> String {
    "French".to_string()
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            path: default_language_path(),
            default_source: default_source_language(),
            default_target: default_target_language(),
        }
    }
}

/// Translation backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_translation_provider")]
    pub provider: String,
    /// Empty means `TRANSLATION_SERVICE_URL`, then localhost
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_translation_model")]
    pub model: Option<String>,
    #[serde(default = "default_translation_timeout")]
    pub timeout_secs: u64,
}

fn default_translation_provider() -> String {
    "http".to_string()
}

fn default_translation_model() -> Option<String> {
    Some("facebook/nllb-200-distilled-600M".to_string())
}

fn default_translation_timeout() -> u64 {
    120
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: default_translation_provider(),
            base_url: String::new(),
            model: default_translation_model(),
            timeout_secs: default_translation_timeout(),
        }
    }
}

/// Speech synthesis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_engine")]
    pub engine: String,
    /// Words per minute
    #[serde(default = "default_rate")]
    pub rate: u32,
    /// 0.0 (silent) to 1.0 (full)
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_tts_program")]
    pub program: String,
    #[serde(default = "default_tts_args")]
    pub args: Vec<String>,
    /// Appended to `args` only when `voice` is set
    #[serde(default = "default_tts_voice_args")]
    pub voice_args: Vec<String>,
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_engine() -> String {
    "command".to_string()
}

fn default_rate() -> u32 {
    160
}

fn default_volume() -> f32 {
    1.0
}

fn default_tts_program() -> String {
    "espeak-ng".to_string()
}

fn default_tts_args() -> Vec<String> {
    ["--stdin", "-s", "{rate}", "-a", "{volume}", "-w", "{output}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_tts_voice_args() -> Vec<String> {
    vec!["-v".to_string(), "{voice}".to_string()]
}

fn default_tts_timeout() -> u64 {
    60
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            engine: default_tts_engine(),
            rate: default_rate(),
            volume: default_volume(),
            voice: None,
            base_url: String::new(),
            program: default_tts_program(),
            args: default_tts_args(),
            voice_args: default_tts_voice_args(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_audio_dir")]
    pub dir: PathBuf,
    /// Clips not released by the page are deleted after this long
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_audio_dir() -> PathBuf {
    std::env::temp_dir().join("text-translator")
}

fn default_ttl_secs() -> u64 {
    600
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            dir: default_audio_dir(),
            ttl_secs: default_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }

        let content = substitute_env_vars(&load_text_file_with_guess_encoding(path)?);

        // Determine file type by extension
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let config = match extension.as_str() {
            "json" | "jsonld" => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Paths tried in order when no explicit config is given
    pub fn candidate_paths() -> Vec<PathBuf> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        [
            std::env::var("CONFIG_PATH").ok().map(PathBuf::from),
            Some(PathBuf::from("conf.yaml")),
            Some(PathBuf::from("conf.json")),
            exe_dir.map(|dir| dir.join("conf.yaml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load the first candidate that parses, or fall back to defaults
    pub fn discover(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            match Self::load(path) {
                Ok(config) => {
                    info!("Loaded configuration from: {}", path.display());
                    return config;
                }
                Err(e) => {
                    debug!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        warn!("No configuration file found (tried {:?}), using defaults", candidates);
        Self::default()
    }
}
