//! Configuration for the assistant
//!
//! Credentials and model locations come from the environment (a `.env` file
//! is honored). Missing credentials never stop startup: the affected intent
//! answers with a fixed notice instead.

use crate::clients::{
    ChatClient, GoogleSearchClient, OpenRouterClient, SearchClient, DEFAULT_CHAT_BASE_URL,
    DEFAULT_CHAT_MODEL, DEFAULT_SEARCH_BASE_URL,
};
use crate::speech::{CaptureConfig, RecognizerConfig, SpeechSettings, SynthesizerConfig};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const ENV_CHAT_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_SEARCH_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_SEARCH_ENGINE_ID: &str = "SEARCH_ENGINE_ID";
pub const ENV_CHAT_MODEL: &str = "EIRA_CHAT_MODEL";
pub const ENV_CHAT_BASE_URL: &str = "EIRA_CHAT_BASE_URL";
pub const ENV_SEARCH_BASE_URL: &str = "EIRA_SEARCH_BASE_URL";
pub const ENV_WHISPER_MODEL: &str = "EIRA_WHISPER_MODEL";
pub const ENV_TTS_MODEL: &str = "EIRA_TTS_MODEL";
pub const ENV_TTS_TOKENS: &str = "EIRA_TTS_TOKENS";
pub const ENV_TTS_DATA_DIR: &str = "EIRA_TTS_DATA_DIR";
pub const ENV_TTS_LEXICON: &str = "EIRA_TTS_LEXICON";
pub const ENV_ARTIFACT_DIR: &str = "EIRA_ARTIFACT_DIR";

const DEFAULT_TTS_MODEL: &str = "models/vits-piper-en_US-amy-low/en_US-amy-low.onnx";
const DEFAULT_TTS_TOKENS: &str = "models/vits-piper-en_US-amy-low/tokens.txt";
const DEFAULT_TTS_DATA_DIR: &str = "models/vits-piper-en_US-amy-low/espeak-ng-data";

/// Conversational model settings
#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_CHAT_MODEL.to_string(),
            base_url: DEFAULT_CHAT_BASE_URL.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Web search settings
#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub engine_id: Option<String>,
    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
        }
    }
}

impl SearchConfig {
    /// Both the key and the engine id are needed
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.api_key, &self.engine_id) {
            (Some(key), Some(cx)) => Some((key.as_str(), cx.as_str())),
            _ => None,
        }
    }
}

/// Non-fatal problems found while validating
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigWarning {
    ChatKeyMissing,
    SearchCredentialsMissing,
    RecognizerModelMissing(PathBuf),
    SynthesizerModelMissing(PathBuf),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::ChatKeyMissing => write!(
                f,
                "{} not set; conversation is disabled",
                ENV_CHAT_API_KEY
            ),
            ConfigWarning::SearchCredentialsMissing => write!(
                f,
                "{} or {} not set; Google search is disabled",
                ENV_SEARCH_API_KEY, ENV_SEARCH_ENGINE_ID
            ),
            ConfigWarning::RecognizerModelMissing(path) => {
                write!(f, "Whisper model not found at {}", path.display())
            }
            ConfigWarning::SynthesizerModelMissing(path) => {
                write!(f, "TTS model not found at {}", path.display())
            }
        }
    }
}

/// Configuration for the whole assistant
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    pub chat: ChatConfig,
    pub search: SearchConfig,
    pub speech: SpeechSettings,
    pub capture: CaptureConfig,
    pub recognizer: RecognizerConfig,
    pub synthesizer: SynthesizerConfig,
    /// How long to wait for speech onset after listening starts
    pub listen_timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        let mut synthesizer = SynthesizerConfig::new(DEFAULT_TTS_MODEL, DEFAULT_TTS_TOKENS);
        synthesizer.data_dir = Some(PathBuf::from(DEFAULT_TTS_DATA_DIR));

        Self {
            chat: ChatConfig::default(),
            search: SearchConfig::default(),
            speech: SpeechSettings::default(),
            capture: CaptureConfig::default(),
            recognizer: RecognizerConfig::default(),
            synthesizer,
            listen_timeout: Duration::from_secs(5),
        }
    }
}

impl AssistantConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env file loaded: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        config.chat.api_key = get(ENV_CHAT_API_KEY);
        if let Some(model) = get(ENV_CHAT_MODEL) {
            config.chat.model = model;
        }
        if let Some(url) = get(ENV_CHAT_BASE_URL) {
            config.chat.base_url = url;
        }

        config.search.api_key = get(ENV_SEARCH_API_KEY);
        config.search.engine_id = get(ENV_SEARCH_ENGINE_ID);
        if let Some(url) = get(ENV_SEARCH_BASE_URL) {
            config.search.base_url = url;
        }

        if let Some(path) = get(ENV_WHISPER_MODEL) {
            config.recognizer.model_path = path.into();
        }
        if let Some(path) = get(ENV_TTS_MODEL) {
            config.synthesizer.model_path = path.into();
        }
        if let Some(path) = get(ENV_TTS_TOKENS) {
            config.synthesizer.tokens_path = path.into();
        }
        if let Some(path) = get(ENV_TTS_DATA_DIR) {
            config.synthesizer.data_dir = Some(path.into());
        }
        if let Some(path) = get(ENV_TTS_LEXICON) {
            config.synthesizer.lexicon_path = Some(path.into());
        }
        if let Some(dir) = get(ENV_ARTIFACT_DIR) {
            config.speech.artifact_dir = dir.into();
        }

        config
    }

    pub fn with_chat_key(mut self, key: impl Into<String>) -> Self {
        self.chat.api_key = Some(key.into());
        self
    }

    pub fn with_search_credentials(
        mut self,
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Self {
        self.search.api_key = Some(api_key.into());
        self.search.engine_id = Some(engine_id.into());
        self
    }

    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.speech.artifact_dir = dir.into();
        self
    }

    pub fn without_chat(mut self) -> Self {
        self.chat.api_key = None;
        self
    }

    pub fn without_search(mut self) -> Self {
        self.search.api_key = None;
        self.search.engine_id = None;
        self
    }

    /// Chat client for the configured key, if any and if it can be built
    pub fn chat_client(&self) -> Option<Arc<dyn ChatClient>> {
        let key = self.chat.api_key.as_ref()?;
        let client = OpenRouterClient::new(key.clone()).map(|client| {
            client
                .with_model(self.chat.model.clone())
                .with_base_url(self.chat.base_url.clone())
        });
        degrade("Conversation", client).map(|client| Arc::new(client) as Arc<dyn ChatClient>)
    }

    /// Search client for the configured credentials, if complete and buildable
    pub fn search_client(&self) -> Option<Arc<dyn SearchClient>> {
        let (key, cx) = self.search.credentials()?;
        let client = GoogleSearchClient::new(key, cx)
            .map(|client| client.with_base_url(self.search.base_url.clone()));
        degrade("Google search", client).map(|client| Arc::new(client) as Arc<dyn SearchClient>)
    }

    /// Report what will be degraded; never fails
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !self.chat.is_configured() {
            warnings.push(ConfigWarning::ChatKeyMissing);
        }
        if self.search.credentials().is_none() {
            warnings.push(ConfigWarning::SearchCredentialsMissing);
        }
        if !self.recognizer.model_path.exists() {
            warnings.push(ConfigWarning::RecognizerModelMissing(
                self.recognizer.model_path.clone(),
            ));
        }
        if !self.synthesizer.model_path.exists() {
            warnings.push(ConfigWarning::SynthesizerModelMissing(
                self.synthesizer.model_path.clone(),
            ));
        }

        warnings
    }
}

/// A client that cannot be built leaves its intent unconfigured
fn degrade<T>(feature: &str, built: crate::Result<T>) -> Option<T> {
    match built {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("{} is disabled: {}", feature, e);
            None
        }
    }
}
