//! Provider configuration from TOML (`[provider]` section)

use genflow_domain::ModelId;
use serde::{Deserialize, Serialize};

/// Fallback variable consulted when `api_key_env` is unset
pub const FALLBACK_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Raw provider configuration from TOML
///
/// ```toml
/// [provider]
/// api_key_env = "GEMINI_API_KEY"
/// text_model = "googleai/gemini-2.0-flash"
/// voice = "Algenib"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// API root; the version segment is appended by the client
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub tts_model: String,
    /// Prebuilt voice for speech synthesis
    pub voice: String,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            text_model: ModelId::default_text().to_string(),
            image_model: ModelId::default_image().to_string(),
            tts_model: ModelId::default_tts().to_string(),
            voice: "Algenib".to_string(),
        }
    }
}

impl FileProviderConfig {
    pub fn text_model(&self) -> ModelId {
        ModelId::from(self.text_model.as_str())
    }

    pub fn image_model(&self) -> ModelId {
        ModelId::from(self.image_model.as_str())
    }

    pub fn tts_model(&self) -> ModelId {
        ModelId::from(self.tts_model.as_str())
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .into_iter()
            .filter(|name| !name.is_empty())
            .find_map(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty())
    }
}
