//! Model identifier value object

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Provider model identifier (Value Object)
///
/// Well-known models get their own variant; anything else is carried
/// through verbatim as [`ModelId::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelId {
    Gemini20Flash,
    Gemini20FlashImage,
    Gemini25Flash,
    Gemini25FlashTts,
    Custom(String),
}

impl ModelId {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            ModelId::Gemini20Flash => "gemini-2.0-flash",
            ModelId::Gemini20FlashImage => "gemini-2.0-flash-preview-image-generation",
            ModelId::Gemini25Flash => "gemini-2.5-flash",
            ModelId::Gemini25FlashTts => "gemini-2.5-flash-preview-tts",
            ModelId::Custom(s) => s,
        }
    }

    /// Default model for text and structured generation
    pub fn default_text() -> Self {
        ModelId::Gemini20Flash
    }

    /// Default model for image synthesis
    pub fn default_image() -> Self {
        ModelId::Gemini20FlashImage
    }

    /// Default model for speech synthesis
    pub fn default_tts() -> Self {
        ModelId::Gemini25FlashTts
    }

    /// Whether this model produces images alongside text
    pub fn is_image_model(&self) -> bool {
        matches!(self, ModelId::Gemini20FlashImage) || self.as_str().contains("image")
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::default_text()
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept provider-prefixed names such as "googleai/gemini-2.0-flash"
        let s = s.strip_prefix("googleai/").unwrap_or(s);
        Ok(match s {
            "gemini-2.0-flash" => ModelId::Gemini20Flash,
            "gemini-2.0-flash-preview-image-generation" => ModelId::Gemini20FlashImage,
            "gemini-2.5-flash" => ModelId::Gemini25Flash,
            "gemini-2.5-flash-preview-tts" => ModelId::Gemini25FlashTts,
            other => ModelId::Custom(other.to_string()),
        })
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for ModelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ModelId::from(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in [
            ModelId::Gemini20Flash,
            ModelId::Gemini20FlashImage,
            ModelId::Gemini25Flash,
            ModelId::Gemini25FlashTts,
        ] {
            let parsed: ModelId = model.to_string().parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_custom_model() {
        let model: ModelId = "gemini-exp-1206".parse().unwrap();
        assert_eq!(model, ModelId::Custom("gemini-exp-1206".to_string()));
        assert_eq!(model.to_string(), "gemini-exp-1206");
    }

    #[test]
    fn test_provider_prefix_stripped() {
        assert_eq!(ModelId::from("googleai/gemini-2.0-flash"), ModelId::Gemini20Flash);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ModelId::default(), ModelId::Gemini20Flash);
        assert!(ModelId::default_image().is_image_model());
        assert!(!ModelId::default_tts().is_image_model());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ModelId::Gemini25Flash).unwrap();
        assert_eq!(json, "\"gemini-2.5-flash\"");
        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelId::Gemini25Flash);
    }
}
