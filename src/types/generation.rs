//! Generation settings.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Settings controlling narrative text generation.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub stop_sequences: Option<Vec<String>>,
}

impl GenerationSettings {
    /// Gemini `generationConfig` object, or `None` when nothing is set.
    pub fn to_gemini_config(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        let mut config = serde_json::Map::new();
        if let Some(max) = self.max_tokens {
            config.insert("maxOutputTokens".into(), max.into());
        }
        if let Some(temp) = self.temperature {
            config.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = self.top_p {
            config.insert("topP".into(), top_p.into());
        }
        if let Some(top_k) = self.top_k {
            config.insert("topK".into(), top_k.into());
        }
        if let Some(ref stops) = self.stop_sequences {
            config.insert("stopSequences".into(), serde_json::json!(stops));
        }
        (!config.is_empty()).then_some(config)
    }
}
