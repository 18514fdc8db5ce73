use serde::{Deserialize, Serialize};
use std::fmt;

/// Weather facts for one city, already shaped for the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherFacts {
    pub city: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    /// Title-cased condition, e.g. "Light Rain".
    pub condition: String,
    #[serde(default)]
    pub rain_chance_pct: f64,
}

/// Four-field reply produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualResponse {
    pub english: String,
    pub tamil: String,
    pub advice: String,
    pub mood_reply: String,
}

impl BilingualResponse {
    /// True when every field carries visible text.
    pub fn is_complete(&self) -> bool {
        [&self.english, &self.tamil, &self.advice, &self.mood_reply]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Facts plus the generated reply, as returned to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherAnswer {
    #[serde(flatten)]
    pub facts: WeatherFacts,
    pub bilingual: BilingualResponse,
}

/// Identifier of one generative model variant, e.g. "gemini-2.5-flash".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCandidate(String);

impl ModelCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelCandidate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModelCandidate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Result of probing an external API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStatus {
    pub configured: bool,
    pub reachable: bool,
    pub message: Option<String>,
    pub model: Option<String>,
}

impl KeyStatus {
    pub fn not_configured(message: impl Into<String>) -> Self {
        Self { configured: false, reachable: false, message: Some(message.into()), model: None }
    }
}

/// A model advertised by the generative backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub supports_generate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_field_makes_response_incomplete() {
        let mut reply = BilingualResponse {
            english: "x".into(),
            tamil: "y".into(),
            advice: "z".into(),
            mood_reply: "w".into(),
        };
        assert!(reply.is_complete());

        reply.advice = "   ".into();
        assert!(!reply.is_complete());
    }

    #[test]
    fn answer_serializes_flat() {
        let answer = WeatherAnswer {
            facts: WeatherFacts {
                city: "Madurai".into(),
                temperature_c: 33.0,
                humidity_pct: 40.0,
                condition: "Clear Sky".into(),
                rain_chance_pct: 0.0,
            },
            bilingual: BilingualResponse {
                english: "a".into(),
                tamil: "b".into(),
                advice: "c".into(),
                mood_reply: "d".into(),
            },
        };

        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(value["city"], "Madurai");
        assert_eq!(value["bilingual"]["mood_reply"], "d");
    }
}
