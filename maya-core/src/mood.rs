use serde::{Deserialize, Serialize};

const KEYWORDS: &[(&str, f64)] =
    &[("rain", -0.2), ("storm", -0.3), ("sunny", 0.2), ("cool", 0.1), ("hot", -0.1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Cheerful,
    Calm,
    Formal,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Cheerful => "cheerful",
            Mood::Calm => "calm",
            Mood::Formal => "formal",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodReading {
    pub mood: Mood,
    pub score: f64,
}

/// Score text on keywords and exclamation marks.
pub fn score_mood(text: &str) -> MoodReading {
    let lower = text.to_lowercase();

    let keyword_score: f64 =
        KEYWORDS.iter().filter(|(word, _)| lower.contains(word)).map(|(_, weight)| weight).sum();
    let excitement = (text.matches('!').count() as f64 * 0.05).min(0.2);

    let score = (0.5 + keyword_score + excitement).clamp(0.0, 1.0);
    let mood = if score > 0.65 {
        Mood::Cheerful
    } else if score > 0.45 {
        Mood::Calm
    } else {
        Mood::Formal
    };

    MoodReading { mood, score }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn neutral_text_is_calm() {
        let reading = score_mood("what is the weather");
        assert_eq!(reading.mood, Mood::Calm);
        assert!(close(reading.score, 0.5));
    }

    #[test]
    fn sunny_excitement_is_cheerful() {
        let reading = score_mood("Sunny and cool!!!");
        assert_eq!(reading.mood, Mood::Cheerful);
        assert!(close(reading.score, 0.95));
    }

    #[test]
    fn storms_are_formal() {
        let reading = score_mood("rain and storm tonight");
        assert_eq!(reading.mood, Mood::Formal);
        assert!(close(reading.score, 0.0));
    }

    #[test]
    fn exclamation_bonus_is_capped() {
        let reading = score_mood("!!!!!!!!!!");
        assert!(close(reading.score, 0.7));
    }
}
