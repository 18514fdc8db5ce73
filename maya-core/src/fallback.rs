//! Templated reply used when no generative model is usable.

use crate::model::{BilingualResponse, WeatherFacts};

const ADVICE: &str = "Wear light, breathable clothes; stay hydrated.";
const MOOD_REPLY: &str = "Stay positive and enjoy your day!";

/// Build the reply from the facts alone. Same facts, same text.
pub fn fallback_response(facts: &WeatherFacts) -> BilingualResponse {
    let temp = round_half_even(facts.temperature_c);
    let humidity = round_half_even(facts.humidity_pct);

    BilingualResponse {
        english: format!(
            "In {city}, it's {condition} around {temp}°C with {humidity}% humidity. \
             Carry an umbrella if needed.",
            city = facts.city,
            condition = facts.condition.to_lowercase(),
        ),
        tamil: format!(
            "{city} நகரத்தில் இன்று {temp}°C; {condition} நிலை. தேவையெனில் குடை எடுத்துச் செல்லவும்.",
            city = facts.city,
            condition = facts.condition,
        ),
        advice: ADVICE.to_string(),
        mood_reply: MOOD_REPLY.to_string(),
    }
}

fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}
