//! Prompt sent to the generative backend.

use crate::model::WeatherFacts;

/// Render the persona prompt for one set of facts and the user's words.
pub fn render_prompt(facts: &WeatherFacts, user_query: &str) -> String {
    format!(
        r#"You are Maya, a warm and caring weather voice assistant for people in Tamil Nadu.
You give hyperlocal weather updates, practical clothing and travel tips, and a friendly
emotional remark that sounds like a friend talking, never like a robotic forecast.

Weather data:
City: {city}
Temperature: {temp}°C
Humidity: {humidity}%
Condition: {condition}
Chance of rain: {rain_chance}%

User said: "{user_query}"

How to speak:
- Mix Tamil and English naturally (Tanglish), short and warm sentences.
- Stay rooted in Tamil Nadu life: heat, mazhai (rain), velicham (sunshine), kulir (cool breeze).
- Give one concrete, actionable suggestion: what to wear, whether to carry an umbrella, what to drink.
- Finish with a short emotional line that makes the user smile.

Reply with ONLY a JSON object with exactly these four string fields:
{{
    "english": "friendly English summary of the weather and the mood",
    "tamil": "the same message in Tanglish (Tamil + English mix)",
    "advice": "specific clothing, travel or lifestyle suggestion",
    "mood_reply": "short emotional closing line"
}}

Examples:
- Raining: tell them to carry an umbrella and mention mazhai.
- Sunny: suggest light cotton clothes and mention velicham.
- Humid: remind them to stay hydrated.
- Pleasant: share the joy and invite them to relax.
"#,
        city = facts.city,
        temp = facts.temperature_c,
        humidity = facts.humidity_pct,
        condition = facts.condition,
        rain_chance = facts.rain_chance_pct,
        user_query = user_query,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_every_fact() {
        let facts = WeatherFacts {
            city: "Coimbatore".into(),
            temperature_c: 27.5,
            humidity_pct: 81.0,
            condition: "Light Rain".into(),
            rain_chance_pct: 70.0,
        };

        let prompt = render_prompt(&facts, "Should I take the bike today?");

        assert!(prompt.contains("City: Coimbatore"));
        assert!(prompt.contains("Temperature: 27.5°C"));
        assert!(prompt.contains("Humidity: 81%"));
        assert!(prompt.contains("Condition: Light Rain"));
        assert!(prompt.contains("Chance of rain: 70%"));
        assert!(prompt.contains("\"Should I take the bike today?\""));
    }

    #[test]
    fn prompt_names_the_four_fields() {
        let facts = WeatherFacts {
            city: "Salem".into(),
            temperature_c: 30.0,
            humidity_pct: 50.0,
            condition: "Clear Sky".into(),
            rain_chance_pct: 0.0,
        };

        let prompt = render_prompt(&facts, "");
        for field in ["\"english\"", "\"tamil\"", "\"advice\"", "\"mood_reply\""] {
            assert!(prompt.contains(field), "missing {field}");
        }
    }
}
