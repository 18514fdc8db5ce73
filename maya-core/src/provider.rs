use crate::{
    Config, WeatherFacts,
    provider::{openweather::OpenWeatherProvider, stub::StubWeatherProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod openweather;
pub mod stub;

/// External services that need an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Gemini,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Gemini, ProviderId::OpenWeather]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "gemini" => Ok(ProviderId::Gemini),
            "openweather" | "owm" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: gemini, openweather."
            )),
        }
    }
}

/// Raw current-conditions reading, before shaping. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReport {
    pub name: Option<String>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub description: Option<String>,
    pub rain_1h_mm: Option<f64>,
}

impl WeatherReport {
    /// Shape into generator input: zeroes for missing numbers, title-cased
    /// condition, and a coarse rain chance.
    pub fn into_facts(self) -> WeatherFacts {
        let description = self.description.unwrap_or_else(|| "Unknown".to_string());

        let rain_chance_pct = match self.rain_1h_mm {
            Some(mm) if mm > 0.0 => 70.0,
            _ if description.to_lowercase().contains("cloud") => 10.0,
            _ => 0.0,
        };

        WeatherFacts {
            city: self.name.filter(|n| !n.is_empty()).unwrap_or_else(|| "Unknown".to_string()),
            temperature_c: self.temperature_c.unwrap_or(0.0),
            humidity_pct: self.humidity_pct.unwrap_or(0.0),
            condition: title_case(&description),
            rain_chance_pct,
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> anyhow::Result<WeatherReport>;
}

/// OpenWeather when a key is configured, otherwise the fixed development stub.
pub fn weather_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let boxed: Box<dyn WeatherProvider> = match config.provider_api_key(ProviderId::OpenWeather) {
        Some(api_key) => {
            let timeout = Duration::from_secs(config.weather.request_timeout_secs);
            Box::new(OpenWeatherProvider::new(api_key.to_owned(), timeout)?)
        }
        None => {
            tracing::info!("no OpenWeather key configured, serving stub weather");
            Box::new(StubWeatherProvider)
        }
    };

    Ok(boxed)
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn stub_is_used_without_key() {
        let provider = weather_provider_from_config(&Config::default()).unwrap();
        assert!(format!("{provider:?}").contains("Stub"));
    }

    #[test]
    fn openweather_is_used_with_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".to_string());

        let provider = weather_provider_from_config(&cfg).unwrap();
        assert!(format!("{provider:?}").contains("OpenWeather"));
    }

    #[test]
    fn shaping_fills_missing_fields() {
        let facts = WeatherReport::default().into_facts();

        assert_eq!(facts.city, "Unknown");
        assert_eq!(facts.condition, "Unknown");
        assert_eq!(facts.temperature_c, 0.0);
        assert_eq!(facts.humidity_pct, 0.0);
        assert_eq!(facts.rain_chance_pct, 0.0);
    }

    #[test]
    fn rain_chance_follows_rain_then_clouds() {
        let rainy = WeatherReport {
            description: Some("light rain".into()),
            rain_1h_mm: Some(0.4),
            ..Default::default()
        };
        assert_eq!(rainy.into_facts().rain_chance_pct, 70.0);

        let cloudy = WeatherReport {
            description: Some("scattered clouds".into()),
            rain_1h_mm: Some(0.0),
            ..Default::default()
        };
        let facts = cloudy.into_facts();
        assert_eq!(facts.rain_chance_pct, 10.0);
        assert_eq!(facts.condition, "Scattered Clouds");
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("clear sky"), "Clear Sky");
        assert_eq!(title_case("THUNDERSTORM with heavy-rain"), "Thunderstorm With Heavy-Rain");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "மழை".repeat(100);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
