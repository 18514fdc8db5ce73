use anyhow::Result;
use async_trait::async_trait;

use super::{WeatherProvider, WeatherReport};

/// Fixed clear-sky reading for development without an OpenWeather key.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubWeatherProvider;

#[async_trait]
impl WeatherProvider for StubWeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherReport> {
        Ok(WeatherReport {
            name: Some(city.to_string()),
            temperature_c: Some(31.2),
            humidity_pct: Some(58.0),
            description: Some("clear sky".to_string()),
            rain_1h_mm: Some(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_echoes_city() {
        let facts = StubWeatherProvider.current("Erode").await.unwrap().into_facts();

        assert_eq!(facts.city, "Erode");
        assert_eq!(facts.condition, "Clear Sky");
        assert_eq!(facts.rain_chance_pct, 0.0);
    }
}
