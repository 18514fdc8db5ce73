use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{model::KeyStatus, provider::truncate_body};

use super::{WeatherProvider, WeatherReport};

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build OpenWeather HTTP client")?;

        Ok(Self { api_key, base_url: OPENWEATHER_BASE_URL.to_string(), http })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send_current(&self, city: &str) -> reqwest::Result<reqwest::Response> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        self.http
            .get(url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
    }

    /// Probe the key with a request for Chennai.
    pub async fn check(&self) -> KeyStatus {
        let res = match self.send_current("Chennai").await {
            Ok(res) => res,
            Err(e) => {
                return KeyStatus {
                    configured: true,
                    reachable: false,
                    message: Some(e.to_string()),
                    model: None,
                };
            }
        };

        let (reachable, message) = match res.status() {
            StatusCode::UNAUTHORIZED => {
                (false, "Invalid OpenWeatherMap API key (401)".to_string())
            }
            status if status.is_success() => (true, "OpenWeatherMap reachable".to_string()),
            status => (false, format!("OpenWeatherMap request failed with status {status}")),
        };

        KeyStatus { configured: true, reachable, message: Some(message), model: None }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    #[serde(default)]
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    rain: OwRain,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherReport> {
        let res = self
            .send_current(city)
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        Ok(WeatherReport {
            name: parsed.name,
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            description: parsed.weather.into_iter().next().and_then(|w| w.description),
            rain_1h_mm: parsed.rain.one_hour,
        })
    }
}
