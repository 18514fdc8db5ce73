//! Fetch weather, shape it, and have the generator phrase it.

use anyhow::{Context, Result};

use crate::{
    Config,
    generator::BilingualGenerator,
    model::WeatherAnswer,
    provider::{WeatherProvider, weather_provider_from_config},
};

/// Route planning answers at most this many cities.
pub const MAX_ROUTE_CITIES: usize = 8;

#[derive(Debug)]
pub struct Assistant {
    weather: Box<dyn WeatherProvider>,
    generator: BilingualGenerator,
}

impl Assistant {
    pub fn new(weather: Box<dyn WeatherProvider>, generator: BilingualGenerator) -> Self {
        Self { weather, generator }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let weather = weather_provider_from_config(config)?;
        Ok(Self::new(weather, BilingualGenerator::from_config(config)))
    }

    pub fn generator(&self) -> &BilingualGenerator {
        &self.generator
    }

    /// Answer one city. An empty query becomes "Weather in {city}".
    pub async fn answer(&self, city: &str, user_query: Option<&str>) -> Result<WeatherAnswer> {
        let report = self
            .weather
            .current(city)
            .await
            .with_context(|| format!("Failed to fetch weather for {city}"))?;
        let facts = report.into_facts();

        let query = match user_query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => q.to_string(),
            None => format!("Weather in {city}"),
        };

        let bilingual = self.generator.generate(&facts, &query).await;
        Ok(WeatherAnswer { facts, bilingual })
    }

    /// Answer each stop of a route, one after another.
    pub async fn route(&self, cities: &[String]) -> Result<Vec<WeatherAnswer>> {
        if cities.len() > MAX_ROUTE_CITIES {
            tracing::info!(
                requested = cities.len(),
                "route truncated to the first {MAX_ROUTE_CITIES} cities"
            );
        }

        let mut answers = Vec::with_capacity(cities.len().min(MAX_ROUTE_CITIES));
        for city in cities.iter().take(MAX_ROUTE_CITIES) {
            let query = format!("Route planner for {city}");
            answers.push(self.answer(city, Some(query.as_str())).await?);
        }
        Ok(answers)
    }
}
