use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use maya_core::{
    Assistant, Config, HistoryStore, KeyStatus, PreferredLanguage, ProviderId, WeatherAnswer,
    backend::{gemini_from_config, gemini_key_status},
    city::extract_city,
    mood::score_mood,
    provider::openweather::OpenWeatherProvider,
};
use std::time::Duration;

const DEFAULT_USER: &str = "default";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "maya", version, about = "Bilingual Tamil Nadu weather assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name: "gemini" or "openweather".
        provider: String,
    },

    /// Ask about the weather in a city.
    Ask {
        city: String,

        /// What the user said; defaults to "Weather in <city>".
        #[arg(long)]
        query: Option<String>,

        /// Whose language preference to use.
        #[arg(long, default_value = DEFAULT_USER)]
        user: String,
    },

    /// Answer a spoken transcript, picking the city out of it.
    Voice {
        transcript: String,

        #[arg(long, default_value = DEFAULT_USER)]
        user: String,
    },

    /// Weather along a route (first 8 cities).
    Route {
        #[arg(required = true)]
        cities: Vec<String>,
    },

    /// Score the mood of a piece of text.
    Mood { text: String },

    /// Check that the configured API keys work.
    Keys,

    /// List models the Gemini key can see.
    Models,

    /// Show recently answered queries.
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Choose which language(s) replies are shown in.
    Language {
        /// english, tamil or both.
        language: String,

        #[arg(long, default_value = DEFAULT_USER)]
        user: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        tracing::debug!(command = ?self.command, "running command");

        match self.command {
            Command::Configure { provider } => configure(config, &provider)?,
            Command::Ask { city, query, user } => {
                let history = open_history(&config)?;
                let assistant = Assistant::from_config(&config)?;

                let answer = assistant.answer(&city, query.as_deref()).await?;
                log_answer(&history, &answer, query.as_deref().unwrap_or(""))?;
                print_answer(&answer, history.preferred_language(&user)?);
            }
            Command::Voice { transcript, user } => {
                let history = open_history(&config)?;
                let assistant = Assistant::from_config(&config)?;

                let city = extract_city(&transcript);
                let answer = assistant.answer(city, Some(transcript.as_str())).await?;
                log_answer(&history, &answer, &transcript)?;
                print_answer(&answer, history.preferred_language(&user)?);
            }
            Command::Route { cities } => {
                let assistant = Assistant::from_config(&config)?;
                for answer in assistant.route(&cities).await? {
                    print_answer(&answer, PreferredLanguage::Both);
                    println!();
                }
            }
            Command::Mood { text } => {
                let reading = score_mood(&text);
                println!("Mood: {} (score {:.2})", reading.mood, reading.score);
            }
            Command::Keys => {
                print_key_status(ProviderId::OpenWeather, &openweather_status(&config).await);
                print_key_status(ProviderId::Gemini, &gemini_key_status(&config).await);
            }
            Command::Models => {
                let gemini = gemini_from_config(&config)?;
                let models = gemini.list_models().await;
                if models.is_empty() {
                    println!("No models returned.");
                }
                for model in models {
                    let marker = if model.supports_generate { "generate" } else { "-" };
                    println!("{:<48} {marker}", model.id);
                }
            }
            Command::History { limit } => {
                let history = open_history(&config)?;
                for record in history.recent_queries(limit)? {
                    println!(
                        "[{}] {}: {}\n    {}",
                        record.timestamp.format("%Y-%m-%d %H:%M"),
                        record.city,
                        record.query_text,
                        record.response_text,
                    );
                }
            }
            Command::Language { language, user } => {
                let language = PreferredLanguage::try_from(language.as_str())?;
                open_history(&config)?.set_preferred_language(&user, language)?;
                println!("Replies for '{user}' will be shown in: {}", language.as_str());
            }
        }

        Ok(())
    }
}

fn configure(mut config: Config, provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.upsert_provider_api_key(id, api_key.trim().to_string());

    if id == ProviderId::Gemini {
        let model = Text::new("Preferred model:")
            .with_default(&config.generator.preferred_model)
            .prompt()
            .context("Failed to read preferred model")?;
        if !model.trim().is_empty() {
            config.generator.preferred_model = model.trim().to_string();
        }
    }

    config.save()?;
    println!("Saved {id} settings to {}", Config::config_file_path()?.display());
    Ok(())
}

fn open_history(config: &Config) -> anyhow::Result<HistoryStore> {
    HistoryStore::open(config.database_path()?)
}

fn log_answer(history: &HistoryStore, answer: &WeatherAnswer, query: &str) -> anyhow::Result<()> {
    history.record_query(&answer.facts.city, query, &answer.bilingual)?;
    history.record_weather(&answer.facts)?;
    Ok(())
}

fn print_answer(answer: &WeatherAnswer, language: PreferredLanguage) {
    let facts = &answer.facts;
    println!(
        "{}: {:.1}°C, {:.0}% humidity, {} (rain chance {:.0}%)",
        facts.city, facts.temperature_c, facts.humidity_pct, facts.condition, facts.rain_chance_pct
    );

    let reply = &answer.bilingual;
    if language.shows_english() {
        println!("  {}", reply.english);
    }
    if language.shows_tamil() {
        println!("  {}", reply.tamil);
    }
    println!("  Advice: {}", reply.advice);
    println!("  {}", reply.mood_reply);
}

async fn openweather_status(config: &Config) -> KeyStatus {
    let Some(key) = config.provider_api_key(ProviderId::OpenWeather) else {
        return KeyStatus::not_configured("OWM_API_KEY is not set");
    };

    let timeout = Duration::from_secs(config.weather.request_timeout_secs);
    match OpenWeatherProvider::new(key.to_owned(), timeout) {
        Ok(provider) => provider.check().await,
        Err(e) => KeyStatus {
            configured: true,
            reachable: false,
            message: Some(e.to_string()),
            model: None,
        },
    }
}

fn print_key_status(id: ProviderId, status: &KeyStatus) {
    let state = match (status.configured, status.reachable) {
        (false, _) => "not configured",
        (true, false) => "unreachable",
        (true, true) => "ok",
    };

    print!("{:<12} {state}", id.as_str());
    if let Some(model) = &status.model {
        print!(" [{model}]");
    }
    if let Some(message) = &status.message {
        print!(" - {message}");
    }
    println!();
}
