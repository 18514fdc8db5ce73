//! SQLite log of answered queries, weather readings and user preferences.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params, types::Type};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::{BilingualResponse, WeatherFacts};

/// Which halves of a bilingual reply a user wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredLanguage {
    English,
    Tamil,
    #[default]
    Both,
}

impl PreferredLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredLanguage::English => "english",
            PreferredLanguage::Tamil => "tamil",
            PreferredLanguage::Both => "both",
        }
    }

    pub fn shows_english(&self) -> bool {
        matches!(self, PreferredLanguage::English | PreferredLanguage::Both)
    }

    pub fn shows_tamil(&self) -> bool {
        matches!(self, PreferredLanguage::Tamil | PreferredLanguage::Both)
    }
}

impl TryFrom<&str> for PreferredLanguage {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "english" | "en" => Ok(PreferredLanguage::English),
            "tamil" | "ta" => Ok(PreferredLanguage::Tamil),
            "both" => Ok(PreferredLanguage::Both),
            _ => Err(anyhow!("Unknown language '{value}'. Use english, tamil or both.")),
        }
    }
}

/// One row of the query log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub id: i64,
    pub city: String,
    pub query_text: String,
    pub response_text: String,
    pub timestamp: DateTime<Utc>,
}

pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    /// Open (or create) the history database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open history database: {}", path.display()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let store = Self { conn: Connection::open_in_memory()? };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT UNIQUE,
                    preferred_language TEXT NOT NULL DEFAULT 'both'
                );

                CREATE TABLE IF NOT EXISTS queries (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NULL REFERENCES users(id),
                    city TEXT NOT NULL,
                    query_text TEXT NOT NULL,
                    response_text TEXT NOT NULL,
                    timestamp TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS weather_logs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    city TEXT NOT NULL,
                    temp REAL NOT NULL,
                    humidity REAL NOT NULL,
                    condition TEXT NOT NULL,
                    date TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_queries_city ON queries(city);
                CREATE INDEX IF NOT EXISTS idx_weather_logs_city ON weather_logs(city);
                "#,
            )
            .context("Failed to initialize history schema")?;
        Ok(())
    }

    /// Log an answered query. Blank query text is stored as "weather".
    pub fn record_query(
        &self,
        city: &str,
        query_text: &str,
        reply: &BilingualResponse,
    ) -> Result<i64> {
        let query_text = if query_text.trim().is_empty() { "weather" } else { query_text };

        self.conn
            .execute(
                "INSERT INTO queries (city, query_text, response_text, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![city, query_text, reply.english, Utc::now().to_rfc3339()],
            )
            .context("Failed to record query")?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn record_weather(&self, facts: &WeatherFacts) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO weather_logs (city, temp, humidity, condition, date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    facts.city,
                    facts.temperature_c,
                    facts.humidity_pct,
                    facts.condition,
                    Utc::now().to_rfc3339()
                ],
            )
            .context("Failed to record weather reading")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent queries first.
    pub fn recent_queries(&self, limit: usize) -> Result<Vec<QueryRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, city, query_text, response_text, timestamp
             FROM queries ORDER BY id DESC LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let timestamp: String = row.get(4)?;
                let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
                    })?;
                Ok(QueryRecord {
                    id: row.get(0)?,
                    city: row.get(1)?,
                    query_text: row.get(2)?,
                    response_text: row.get(3)?,
                    timestamp,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read query history")?;

        Ok(rows)
    }

    #[cfg(test)]
    fn weather_log_count(&self, city: &str) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM weather_logs WHERE city = ?1",
            params![city],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn set_preferred_language(&self, user: &str, language: PreferredLanguage) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO users (name, preferred_language) VALUES (?1, ?2)
                 ON CONFLICT(name) DO UPDATE SET preferred_language = excluded.preferred_language",
                params![user, language.as_str()],
            )
            .context("Failed to store language preference")?;
        Ok(())
    }

    /// Stored preference, or `Both` for unknown users.
    pub fn preferred_language(&self, user: &str) -> Result<PreferredLanguage> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT preferred_language FROM users WHERE name = ?1",
                params![user],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(value) => PreferredLanguage::try_from(value.as_str()),
            None => Ok(PreferredLanguage::default()),
        }
    }
}
