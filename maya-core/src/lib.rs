//! Core library for the `maya` weather assistant.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The bilingual reply generator and its model backends
//! - Weather providers and the shaping of their readings
//! - Query history persistence and small text heuristics
//!
//! It is used by `maya-cli`, but can also be reused by other binaries or services.

pub mod assistant;
pub mod backend;
pub mod city;
pub mod config;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod history;
pub mod model;
pub mod mood;
pub mod prompt;
pub mod provider;

pub use assistant::Assistant;
pub use backend::{GeminiBackend, TextBackend};
pub use config::{Config, GeneratorSettings, ProviderConfig};
pub use error::{BackendError, FailureKind};
pub use generator::BilingualGenerator;
pub use history::{HistoryStore, PreferredLanguage};
pub use model::{BilingualResponse, KeyStatus, ModelCandidate, WeatherAnswer, WeatherFacts};
pub use provider::{ProviderId, WeatherProvider};
