use crate::{
    Config, ProviderId,
    error::BackendError,
    generator::candidate_order,
    model::{KeyStatus, ModelCandidate},
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod gemini;

pub use gemini::GeminiBackend;

/// A generative text service addressed by model name.
#[async_trait]
pub trait TextBackend: Send + Sync + Debug {
    async fn generate_text(
        &self,
        model: &ModelCandidate,
        prompt: &str,
    ) -> Result<String, BackendError>;
}

/// Construct the Gemini backend from config.
///
/// Fails when no key is configured or the HTTP client cannot be built; callers
/// treat either as "no backend" and fall back to templated replies.
pub fn gemini_from_config(config: &Config) -> anyhow::Result<GeminiBackend> {
    let api_key = config.provider_api_key(ProviderId::Gemini).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{}'.\n\
                 Hint: run `maya configure gemini` or set GEMINI_API_KEY.",
            ProviderId::Gemini
        )
    })?;

    let timeout = Duration::from_secs(config.generator.request_timeout_secs);
    let backend = GeminiBackend::new(api_key.to_owned(), timeout)
        .map_err(|e| anyhow::anyhow!("Failed to build Gemini HTTP client: {e}"))?;

    Ok(backend)
}

/// Report whether the Gemini key is set and which candidate model answers.
pub async fn gemini_key_status(config: &Config) -> KeyStatus {
    if config.provider_api_key(ProviderId::Gemini).is_none() {
        return KeyStatus::not_configured("GEMINI_API_KEY is not set");
    }

    let gemini = match gemini_from_config(config) {
        Ok(gemini) => gemini,
        Err(e) => {
            return KeyStatus {
                configured: true,
                reachable: false,
                message: Some(e.to_string()),
                model: None,
            };
        }
    };

    let candidates =
        candidate_order(&config.generator.preferred_model, &config.generator.fallback_models);
    gemini.check(&candidates).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = gemini_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for provider 'gemini'"));
    }

    #[test]
    fn gemini_from_config_builds_with_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::Gemini, "KEY".to_string());

        assert!(gemini_from_config(&cfg).is_ok());
    }

    #[tokio::test]
    async fn key_status_without_key_is_not_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::Gemini, "   ".to_string());

        let status = gemini_key_status(&cfg).await;

        assert!(!status.configured);
        assert!(!status.reachable);
        assert_eq!(status.message.as_deref(), Some("GEMINI_API_KEY is not set"));
    }
}
