//! Bilingual response generation with ordered model fallback.
//!
//! The generator walks the candidate list once, in order, and returns the
//! first reply that parses into all four fields. Anything else (no backend,
//! every candidate failing, cancellation) degrades to the templated reply in
//! [`crate::fallback`]. It never returns an error.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    Config,
    backend::{TextBackend, gemini_from_config},
    config::GeneratorSettings,
    error::{BackendError, FailureKind},
    fallback::fallback_response,
    model::{BilingualResponse, ModelCandidate, WeatherFacts},
    prompt::render_prompt,
};

#[derive(Debug, Clone)]
pub struct BilingualGenerator {
    backend: Option<Arc<dyn TextBackend>>,
    candidates: Arc<[ModelCandidate]>,
}

impl BilingualGenerator {
    pub fn new(backend: Option<Arc<dyn TextBackend>>, settings: &GeneratorSettings) -> Self {
        let candidates = candidate_order(&settings.preferred_model, &settings.fallback_models);
        Self { backend, candidates: candidates.into() }
    }

    /// Build from process config. A missing key or a client that fails to
    /// build leaves the generator without a backend.
    pub fn from_config(config: &Config) -> Self {
        let backend: Option<Arc<dyn TextBackend>> = match gemini_from_config(config) {
            Ok(gemini) => Some(Arc::new(gemini)),
            Err(e) => {
                tracing::info!(reason = %e, "generative backend disabled, using templated replies");
                None
            }
        };

        Self::new(backend, &config.generator)
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn candidates(&self) -> &[ModelCandidate] {
        &self.candidates
    }

    pub async fn generate(&self, facts: &WeatherFacts, user_query: &str) -> BilingualResponse {
        self.generate_cancellable(facts, user_query, &CancellationToken::new()).await
    }

    /// Like [`generate`](Self::generate), but stops between attempts once
    /// `cancel` fires and answers with the templated reply.
    pub async fn generate_cancellable(
        &self,
        facts: &WeatherFacts,
        user_query: &str,
        cancel: &CancellationToken,
    ) -> BilingualResponse {
        let Some(backend) = self.backend.as_deref() else {
            return fallback_response(facts);
        };

        let default_query;
        let user_query = if user_query.trim().is_empty() {
            default_query = format!("Weather in {}", facts.city);
            default_query.as_str()
        } else {
            user_query
        };

        let prompt = render_prompt(facts, user_query);

        for (index, model) in self.candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(city = %facts.city, "generation cancelled before model {model}");
                return fallback_response(facts);
            }

            tracing::debug!(model = %model, attempt = index + 1, "requesting bilingual reply");

            match attempt(backend, model, &prompt).await {
                Ok(reply) => {
                    if index > 0 {
                        tracing::info!(model = %model, attempt = index + 1, "fallback model answered");
                    }
                    return reply;
                }
                Err(e) => {
                    // Both kinds advance to the next candidate for now.
                    let kind = e.kind();
                    tracing::warn!(model = %model, kind = %kind, error = %e, "model attempt failed");
                    match kind {
                        FailureKind::Permanent | FailureKind::Transient => continue,
                    }
                }
            }
        }

        tracing::warn!(
            city = %facts.city,
            tried = self.candidates.len(),
            "all models failed, using templated reply"
        );
        fallback_response(facts)
    }
}

async fn attempt(
    backend: &dyn TextBackend,
    model: &ModelCandidate,
    prompt: &str,
) -> Result<BilingualResponse, BackendError> {
    let text = backend.generate_text(model, prompt).await?;
    extract_response(&text)
}

/// Preferred model first, then the fixed list without it, each name once.
pub fn candidate_order(preferred: &str, fallback_models: &[String]) -> Vec<ModelCandidate> {
    let mut order: Vec<ModelCandidate> = Vec::with_capacity(fallback_models.len() + 1);

    let names = std::iter::once(preferred).chain(fallback_models.iter().map(String::as_str));
    for name in names.map(str::trim).filter(|name| !name.is_empty()) {
        if !order.iter().any(|known| known.as_str() == name) {
            order.push(ModelCandidate::new(name));
        }
    }

    order
}

/// Pull the reply object out of free text: first `{` through last `}`.
/// Keys other than the four reply fields are ignored.
pub fn extract_response(text: &str) -> Result<BilingualResponse, BackendError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(BackendError::Malformed("no JSON object in reply".to_string()));
    };
    if end < start {
        return Err(BackendError::Malformed("no JSON object in reply".to_string()));
    }

    let reply: BilingualResponse = serde_json::from_str(&text[start..=end])
        .map_err(|e| BackendError::Malformed(e.to_string()))?;

    if !reply.is_complete() {
        return Err(BackendError::Malformed("reply has an empty field".to_string()));
    }

    Ok(reply)
}
