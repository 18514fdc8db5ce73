use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    error::BackendError,
    model::{KeyStatus, ModelCandidate, ModelInfo},
    provider::truncate_body,
};

use super::TextBackend;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct GeminiBackend {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiBackend {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { api_key, base_url: GEMINI_BASE_URL.to_string(), http })
    }

    /// Point the client at another host (used against mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Models visible to this key. Any failure yields an empty list.
    pub async fn list_models(&self) -> Vec<ModelInfo> {
        match self.fetch_models().await {
            Ok(models) => models,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list Gemini models");
                Vec::new()
            }
        }
    }

    async fn fetch_models(&self) -> Result<Vec<ModelInfo>, BackendError> {
        let url = format!("{}/v1beta/models", self.base_url);

        let res = self.http.get(&url).header("x-goog-api-key", &self.api_key).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }

        let parsed: GmModelList = serde_json::from_str(&body)
            .map_err(|e| BackendError::Malformed(format!("model list: {e}")))?;

        Ok(parsed
            .models
            .into_iter()
            .map(|m| ModelInfo {
                supports_generate: m
                    .supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent"),
                id: m.name,
            })
            .collect())
    }

    /// Probe the key by asking each candidate, in order, for a tiny reply.
    pub async fn check(&self, candidates: &[ModelCandidate]) -> KeyStatus {
        for model in candidates {
            match self.generate_text(model, "ok").await {
                Ok(_) => {
                    return KeyStatus {
                        configured: true,
                        reachable: true,
                        message: Some("generateContent ok".to_string()),
                        model: Some(model.to_string()),
                    };
                }
                Err(e) => {
                    tracing::debug!(model = %model, kind = %e.kind(), error = %e, "key check failed");
                }
            }
        }

        KeyStatus {
            configured: true,
            reachable: false,
            message: Some("No supported Gemini model reachable".to_string()),
            model: candidates.first().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
struct GmRequest<'a> {
    contents: Vec<GmRequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GmRequestContent<'a> {
    parts: Vec<GmRequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GmRequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GmResponse {
    #[serde(default)]
    candidates: Vec<GmCandidate>,
}

#[derive(Debug, Deserialize)]
struct GmCandidate {
    content: Option<GmContent>,
}

#[derive(Debug, Deserialize)]
struct GmContent {
    #[serde(default)]
    parts: Vec<GmPart>,
}

#[derive(Debug, Deserialize)]
struct GmPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GmModelList {
    #[serde(default)]
    models: Vec<GmModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GmModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[async_trait]
impl TextBackend for GeminiBackend {
    async fn generate_text(
        &self,
        model: &ModelCandidate,
        prompt: &str,
    ) -> Result<String, BackendError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let payload = GmRequest {
            contents: vec![GmRequestContent { parts: vec![GmRequestPart { text: prompt }] }],
        };

        let res = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::ModelNotFound(model.clone()));
        }
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }

        let parsed: GmResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::Malformed(format!("Gemini envelope: {e}")))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        Ok(text)
    }
}
