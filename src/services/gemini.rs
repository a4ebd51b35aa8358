use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::core::config::Settings;
use crate::schemas::submission::EvaluationResult;
use crate::services::extraction;

/// Finish reason the provider reports for a normal completion. Anything else
/// is logged but the candidate text is still used.
const NORMAL_FINISH_REASON: &str = "STOP";

#[derive(Debug, Clone, Copy)]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

const PAPER_CONFIG: GenerationConfig =
    GenerationConfig { temperature: 0.7, top_k: 40, top_p: 0.95, max_output_tokens: 2048 };

const EVALUATION_CONFIG: GenerationConfig =
    GenerationConfig { temperature: 0.3, top_k: 40, top_p: 0.95, max_output_tokens: 1024 };

#[derive(Debug, Error)]
pub(crate) enum GeminiError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    #[error("Gemini request failed: {0}")]
    Request(String),
    #[error("Gemini API error (status {status}): {detail}")]
    Api { status: u16, detail: String },
    #[error("prompt blocked by provider: {0}")]
    Blocked(String),
    #[error("malformed Gemini response")]
    MalformedResponse,
}

#[derive(Debug, Clone)]
pub(crate) struct GeminiService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiService {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(settings.gemini().request_timeout);
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .build()
            .map_err(|err| anyhow::anyhow!(err).context("Failed to build HTTP client"))?;

        Ok(Self {
            client,
            api_key: settings.gemini().api_key.clone(),
            base_url: settings.gemini().base_url.trim_end_matches('/').to_string(),
            model: settings.gemini().model.clone(),
        })
    }

    /// Generate a question paper from the composed prompt.
    pub(crate) async fn generate_paper(&self, prompt: &str) -> Result<String, GeminiError> {
        self.generate_content(prompt, PAPER_CONFIG).await
    }

    /// Evaluate an answer: ask for the structured grade, then extract it from
    /// the reply, degrading to the fixed fallback record when extraction
    /// fails. Only transport and provider errors propagate.
    pub(crate) async fn evaluate_answer(
        &self,
        prompt: &str,
    ) -> Result<EvaluationResult, GeminiError> {
        let text = self.generate_content(prompt, EVALUATION_CONFIG).await?;
        Ok(extraction::evaluation_from_text(&text))
    }

    async fn generate_content(
        &self,
        prompt: &str,
        config: GenerationConfig,
    ) -> Result<String, GeminiError> {
        if self.api_key.is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let payload = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": config.temperature,
                "topK": config.top_k,
                "topP": config.top_p,
                "maxOutputTokens": config.max_output_tokens,
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| GeminiError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status: status.as_u16(), detail });
        }

        let body: Value =
            response.json().await.map_err(|err| GeminiError::Request(err.to_string()))?;

        extract_candidate_text(&body)
    }
}

fn extract_candidate_text(body: &Value) -> Result<String, GeminiError> {
    let candidate = match body.get("candidates").and_then(|candidates| candidates.get(0)) {
        Some(candidate) => candidate,
        None => {
            let block_reason = body
                .get("promptFeedback")
                .and_then(|feedback| feedback.get("blockReason"))
                .and_then(|reason| reason.as_str());
            return match block_reason {
                Some(reason) => Err(GeminiError::Blocked(reason.to_string())),
                None => Err(GeminiError::MalformedResponse),
            };
        }
    };

    if let Some(finish_reason) = candidate.get("finishReason").and_then(|value| value.as_str()) {
        if finish_reason != NORMAL_FINISH_REASON {
            tracing::warn!(finish_reason, "Gemini candidate finished abnormally");
        }
    }

    candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.get(0))
        .and_then(|part| part.get("text"))
        .and_then(|value| value.as_str())
        .map(|text| text.to_string())
        .ok_or(GeminiError::MalformedResponse)
}
