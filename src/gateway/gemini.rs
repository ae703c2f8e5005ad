use super::{Gateway, GatewayError, GatewayErrorKind, build_prompt, types::*};
use crate::config::Config;
use crate::source::DocumentContent;
use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::time::Duration;
use tracing::debug;

/// Blocking client for the Gemini `generateContent` REST endpoint. The PDF is
/// sent inline as a base64 part next to the prompt text, so the remote model
/// does the document parsing.
pub struct GeminiGateway {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiGateway {
    pub fn new(cfg: &Config, api_key: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.model.request_timeout_seconds))
            .build()
            .with_context(|| "building HTTP client")?;
        Ok(Self {
            client,
            endpoint: cfg.model.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: cfg.model.name.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl Gateway for GeminiGateway {
    fn ask(
        &self,
        content: &DocumentContent,
        question: &str,
        instructions: Option<&str>,
    ) -> Result<String, GatewayError> {
        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData(InlineData {
                        mime_type: "application/pdf".to_string(),
                        data: BASE64.encode(&content.bytes),
                    }),
                    Part::Text(build_prompt(question, instructions)),
                ],
            }],
        };

        debug!("gemini request model={} bytes={}", self.model, content.bytes.len());

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .map_err(|e| {
                let kind = if e.is_timeout() || e.is_connect() {
                    GatewayErrorKind::Transient
                } else {
                    GatewayErrorKind::Unknown
                };
                GatewayError::new(kind, format!("request failed: {e}"))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            let kind = match status.as_u16() {
                401 | 403 => GatewayErrorKind::Auth,
                400 | 404 => GatewayErrorKind::InvalidRequest,
                429 => GatewayErrorKind::Transient,
                s if s >= 500 => GatewayErrorKind::Transient,
                _ => GatewayErrorKind::Unknown,
            };
            return Err(GatewayError::new(
                kind,
                format!("HTTP {}: {}", status, truncate(&body, 500)),
            ));
        }

        let out: GenerateContentResponse = resp.json().map_err(|e| {
            GatewayError::new(
                GatewayErrorKind::Unknown,
                format!("parsing model response: {e}"),
            )
        })?;

        out.first_text().ok_or_else(|| {
            GatewayError::new(
                GatewayErrorKind::Unknown,
                format!("model {} returned no text", self.model),
            )
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
