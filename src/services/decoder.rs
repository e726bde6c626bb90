use super::log_response;
use crate::settings::DecoderSettings;
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const PROMPT_INSTRUCTIONS: &str = "\
You are a friendly aviation weather decoder. I have a raw METAR report from an airport,
and I need you to translate it into plain English that anyone, including people with no
aviation knowledge, can easily understand.

Decode the METAR below into a conversational, friendly weather summary. Cover:
- Overall sky conditions (clear, partly cloudy, overcast, stormy, etc.)
- Temperature in both Celsius and Fahrenheit
- Wind: speed (in mph and km/h) and direction in plain terms like \"from the north\"
  or \"calm\". If gusting, mention it.
- Visibility (in miles and km, note if reduced by fog/haze/rain)
- Any precipitation or significant weather (rain, snow, thunderstorms, fog, etc.)
- Dew point and whether it feels humid
- Barometric pressure in inHg

Start with a one-sentence overall summary (e.g. \"It's a clear, cool morning at JFK
with light winds.\"), then give the detailed breakdown. Keep the tone friendly and
approachable, like you're telling a friend what the weather is like before a trip.";

fn decode_prompt(raw_metar: &str) -> String {
    format!("{PROMPT_INSTRUCTIONS}\n\nMETAR: {raw_metar}\n")
}

/// The summary returned when the language model answers without any usable content.
pub fn fallback_summary(raw_metar: &str) -> String {
    format!("Unable to decode the METAR. Raw data: {raw_metar}")
}

#[async_trait]
pub trait MetarDecoder: Send + Sync {
    /// Translates a raw METAR into a plain-English summary.
    async fn decode(&self, raw_metar: &str) -> Result<String, DecoderError>;
}

#[derive(Debug, Error)]
pub enum DecoderError {
    #[error("supplied language model API url is not a base url to query: {0}")]
    NotABaseUrl(Url),

    #[error("language model API call failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("language model API responded with status {status}")]
    HttpStatus { status: StatusCode },

    #[error("failed to parse language model API JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    max_completion_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletion {
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

/// Decodes METARs with an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiMetarDecoder {
    client: reqwest::Client,
    completions_url: Url,
    api_key: Secret<String>,
    model: String,
    max_completion_tokens: u32,
}

impl OpenAiMetarDecoder {
    pub fn new(
        base_url: impl Into<Url>, api_key: Secret<String>, model: impl Into<String>,
        max_completion_tokens: u32, timeout: Duration,
    ) -> Result<Self, DecoderError> {
        let base_url = base_url.into();
        let mut completions_url = base_url.clone();
        completions_url
            .path_segments_mut()
            .map_err(|_| DecoderError::NotABaseUrl(base_url))?
            .pop_if_empty()
            .extend(["v1", "chat", "completions"]);

        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            completions_url,
            api_key,
            model: model.into(),
            max_completion_tokens,
        })
    }

    pub fn from_settings(settings: &DecoderSettings) -> Result<Self, DecoderError> {
        if settings.api_key.expose_secret().is_empty() {
            tracing::warn!("no language model API key configured; decoding requests will be rejected upstream");
        }

        Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            settings.model.clone(),
            settings.max_completion_tokens,
            settings.timeout,
        )
    }
}

#[async_trait]
impl MetarDecoder for OpenAiMetarDecoder {
    #[tracing::instrument(level = "debug", skip(self), fields(model = %self.model))]
    async fn decode(&self, raw_metar: &str) -> Result<String, DecoderError> {
        const LABEL: &str = "chat_completion";

        let request = ChatCompletionRequest {
            model: &self.model,
            max_completion_tokens: self.max_completion_tokens,
            messages: vec![ChatMessage { role: "user", content: decode_prompt(raw_metar) }],
        };

        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;
        log_response(LABEL, &self.completions_url, &response);

        let status = response.status();
        if !status.is_success() {
            return Err(DecoderError::HttpStatus { status });
        }

        let body = response.text().await?;
        let completion: ChatCompletion = serde_json::from_str(&body)?;

        match completion.into_content() {
            Some(summary) => Ok(summary),
            None => {
                tracing::warn!(%body, "{LABEL}: no usable content in completion; using fallback summary");
                Ok(fallback_summary(raw_metar))
            },
        }
    }
}
