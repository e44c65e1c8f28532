//! Gemini client for styling advice.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::{
    AssistantError, EMPTY_ANSWER, NOT_CONFIGURED_ANSWER, OFFLINE_ANSWER, Stylist,
    system_instruction,
};

/// Configuration for connecting to the Generative Language API.
#[derive(Clone)]
pub struct StylistConfig {
    /// API base URL, e.g. `"https://generativelanguage.googleapis.com"`.
    pub endpoint: String,

    /// Model name, e.g. `"gemini-3-flash-preview"`.
    pub model: String,

    /// API key; cleared from memory on drop.
    pub api_key: Option<Zeroizing<String>>,

    /// Request timeout.
    pub timeout: Duration,
}

impl StylistConfig {
    /// Create a configuration with a 20 second timeout.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key
                .filter(|key| !key.trim().is_empty())
                .map(Zeroizing::new),
            timeout: Duration::from_secs(20),
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }
}

impl Debug for StylistConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StylistConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for Gemini `generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiStylist {
    config: StylistConfig,
    http: Client,
}

impl GeminiStylist {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: StylistConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        Self { config, http }
    }

    /// Ask the model for advice.
    ///
    /// # Errors
    ///
    /// Returns an error when no key is configured, on HTTP failure, on a non-2xx response, or
    /// when the answer has no text.
    pub async fn try_advise(
        &self,
        query: &str,
        context: Option<&str>,
    ) -> Result<String, AssistantError> {
        let Some(api_key) = &self.config.api_key else {
            return Err(AssistantError::MissingApiKey);
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );

        let instruction = system_instruction(context);
        let body = GenerateContentRequest::new(query, &instruction);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key.as_str())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(AssistantError::UnexpectedResponse(format!(
                "generateContent failed with status {status}: {text}"
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;

        parsed.answer().ok_or(AssistantError::EmptyAnswer)
    }
}

#[async_trait]
impl Stylist for GeminiStylist {
    async fn advise(&self, query: String, context: Option<String>) -> String {
        match self.try_advise(&query, context.as_deref()).await {
            Ok(answer) => {
                debug!(model = %self.config.model, "styling advice received");

                answer
            }
            Err(error) => {
                warn!(model = %self.config.model, "styling assistant unavailable: {error}");

                fallback_answer(&error).to_string()
            }
        }
    }
}

/// Fixed answer shown for an assistant error.
pub fn fallback_answer(error: &AssistantError) -> &'static str {
    match error {
        AssistantError::MissingApiKey => NOT_CONFIGURED_ANSWER,
        AssistantError::EmptyAnswer => EMPTY_ANSWER,
        AssistantError::Http(_) | AssistantError::UnexpectedResponse(_) => OFFLINE_ANSWER,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
}

impl<'a> GenerateContentRequest<'a> {
    fn new(query: &'a str, instruction: &'a str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: instruction }],
            },
            contents: [Content {
                role: Some("user"),
                parts: vec![Part { text: query }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn answer(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        let trimmed = text.trim();

        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn request_body_carries_instruction_and_query() -> TestResult {
        let body = GenerateContentRequest::new("Which lining for a blazer?", "be brief");

        let json = serde_json::to_value(&body)?;

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "Which lining for a blazer?"
        );

        Ok(())
    }

    #[test]
    fn answer_joins_text_parts_of_first_candidate() -> TestResult {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Try satin "},{"text":"lining."}]}},
                              {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )?;

        assert_eq!(response.answer().as_deref(), Some("Try satin lining."));

        Ok(())
    }

    #[test]
    fn blank_or_missing_answers_are_none() -> TestResult {
        for raw in [
            r"{}",
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#,
        ] {
            let response: GenerateContentResponse = serde_json::from_str(raw)?;

            assert!(response.answer().is_none(), "expected no answer for {raw}");
        }

        Ok(())
    }

    #[test]
    fn fallbacks_match_error_kinds() {
        assert_eq!(
            fallback_answer(&AssistantError::MissingApiKey),
            NOT_CONFIGURED_ANSWER
        );
        assert_eq!(fallback_answer(&AssistantError::EmptyAnswer), EMPTY_ANSWER);
        assert_eq!(
            fallback_answer(&AssistantError::UnexpectedResponse("503".to_string())),
            OFFLINE_ANSWER
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = StylistConfig::new("http://localhost", "model", Some("secret".to_string()));

        let rendered = format!("{config:?}");

        assert!(!rendered.contains("secret"), "api key leaked: {rendered}");
        assert!(rendered.contains("<redacted>"), "missing marker: {rendered}");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = StylistConfig::new("http://localhost", "model", Some("  ".to_string()));

        assert!(config.api_key.is_none());
    }

    #[tokio::test]
    async fn missing_key_answers_with_fallback() {
        let stylist = GeminiStylist::new(StylistConfig::new("http://localhost", "model", None));

        let answer = stylist.advise("Suggest a fabric".to_string(), None).await;

        assert_eq!(answer, NOT_CONFIGURED_ANSWER);
    }

    #[tokio::test]
    async fn unreachable_endpoint_answers_offline() {
        let config = StylistConfig::new(
            "http://127.0.0.1:9",
            "model",
            Some("test-key".to_string()),
        )
        .with_timeout_seconds(2);

        let answer = GeminiStylist::new(config)
            .advise("Suggest a fabric".to_string(), Some("Shop".to_string()))
            .await;

        assert_eq!(answer, OFFLINE_ANSWER);
    }
}
