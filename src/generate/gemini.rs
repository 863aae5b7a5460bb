//! Google Gemini `generateContent` over blocking HTTP.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProviderError, TextProvider};

const API_KEY_ENV: &str = "GEMINI_API_KEY";
const MODEL_ENV: &str = "GEMINI_MODEL";
const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f32 = 0.7;
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProviderError> {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = present(API_KEY_ENV).ok_or(ProviderError::MissingKey)?;
        let mut config = Self::new(api_key);
        if let Some(model) = present(MODEL_ENV) {
            config.model = model;
        }
        if let Some(base_url) = present(BASE_URL_ENV) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

pub struct GeminiProvider {
    config: GeminiConfig,
    client: reqwest::blocking::Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(GeminiConfig::from_env()?)
    }
}

impl TextProvider for GeminiProvider {
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let body = serde_json::to_string(&request_body(prompt, max_tokens))?;
        debug!(model = %self.config.model, max_tokens, "calling gemini");

        let response = self
            .client
            .post(self.config.endpoint())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.config.api_key)
            .body(body)
            .send()
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        extract_text(&serde_json::from_str::<GenerateResponse>(&text)?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

fn request_body(prompt: &str, max_tokens: u32) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: max_tokens,
            temperature: TEMPERATURE,
        },
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

fn extract_text(response: &GenerateResponse) -> Result<String, ProviderError> {
    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_the_api_shape() {
        let json = serde_json::to_value(request_body("Write.", 4000)).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Write.");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 4000);
        assert!(json["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn joins_the_first_candidates_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[
                {"content":{"parts":[{"text":"Once "},{"text":"upon a tide."}]}},
                {"content":{"parts":[{"text":"ignored"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response).unwrap(), "Once upon a tide.");
    }

    #[test]
    fn missing_candidates_are_empty_responses() {
        let response: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert!(matches!(extract_text(&response), Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn config_reads_overrides_and_requires_a_key() {
        let config = GeminiConfig::from_lookup(|name| match name {
            API_KEY_ENV => Some("k".into()),
            BASE_URL_ENV => Some("http://localhost:8080/".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(!config.endpoint().contains("key="));

        let missing = GeminiConfig::from_lookup(|_| Some("  ".into()));
        assert!(matches!(missing, Err(ProviderError::MissingKey)));
    }

    #[test]
    fn transport_errors_do_not_leak_the_key() {
        let config = GeminiConfig {
            base_url: "http://127.0.0.1:1".into(),
            timeout: Duration::from_secs(5),
            ..GeminiConfig::new("SECRET-KEY-123")
        };
        let provider = GeminiProvider::new(config).unwrap();

        let err = provider.generate("Write.", 10).unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)), "{err}");
        assert!(!err.to_string().contains("SECRET-KEY-123"), "{err}");
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }
}
