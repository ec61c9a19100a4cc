//! OpenAI-compatible chat-completions client.
//!
//! Works against any endpoint speaking the `/v1/chat/completions` shape
//! (vLLM's OpenAI server being the benchmark's usual target). Requests are
//! blocking; concurrency comes from the runner's worker threads.

use std::time::Duration;

use serde_json::{json, Value};

use crate::infer::CompletionClient;
use crate::{Error, Result};

/// System prompt fixed by the benchmark protocol.
const SYSTEM_PROMPT: &str =
    "You are a medical electronic records expert. Return ONLY a compact JSON object per the rules.";

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiCompatClient {
    /// Create a client. `endpoint` is the API base (e.g.
    /// `http://127.0.0.1:8000/v1`); trailing slashes are tolerated.
    ///
    /// Defaults: 64 max tokens (the expected JSON is small), temperature 0
    /// for reproducible benchmarking, 120 s request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        Self::with_timeout(endpoint, api_key, model, Duration::from_secs(120))
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| Error::inference(format!("building HTTP client: {}", err)))?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 64,
            temperature: 0.0,
        })
    }

    /// Set the completion token budget.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    fn payload(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
            "response_format": { "type": "json_object" },
        })
    }
}

impl CompletionClient for OpenAiCompatClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(prompt))
            .send()
            .map_err(|err| Error::inference(format!("POST {}: {}", url, err)))?
            .error_for_status()
            .map_err(|err| Error::inference(err.to_string()))?;

        let body: Value = response
            .json()
            .map_err(|err| Error::inference(format!("decoding response: {}", err)))?;

        let content = body
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_normalized() {
        let client =
            OpenAiCompatClient::new("http://localhost:8000/v1/", "dummy", "test-model").unwrap();
        assert_eq!(client.endpoint, "http://localhost:8000/v1");
    }

    #[test]
    fn test_payload_shape() {
        let client = OpenAiCompatClient::new("http://localhost:8000/v1", "dummy", "test-model")
            .unwrap()
            .max_tokens(128)
            .temperature(0.2);
        let payload = client.payload("extract this");
        assert_eq!(payload["model"], "test-model");
        assert_eq!(payload["max_tokens"], 128);
        assert_eq!(payload["response_format"]["type"], "json_object");
        assert_eq!(payload["messages"][1]["content"], "extract this");
    }
}
