//! HTTP text-generation provider over a chat-completions style API.

use serde_json::Value;
use ureq::Agent;

use crate::generation::{GenerationProvider, ProviderError, ProviderResult};
use std::time::Duration;

const USER_AGENT: &str = concat!("brainstash/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the HTTP provider.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Full completions endpoint URL.
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// Per-phase (connect/read/write) socket timeout. Callers align this
    /// with the gateway deadline; the gateway remains the hard bound.
    pub timeout_ms: u64,
}

/// `ureq`-backed provider issuing one blocking POST per generation call.
#[derive(Debug)]
pub struct HttpGenerationProvider {
    config: HttpProviderConfig,
    agent: Agent,
}

impl HttpGenerationProvider {
    pub fn new(config: HttpProviderConfig) -> ProviderResult<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(ProviderError::new("config_invalid", "endpoint must be set"));
        }
        if config.timeout_ms == 0 {
            return Err(ProviderError::new("config_invalid", "timeout must be > 0"));
        }

        let timeout = Duration::from_millis(config.timeout_ms.max(100));
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .user_agent(USER_AGENT)
            .build();

        Ok(Self { config, agent })
    }
}

impl GenerationProvider for HttpGenerationProvider {
    fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .agent
            .post(&self.config.endpoint)
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {}", self.config.api_key))
            .set("Accept", "application/json")
            .send_json(payload)
            .map_err(provider_error_from_ureq)?;

        let body: Value = serde_json::from_reader(response.into_reader())
            .map_err(|err| ProviderError::new("json_parse", err.to_string()))?;

        extract_reply(&body)
            .ok_or_else(|| ProviderError::new("empty_reply", "response carried no reply text"))
    }
}

fn extract_reply(body: &Value) -> Option<String> {
    let text = body
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?;
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

fn provider_error_from_ureq(err: ureq::Error) -> ProviderError {
    match err {
        ureq::Error::Status(status, response) => {
            let detail = response
                .into_string()
                .unwrap_or_else(|_| "unreadable error body".to_string());
            ProviderError::new("upstream_http", format!("status {status}: {detail}"))
        }
        ureq::Error::Transport(transport) => {
            ProviderError::new("transport", transport.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_reply, HttpGenerationProvider, HttpProviderConfig};

    fn config(endpoint: &str, timeout_ms: u64) -> HttpProviderConfig {
        HttpProviderConfig {
            endpoint: endpoint.to_string(),
            api_key: "key".to_string(),
            model: "test-model".to_string(),
            timeout_ms,
        }
    }

    #[test]
    fn rejects_blank_endpoint_and_zero_timeout() {
        let err = HttpGenerationProvider::new(config("  ", 1_000)).expect_err("blank endpoint");
        assert_eq!(err.code, "config_invalid");

        let err = HttpGenerationProvider::new(config("https://example.test/v1", 0))
            .expect_err("zero timeout");
        assert_eq!(err.code, "config_invalid");
    }

    #[test]
    fn extracts_first_choice_reply() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "hello there"}}]
        });
        assert_eq!(extract_reply(&body).as_deref(), Some("hello there"));

        let empty = serde_json::json!({"choices": []});
        assert_eq!(extract_reply(&empty), None);
    }
}
