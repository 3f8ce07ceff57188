//! Gemini REST client.

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::dto::{Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::domain::entities::{Message, UserProfile};
use crate::domain::errors::{AuthError, EngineError};
use crate::domain::ports::{ChatEnginePort, ChatTurnRequest};
use crate::infrastructure::config::EngineConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_RETRY_AFTER_MS: u64 = 5000;

/// Conversational engine backed by the Gemini `generateContent` endpoint.
pub struct GeminiChatClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiChatClient {
    /// Creates client from endpoint configuration.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .user_agent(concat!("luci/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ChatEnginePort for GeminiChatClient {
    async fn reply(&self, request: &ChatTurnRequest) -> Result<Message, EngineError> {
        let body = build_request(&request.profile, &request.history);

        debug!(
            model = %self.model,
            turns = body.contents.len(),
            "Sending chat turn to Gemini"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, request.credential.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach Gemini API");
                if e.is_timeout() {
                    EngineError::network("request timed out")
                } else if e.is_connect() {
                    EngineError::network("failed to connect to Gemini")
                } else {
                    EngineError::network(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1000));
            let body = response.text().await.unwrap_or_default();
            let err = classify_error(status, &body, retry_after_ms);
            warn!(status = %status, error = %err, "Gemini API returned an error");
            return Err(err);
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse Gemini response");
            EngineError::invalid_response(format!("failed to parse response: {e}"))
        })?;

        let text = extract_reply(parsed)?;
        debug!(chars = text.len(), "Received reply from Gemini");

        Ok(Message::model(text))
    }
}

/// Builds the system instruction that gives the companion its persona.
#[must_use]
pub fn system_instruction(profile: &UserProfile) -> String {
    let mut instruction = format!(
        "You are Luci, a warm and attentive AI companion. \
         You are talking with {name}. \
         Adopt a {personality} personality in every reply.",
        name = profile.name(),
        personality = profile.personality_preference().to_lowercase(),
    );

    if !profile.interests().is_empty() {
        let _ = write!(
            instruction,
            " {name} is interested in {interests}; bring these up naturally when it fits.",
            name = profile.name(),
            interests = profile.interests().join(", "),
        );
    }

    instruction.push_str(" Keep replies conversational and reasonably short.");
    instruction
}

pub(super) fn build_request(profile: &UserProfile, history: &[Message]) -> GenerateContentRequest {
    let contents = history
        .iter()
        .filter(|m| !m.content().trim().is_empty())
        .map(|m| Content::text(Some(m.role().as_str()), m.content()))
        .collect();

    GenerateContentRequest {
        system_instruction: Content::text(None, system_instruction(profile)),
        contents,
    }
}

pub(super) fn classify_error(
    status: StatusCode,
    body: &str,
    retry_after_ms: Option<u64>,
) -> EngineError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| match (envelope.error.status, envelope.error.message) {
            (Some(status), Some(message)) => Some(format!("{status}: {message}")),
            (None, Some(message)) => Some(message),
            (Some(status), None) => Some(status),
            (None, None) => None,
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AuthError::rejected(message).into(),
        StatusCode::BAD_REQUEST if body.contains("API_KEY_INVALID") => {
            AuthError::rejected(message).into()
        }
        StatusCode::TOO_MANY_REQUESTS => EngineError::RateLimited {
            retry_after_ms: retry_after_ms.unwrap_or(DEFAULT_RETRY_AFTER_MS),
        },
        s if s.is_server_error() => EngineError::network(message),
        _ => EngineError::unexpected(format!("unexpected response: {message}")),
    }
}

pub(super) fn extract_reply(response: GenerateContentResponse) -> Result<String, EngineError> {
    if response.candidates.is_empty() {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map_or_else(|| "no candidates returned".to_string(), |r| format!("prompt blocked: {r}"));
        return Err(EngineError::invalid_response(reason));
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(EngineError::invalid_response("candidate contained no text"));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn profile_with_interests() -> UserProfile {
        let mut profile = UserProfile::default();
        profile.rename("Mina");
        profile.set_personality_preference("Playful");
        profile.toggle_interest("Cooking");
        profile.toggle_interest("Art");
        profile
    }

    #[test]
    fn test_system_instruction_mentions_profile() {
        let instruction = system_instruction(&profile_with_interests());

        assert!(instruction.contains("Mina"));
        assert!(instruction.contains("playful"));
        assert!(instruction.contains("Cooking, Art"));
    }

    #[test]
    fn test_system_instruction_without_interests() {
        let instruction = system_instruction(&UserProfile::default());

        assert!(instruction.contains("User"));
        assert!(!instruction.contains("interested in"));
    }

    #[test]
    fn test_request_body_shape() {
        let history = vec![Message::user("hi"), Message::model("hey!"), Message::user("how are you?")];

        let body = serde_json::to_value(build_request(&profile_with_interests(), &history)).unwrap();

        assert!(body["systemInstruction"]["role"].is_null());
        assert!(
            body["systemInstruction"]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("Mina")
        );
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "how are you?");
    }

    #[test]
    fn test_request_skips_blank_messages() {
        let history = vec![Message::user("   "), Message::user("hello")];

        let body = build_request(&UserProfile::default(), &history);

        assert_eq!(body.contents.len(), 1);
    }

    #[test_case(StatusCode::UNAUTHORIZED, "" ; "unauthorized")]
    #[test_case(StatusCode::FORBIDDEN, r#"{"error":{"message":"denied","status":"PERMISSION_DENIED"}}"# ; "forbidden")]
    #[test_case(
        StatusCode::BAD_REQUEST,
        r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#
        ; "invalid key"
    )]
    fn test_auth_statuses_classified_as_auth(status: StatusCode, body: &str) {
        assert!(classify_error(status, body, None).is_auth_failure());
    }

    #[test]
    fn test_plain_bad_request_is_not_auth() {
        let body = r#"{"error":{"message":"bad contents","status":"INVALID_ARGUMENT"}}"#;

        let err = classify_error(StatusCode::BAD_REQUEST, body, None);

        assert!(!err.is_auth_failure());
        assert!(err.to_string().contains("INVALID_ARGUMENT: bad contents"));
    }

    #[test]
    fn test_rate_limit_uses_retry_after() {
        let err = classify_error(StatusCode::TOO_MANY_REQUESTS, "", Some(2000));
        assert!(matches!(err, EngineError::RateLimited { retry_after_ms: 2000 }));

        let err = classify_error(StatusCode::TOO_MANY_REQUESTS, "", None);
        assert!(matches!(
            err,
            EngineError::RateLimited {
                retry_after_ms: DEFAULT_RETRY_AFTER_MS
            }
        ));
    }

    #[test_case(StatusCode::INTERNAL_SERVER_ERROR ; "internal")]
    #[test_case(StatusCode::SERVICE_UNAVAILABLE ; "unavailable")]
    fn test_server_errors_are_network(status: StatusCode) {
        assert!(classify_error(status, "oops", None).is_network_error());
    }

    #[test]
    fn test_extract_reply_joins_text_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"there"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();

        assert_eq!(extract_reply(response).unwrap(), "Hello there");
    }

    #[test]
    fn test_extract_reply_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();

        let err = extract_reply(response).unwrap_err();

        assert!(matches!(err, EngineError::InvalidResponse { .. }));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_endpoint_format() {
        let config = EngineConfig {
            base_url: "http://localhost:8080/v1beta/".to_string(),
            ..EngineConfig::default()
        };
        let client = GeminiChatClient::new(&config).unwrap();

        assert_eq!(
            client.endpoint(),
            format!("http://localhost:8080/v1beta/models/{}:generateContent", config.model)
        );
    }
}
