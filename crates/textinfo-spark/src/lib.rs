//! Signed-request client for the iFlytek Spark chat API
//!
//! Builds the HMAC-SHA256 signed URL the API expects, posts a fixed-shape
//! chat payload asking the model to structure a piece of Chinese text, and
//! unpacks the JSON-in-JSON response. One call per invocation, no retries,
//! no timeout. Credentials come from the environment (`SparkConfig`), never
//! from source.

use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use textinfo_core::{Result, SparkConfig, TextInfoError};

type HmacSha256 = Hmac<Sha256>;

/// API endpoint the signed URL is built around
const API_URL: &str = "https://spark-api.xf-yun.com/v3.1/chat";

/// Host named in the canonical signing string
const HOST: &str = "spark-api.xf-yun.com";

/// Request path named in the canonical signing string
const CHAT_PATH: &str = "/v3.1/chat";

/// RFC-1123 GMT timestamp layout
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

// ============================================================================
// Structured result
// ============================================================================

/// Fields the model is prompted to return
///
/// Missing keys default to empty; extra keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredInfo {
    #[serde(rename = "人物", default)]
    pub people: Vec<String>,

    #[serde(rename = "组织", default)]
    pub organizations: Vec<String>,

    #[serde(rename = "时间", default)]
    pub times: Vec<String>,

    #[serde(rename = "地点", default)]
    pub locations: Vec<String>,

    #[serde(rename = "事件", default)]
    pub event: String,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    header: RequestHeader,
    parameter: RequestParameter,
    payload: RequestPayload,
}

#[derive(Debug, Serialize)]
struct RequestHeader {
    app_id: String,
    uid: String,
}

#[derive(Debug, Serialize)]
struct RequestParameter {
    chat: ChatSettings,
}

#[derive(Debug, Serialize)]
struct ChatSettings {
    domain: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct RequestPayload {
    message: RequestMessage,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    text: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    payload: ResponsePayload,
}

#[derive(Debug, Deserialize)]
struct ResponsePayload {
    choices: ResponseChoices,
}

#[derive(Debug, Deserialize)]
struct ResponseChoices {
    text: Vec<ResponseText>,
}

#[derive(Debug, Deserialize)]
struct ResponseText {
    content: String,
}

// ============================================================================
// Client
// ============================================================================

/// Spark API client
pub struct SparkClient {
    client: Client,
    config: SparkConfig,
}

impl SparkClient {
    /// Create a client from an already-loaded configuration
    pub fn new(config: SparkConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create a client from `SPARK_*` environment variables
    pub fn from_env() -> Result<Self> {
        let config = SparkConfig::from_env().map_err(|e| TextInfoError::Config(e.to_string()))?;
        Ok(Self::new(config))
    }

    /// Build the signed URL for a given RFC-1123 timestamp
    ///
    /// Deterministic: the same credentials and timestamp always produce the
    /// same URL. The signature covers the canonical three-line string
    /// `host: .. / date: .. / GET /v3.1/chat HTTP/1.1`; the authorization
    /// descriptor wrapping it is base64-encoded into the query.
    pub fn auth_url_at(&self, date: &str) -> Result<String> {
        let signature_origin = format!("host: {HOST}\ndate: {date}\nGET {CHAT_PATH} HTTP/1.1");

        let mut mac = HmacSha256::new_from_slice(self.config.api_secret.as_bytes())
            .map_err(|e| TextInfoError::SparkRequest(format!("invalid signing key: {e}")))?;
        mac.update(signature_origin.as_bytes());
        let signature = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        let descriptor = format!(
            "api_key=\"{}\", algorithm=\"hmac-sha256\", headers=\"host date request-line\", signature=\"{}\"",
            self.config.api_key, signature
        );
        let authorization = base64::engine::general_purpose::STANDARD.encode(descriptor.as_bytes());

        Ok(format!(
            "{API_URL}?authorization={authorization}&date={date}&host={HOST}"
        ))
    }

    /// Build the signed URL stamped with the current time
    pub fn auth_url(&self) -> Result<String> {
        let date = Utc::now().format(DATE_FORMAT).to_string();
        self.auth_url_at(&date)
    }

    /// Ask the model to structure `text` and unpack the nested response
    pub async fn extract_info(&self, text: &str) -> Result<StructuredInfo> {
        let url = self.auth_url()?;

        let request = ChatRequest {
            header: RequestHeader {
                app_id: self.config.app_id.clone(),
                uid: Uuid::new_v4().to_string(),
            },
            parameter: RequestParameter {
                chat: ChatSettings {
                    domain: self.config.chat_domain.clone(),
                    temperature: self.config.temperature,
                    max_tokens: self.config.max_tokens,
                },
            },
            payload: RequestPayload {
                message: RequestMessage {
                    text: vec![ChatMessage {
                        role: "user".to_string(),
                        content: build_prompt(text),
                    }],
                },
            },
        };

        tracing::debug!(chars = text.chars().count(), "sending Spark extraction request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| TextInfoError::SparkRequest(format!("request failed: {e}")))?;

        let raw = response.text().await.map_err(|e| {
            TextInfoError::SparkRequest(format!("failed to read response body: {e}"))
        })?;

        unpack_response(&raw)
    }
}

/// Build the extraction prompt around the caller's text
fn build_prompt(text: &str) -> String {
    format!(
        "请从以下文本中提取结构化信息（语言：中文）：\n文本：{text}\n\n要求返回JSON格式，包含以下字段：\n{{\n  \"人物\": [],\n  \"组织\": [],\n  \"时间\": [],\n  \"地点\": [],\n  \"事件\": \"\"\n}}"
    )
}

/// Pull `payload.choices.text[0].content` out of the envelope and parse it
/// as the structured JSON the prompt asked for
///
/// API-level error bodies carry no `payload`, so they land here too; the
/// returned error keeps the complete raw body next to the parse detail.
fn unpack_response(raw: &str) -> Result<StructuredInfo> {
    let envelope: ChatResponse = serde_json::from_str(raw).map_err(|e| parse_error(e, raw))?;

    let content = envelope
        .payload
        .choices
        .text
        .first()
        .map(|t| t.content.as_str())
        .ok_or_else(|| TextInfoError::SparkResponse {
            detail: "choices.text is empty".to_string(),
            raw: raw.to_string(),
        })?;

    serde_json::from_str(content).map_err(|e| parse_error(e, raw))
}

fn parse_error(e: serde_json::Error, raw: &str) -> TextInfoError {
    TextInfoError::SparkResponse {
        detail: e.to_string(),
        raw: raw.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_config() -> SparkConfig {
        SparkConfig {
            app_id: "test-app".to_string(),
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
            chat_domain: "generalv3".to_string(),
            temperature: 0.5,
            max_tokens: 1024,
        }
    }

    fn descriptor_from(url: &str) -> String {
        let encoded = url
            .split("authorization=")
            .nth(1)
            .and_then(|s| s.split('&').next())
            .unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_auth_url_is_deterministic() {
        let client = SparkClient::new(test_config());
        let date = "Mon, 01 Jan 2024 00:00:00 GMT";

        let first = client.auth_url_at(date).unwrap();
        let second = client.auth_url_at(date).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_auth_url_shape() {
        let client = SparkClient::new(test_config());
        let date = "Mon, 01 Jan 2024 00:00:00 GMT";

        let url = client.auth_url_at(date).unwrap();
        assert!(url.starts_with("https://spark-api.xf-yun.com/v3.1/chat?authorization="));
        assert!(url.contains(&format!("&date={date}")));
        assert!(url.ends_with("&host=spark-api.xf-yun.com"));
    }

    #[test]
    fn test_descriptor_names_key_and_algorithm() {
        let client = SparkClient::new(test_config());
        let url = client.auth_url_at("Mon, 01 Jan 2024 00:00:00 GMT").unwrap();

        let descriptor = descriptor_from(&url);
        assert!(descriptor.starts_with("api_key=\"test-key\", algorithm=\"hmac-sha256\""));
        assert!(descriptor.contains("headers=\"host date request-line\""));
    }

    #[test]
    fn test_signature_matches_manual_computation() {
        let client = SparkClient::new(test_config());
        let date = "Mon, 01 Jan 2024 00:00:00 GMT";
        let url = client.auth_url_at(date).unwrap();

        let origin = format!("host: spark-api.xf-yun.com\ndate: {date}\nGET /v3.1/chat HTTP/1.1");
        let mut mac = HmacSha256::new_from_slice(b"test-secret").unwrap();
        mac.update(origin.as_bytes());
        let expected = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        let descriptor = descriptor_from(&url);
        assert!(descriptor.ends_with(&format!("signature=\"{expected}\"")));
    }

    #[test]
    fn test_signature_changes_with_secret() {
        let date = "Mon, 01 Jan 2024 00:00:00 GMT";
        let first = SparkClient::new(test_config()).auth_url_at(date).unwrap();

        let mut config = test_config();
        config.api_secret = "test-secreT".to_string();
        let second = SparkClient::new(config).auth_url_at(date).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_date_format_is_rfc1123_gmt() {
        let moment = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            moment.format(DATE_FORMAT).to_string(),
            "Mon, 01 Jan 2024 00:00:00 GMT"
        );
    }

    #[test]
    fn test_prompt_embeds_text_verbatim() {
        let prompt = build_prompt("马云在杭州创立了阿里巴巴");
        assert!(prompt.contains("文本：马云在杭州创立了阿里巴巴"));
        for key in ["人物", "组织", "时间", "地点", "事件"] {
            assert!(prompt.contains(key));
        }
    }

    #[test]
    fn test_unpack_response_happy_path() {
        let content = r#"{"人物": ["马云"], "组织": ["阿里巴巴"], "时间": ["1999年"], "地点": ["杭州"], "事件": "创立公司"}"#;
        let raw = serde_json::json!({
            "header": {"code": 0},
            "payload": {"choices": {"text": [{"content": content}]}}
        })
        .to_string();

        let info = unpack_response(&raw).unwrap();
        assert_eq!(info.people, vec!["马云"]);
        assert_eq!(info.organizations, vec!["阿里巴巴"]);
        assert_eq!(info.locations, vec!["杭州"]);
        assert_eq!(info.event, "创立公司");
    }

    #[test]
    fn test_unpack_response_defaults_missing_fields() {
        let raw = serde_json::json!({
            "payload": {"choices": {"text": [{"content": r#"{"人物": ["鲁迅"]}"#}]}}
        })
        .to_string();

        let info = unpack_response(&raw).unwrap();
        assert_eq!(info.people, vec!["鲁迅"]);
        assert!(info.organizations.is_empty());
        assert!(info.event.is_empty());
    }

    #[test]
    fn test_unpack_api_error_body_keeps_raw() {
        let raw = r#"{"header":{"code":10013,"message":"input is invalid"}}"#;

        let err = unpack_response(raw).unwrap_err();
        match &err {
            TextInfoError::SparkResponse { raw: kept, .. } => assert_eq!(kept, raw),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("10013"));
    }

    #[test]
    fn test_unpack_non_json_content_keeps_raw() {
        let raw = serde_json::json!({
            "payload": {"choices": {"text": [{"content": "抱歉，我无法处理该请求。"}]}}
        })
        .to_string();

        let err = unpack_response(&raw).unwrap_err();
        assert!(matches!(err, TextInfoError::SparkResponse { .. }));
        assert!(err.to_string().contains("抱歉"));
    }

    #[test]
    fn test_unpack_empty_choices_is_an_error() {
        let raw = serde_json::json!({
            "payload": {"choices": {"text": []}}
        })
        .to_string();

        let err = unpack_response(&raw).unwrap_err();
        assert!(err.to_string().contains("choices.text is empty"));
    }
}
