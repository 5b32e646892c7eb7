//! Ollama API連携（ローカルモデル）
//!
//! `/api/generate` を非ストリーミングで呼ぶ。送信失敗は指数バックオフで再試行する。

use crate::error::{ReviewError, Result};
use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize)]
pub struct OllamaRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    /// base64画像
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl OllamaRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, image: Option<&[u8]>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            images: image
                .map(|bytes| vec![base64::engine::general_purpose::STANDARD.encode(bytes)])
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaResponse {
    #[serde(default)]
    pub response: String,
}

/// 送信層
#[async_trait]
pub trait OllamaTransport: Send + Sync {
    async fn generate(&self, request: &OllamaRequest) -> Result<OllamaResponse>;
}

/// reqwest による送信層
pub struct HttpOllama {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOllama {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReviewError::Config(format!("HTTPクライアントを作成できません: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl OllamaTransport for HttpOllama {
    async fn generate(&self, request: &OllamaRequest) -> Result<OllamaResponse> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ReviewError::Upstream(format!("Ollama接続エラー: {}", e)))?;

        if !response.status().is_success() {
            return Err(ReviewError::Upstream(format!(
                "Ollama API error: {}",
                response.status()
            )));
        }

        response
            .json::<OllamaResponse>()
            .await
            .map_err(|e| ReviewError::Upstream(format!("レスポンスの読み込みに失敗: {}", e)))
    }
}

/// 再試行設定
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 初回以外の試行回数
    pub retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        retries: 0,
        base_delay: Duration::ZERO,
    };

    /// `attempt` 回目（0始まり）の失敗後の待ち時間
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

pub struct OllamaClient<O> {
    transport: O,
    model: String,
    retry: RetryPolicy,
}

impl<O: OllamaTransport> OllamaClient<O> {
    pub fn new(transport: O, model: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            model: model.into(),
            retry,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn transport(&self) -> &O {
        &self.transport
    }

    /// 説明文を生成
    ///
    /// 送信失敗は再試行し、すべて失敗したら最後のエラー。空の応答は再試行せず Upstream。
    pub async fn generate(&self, prompt: &str, image: Option<&[u8]>) -> Result<String> {
        let request = OllamaRequest::new(self.model.as_str(), prompt, image);
        let attempts = self.retry.retries + 1;

        let mut attempt = 0;
        let response = loop {
            debug!(model = %self.model, attempt = attempt + 1, attempts, "ollama request");
            match self.transport.generate(&request).await {
                Ok(response) => break response,
                Err(e) if attempt + 1 < attempts => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(attempt = attempt + 1, attempts, error = %e, ?delay, "ollama call failed; retrying");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => {
                    warn!(attempts, error = %e, "ollama call failed");
                    return Err(e);
                }
            }
        };

        let text = response.response.trim();
        if text.is_empty() {
            return Err(ReviewError::Upstream("Empty response".into()));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialize_without_image() {
        let request = OllamaRequest::new("llama3.2-vision", "describe", None);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "llama3.2-vision");
        assert_eq!(json["stream"], false);
        assert!(json.get("images").is_none());
    }

    #[test]
    fn test_request_serialize_with_image() {
        let request = OllamaRequest::new("llava", "describe", Some(&b"abc"[..]));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["images"][0], "YWJj");
    }

    #[test]
    fn test_retry_delay_doubles() {
        let policy = RetryPolicy {
            retries: 3,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(RetryPolicy::NONE.delay_for(5), Duration::ZERO);
    }

    #[test]
    fn test_response_missing_field_defaults_empty() {
        let response: OllamaResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(response.response.is_empty());
    }
}
