//! Gemini API連携
//!
//! generateContent のリクエスト/レスポンス型と、差し替え可能な送信層（GeminiTransport）。
//! APIキーの確認は送信前に GeminiClient が行う。

use crate::error::{ReviewError, Result};
use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini APIリクエスト
#[derive(Debug, Clone, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

impl Part {
    /// 画像バイト列から inline_data パートを作る
    pub fn image(bytes: &[u8]) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: sniff_mime_type(bytes).to_string(),
                data: base64::engine::general_purpose::STANDARD.encode(bytes),
            },
        }
    }

    pub fn is_inline_data(&self) -> bool {
        matches!(self, Part::InlineData { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

/// Gemini APIレスポンス
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: ResponseContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GeminiResponse {
    /// 先頭候補のテキスト（空文字は None）
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// 画像のMIMEタイプを推定（不明ならjpeg扱い）
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::WebP) => "image/webp",
        Ok(image::ImageFormat::Gif) => "image/gif",
        _ => "image/jpeg",
    }
}

/// 送信層
#[async_trait]
pub trait GeminiTransport: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse>;
}

/// reqwest による送信層
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_base_url(GEMINI_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeminiTransport for HttpTransport {
    async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| ReviewError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::Upstream(format!("API error: {} {}", status, body)));
        }

        response
            .json::<GeminiResponse>()
            .await
            .map_err(|e| ReviewError::Upstream(format!("レスポンスの読み込みに失敗: {}", e)))
    }
}

/// APIキーとモデルを束ねたクライアント
pub struct GeminiClient<T> {
    transport: T,
    api_key: String,
    model: String,
}

impl<T: GeminiTransport> GeminiClient<T> {
    pub fn new(transport: T, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// リクエストを送信し、先頭候補のテキストを返す
    ///
    /// APIキーが空なら送信せずに MissingCredential。
    pub async fn generate(&self, request: &GeminiRequest) -> Result<Option<String>> {
        if self.api_key.trim().is_empty() {
            return Err(ReviewError::MissingCredential);
        }

        debug!(model = %self.model, parts = request.contents.iter().map(|c| c.parts.len()).sum::<usize>(), "gemini request");

        let response = self
            .transport
            .generate_content(&self.model, &self.api_key, request)
            .await
            .map_err(|e| {
                warn!(error = %e, "gemini call failed");
                e
            })?;

        Ok(response.first_text().map(str::to_string))
    }
}
