//! 画像説明の再生成（クラウド備援）
//!
//! ローカルモデルの説明が不十分なときに Gemini で説明文を作り直す。
//! 結果はテキストを返すだけで、ストアへの反映は審査操作で行う。

use crate::error::{ReviewError, Result};
use crate::gemini::{Content, GeminiClient, GeminiRequest, GeminiTransport, GenerationConfig, Part};
use caption_review_common::prompts::{build_caption_text_only_prompt, FALLBACK_CAPTION};
use tracing::info;

const CAPTION_TEMPERATURE: f32 = 0.7;

pub struct Captioner<T> {
    client: GeminiClient<T>,
    enabled: bool,
}

impl<T: GeminiTransport> Captioner<T> {
    /// `enabled` は設定の use_gemini_fallback
    pub fn new(client: GeminiClient<T>, enabled: bool) -> Self {
        Self { client, enabled }
    }

    pub fn gemini(&self) -> &GeminiClient<T> {
        &self.client
    }

    /// 説明文を再生成
    pub async fn regenerate(&self, image: Option<&[u8]>, prompt: &str) -> Result<String> {
        if !self.enabled {
            return Err(ReviewError::Config(
                "Gemini備援が無効です（use_gemini_fallback = false）".into(),
            ));
        }

        let request = build_caption_request(image, prompt);
        let text = self.client.generate(&request).await?;

        info!(with_image = image.is_some(), generated = text.is_some(), "description regenerated");
        Ok(text.unwrap_or_else(|| FALLBACK_CAPTION.to_string()))
    }
}

/// 再生成リクエストを作成（画像がなければテキストのみの擬似解析）
pub fn build_caption_request(image: Option<&[u8]>, prompt: &str) -> GeminiRequest {
    let parts = match image {
        Some(bytes) => vec![
            Part::image(bytes),
            Part::Text {
                text: prompt.to_string(),
            },
        ],
        None => vec![Part::Text {
            text: build_caption_text_only_prompt(prompt),
        }],
    };

    GeminiRequest {
        contents: vec![Content { parts }],
        system_instruction: None,
        generation_config: GenerationConfig {
            temperature: Some(CAPTION_TEMPERATURE),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_request_with_image() {
        let request = build_caption_request(Some(&[0xFF, 0xD8, 0xFF][..]), "describe");
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert!(parts[0].is_inline_data());
        assert!(request.system_instruction.is_none());
    }

    #[test]
    fn test_caption_request_text_only() {
        let request = build_caption_request(None, "describe");
        let json = serde_json::to_value(&request).unwrap();
        let text = json["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("(Simulated Image Analysis) describe."));
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }
}
