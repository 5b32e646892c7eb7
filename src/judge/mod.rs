//! ベンチマーク審査（LLM-as-a-Judge）
//!
//! - request_challenge: カテゴリ別のテスト問題を生成
//! - evaluate: 問題と回答（Visionは画像も）をJudgeに渡し、採点結果を得る

pub mod scoreboard;

use crate::error::{ReviewError, Result};
use crate::gemini::{Content, GeminiClient, GeminiRequest, GeminiTransport, GenerationConfig, Part};
use caption_review_common::prompts::{
    build_challenge_prompt, build_evaluation_text, build_judge_instruction,
    CHALLENGE_SYSTEM_INSTRUCTION, FALLBACK_CHALLENGE,
};
use caption_review_common::{parse_verdict, BenchmarkCategory, EvaluationVerdict};
use serde_json::json;
use tracing::{info, warn};

pub use scoreboard::{RadarPoint, Scoreboard};

const CHALLENGE_TEMPERATURE: f32 = 0.9;

/// 評価レスポンスのスキーマ
pub fn evaluation_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": {
                "type": "NUMBER",
                "description": "A score from 1 to 5, where 5 is perfect performance."
            },
            "reasoning": {
                "type": "STRING",
                "description": "A concise explanation of why this score was given, citing specific strengths or errors."
            },
            "breakdown": {
                "type": "OBJECT",
                "description": "Key-value pairs of specific metrics and their scores (1-5).",
                "properties": {
                    "accuracy": { "type": "NUMBER" },
                    "clarity": { "type": "NUMBER" },
                    "creativity": { "type": "NUMBER" },
                    "completeness": { "type": "NUMBER" }
                }
            }
        },
        "required": ["score", "reasoning", "breakdown"]
    })
}

pub struct JudgeClient<T> {
    client: GeminiClient<T>,
}

impl<T: GeminiTransport> JudgeClient<T> {
    pub fn new(client: GeminiClient<T>) -> Self {
        Self { client }
    }

    pub fn gemini(&self) -> &GeminiClient<T> {
        &self.client
    }

    /// テスト問題を生成
    ///
    /// 通信失敗・テキストなしは Upstream。
    pub async fn request_challenge(&self, category: BenchmarkCategory) -> Result<String> {
        let request = build_challenge_request(category);
        let text = self.client.generate(&request).await?;

        text.ok_or_else(|| ReviewError::Upstream("Empty response".into()))
    }

    /// テスト問題を生成（Upstreamのときは代替文を返す）
    pub async fn request_challenge_or_fallback(&self, category: BenchmarkCategory) -> Result<String> {
        match self.request_challenge(category).await {
            Ok(text) => Ok(text),
            Err(ReviewError::Upstream(reason)) => {
                warn!(%category, %reason, "challenge generation failed; using fallback");
                Ok(FALLBACK_CHALLENGE.to_string())
            }
            Err(e) => Err(e),
        }
    }

    /// 回答を採点
    ///
    /// JSONとして解釈できない・形が合わないレスポンスは Evaluation（再試行しない）。
    pub async fn evaluate(
        &self,
        category: BenchmarkCategory,
        test_case: &str,
        model_output: &str,
        image: Option<&[u8]>,
    ) -> Result<EvaluationVerdict> {
        let request = build_evaluation_request(category, test_case, model_output, image);
        let text = self
            .client
            .generate(&request)
            .await?
            .ok_or_else(|| ReviewError::Evaluation("Empty response".into()))?;

        let verdict = parse_verdict(&text).map_err(|e| ReviewError::Evaluation(e.to_string()))?;
        info!(%category, score = verdict.score, "submission evaluated");
        Ok(verdict)
    }
}

pub fn build_challenge_request(category: BenchmarkCategory) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content::text(build_challenge_prompt(category))],
        system_instruction: Some(Content::text(CHALLENGE_SYSTEM_INSTRUCTION)),
        generation_config: GenerationConfig {
            temperature: Some(CHALLENGE_TEMPERATURE),
            ..Default::default()
        },
    }
}

/// 評価リクエストを作成
///
/// Visionカテゴリかつ画像ありのときだけ画像パートを先頭に付ける。
/// それ以外（Visionでも画像なし）はテキストのみ。
pub fn build_evaluation_request(
    category: BenchmarkCategory,
    test_case: &str,
    model_output: &str,
    image: Option<&[u8]>,
) -> GeminiRequest {
    let image = image.filter(|_| category.is_vision());

    let mut parts = Vec::with_capacity(2);
    if let Some(bytes) = image {
        parts.push(Part::image(bytes));
    }
    parts.push(Part::Text {
        text: build_evaluation_text(test_case, model_output, image.is_some()),
    });

    GeminiRequest {
        contents: vec![Content { parts }],
        system_instruction: Some(Content::text(build_judge_instruction(category))),
        generation_config: GenerationConfig {
            response_mime_type: Some("application/json".into()),
            response_schema: Some(evaluation_schema()),
            ..Default::default()
        },
    }
}
