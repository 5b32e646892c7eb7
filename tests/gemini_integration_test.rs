//! 実APIを使う結合テスト（GEMINI_API_KEY 未設定ならスキップ）

use caption_review::gemini::{GeminiClient, HttpTransport};
use caption_review::judge::JudgeClient;
use caption_review_common::BenchmarkCategory;

fn api_key() -> Option<String> {
    match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Some(key),
        _ => {
            eprintln!("GEMINI_API_KEY not set; skipping integration test");
            None
        }
    }
}

#[tokio::test]
async fn gemini_evaluate_integration() {
    let Some(key) = api_key() else { return };
    let judge = JudgeClient::new(GeminiClient::new(HttpTransport::new(), key, "gemini-2.5-flash"));

    let verdict = judge
        .evaluate(
            BenchmarkCategory::Reasoning,
            "If all bloops are razzies and all razzies are lazzies, are all bloops lazzies?",
            "Yes. The relation is transitive, so every bloop is a lazzie.",
            None,
        )
        .await
        .expect("evaluation failed");

    assert!((1.0..=5.0).contains(&verdict.score));
    assert!(!verdict.reasoning.is_empty());
}

#[tokio::test]
async fn gemini_challenge_integration() {
    let Some(key) = api_key() else { return };
    let judge = JudgeClient::new(GeminiClient::new(HttpTransport::new(), key, "gemini-2.5-flash"));

    let challenge = judge
        .request_challenge(BenchmarkCategory::Coding)
        .await
        .expect("challenge generation failed");
    assert!(!challenge.trim().is_empty());
}
