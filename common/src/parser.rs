//! APIレスポンスパーサー
//!
//! Judgeのレスポンス全体を JSON として EvaluationVerdict にパースする

use crate::error::{Error, Result};
use crate::types::EvaluationVerdict;

/// 採点の下限・上限
pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

/// ```json フェンスを外す
///
/// フェンスで始まるときだけ中身を返し、それ以外は前後の空白を除いた全文を返す。
/// 本文中の {...} を拾い出すことはしない。
///
/// # Examples
/// ```
/// use caption_review_common::strip_json_fence;
///
/// let response = "```json\n{\"score\": 4}\n```";
/// assert_eq!(strip_json_fence(response), "{\"score\": 4}");
/// assert_eq!(strip_json_fence("Result: {\"score\": 4}"), "Result: {\"score\": 4}");
/// ```
pub fn strip_json_fence(response: &str) -> &str {
    let trimmed = response.trim();
    trimmed
        .strip_prefix("```json")
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// 評価レスポンスをパース
///
/// レスポンス全体が JSON でなければ失敗する（フェンスのみ許容）。
/// score / reasoning / breakdown がすべて揃い、score が 1〜5 の範囲のときのみ成功する。
pub fn parse_verdict(response: &str) -> Result<EvaluationVerdict> {
    let verdict: EvaluationVerdict = serde_json::from_str(strip_json_fence(response))?;

    if !verdict.score.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&verdict.score) {
        return Err(Error::Parse(format!(
            "スコアが範囲外です: {} ({}〜{})",
            verdict.score, MIN_SCORE, MAX_SCORE
        )));
    }

    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // strip_json_fence テスト
    // =============================================

    #[test]
    fn test_strip_json_fence() {
        let response = "```json\n{\"score\": 3, \"reasoning\": \"ok\", \"breakdown\": {}}\n```";
        let json = strip_json_fence(response);
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
    }

    #[test]
    fn test_strip_json_fence_keeps_plain_text() {
        let response = r#"  {"score": 5, "reasoning": "perfect", "breakdown": {"accuracy": 5}}  "#;
        assert_eq!(strip_json_fence(response), response.trim());
        assert_eq!(strip_json_fence("not json"), "not json");
    }

    // =============================================
    // parse_verdict テスト
    // =============================================

    #[test]
    fn test_parse_verdict_success() {
        let response = r#"{"score": 4.5, "reasoning": "Accurate and concise.", "breakdown": {"accuracy": 5, "clarity": 4}}"#;
        let verdict = parse_verdict(response).unwrap();
        assert_eq!(verdict.score, 4.5);
        assert_eq!(verdict.reasoning, "Accurate and concise.");
        assert_eq!(verdict.breakdown.len(), 2);
        assert_eq!(verdict.breakdown["clarity"], 4.0);
    }

    #[test]
    fn test_parse_verdict_fenced() {
        let response = "```json\n{\"score\": 2, \"reasoning\": \"missed\", \"breakdown\": {}}\n```";
        let verdict = parse_verdict(response).unwrap();
        assert_eq!(verdict.score, 2.0);
    }

    #[test]
    fn test_parse_verdict_rejects_out_of_range_score() {
        let response = r#"{"score": 7, "reasoning": "too good", "breakdown": {}}"#;
        assert!(matches!(parse_verdict(response), Err(Error::Parse(_))));

        let response = r#"{"score": 0, "reasoning": "too bad", "breakdown": {}}"#;
        assert!(parse_verdict(response).is_err());
    }

    #[test]
    fn test_parse_verdict_rejects_wrong_shape() {
        let response = r#"{"rating": 4, "comment": "nice"}"#;
        assert!(matches!(parse_verdict(response), Err(Error::Json(_))));
    }

    /// 前後に文章が付いた JSON は受け付けない
    #[test]
    fn test_parse_verdict_rejects_prose_wrapped_json() {
        let response = r#"Sure! Here is my verdict: {"score": 4, "reasoning": "ok", "breakdown": {}} Hope this helps."#;
        assert!(matches!(parse_verdict(response), Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_verdict_rejects_unterminated_fence() {
        let response = "```json\n{\"score\": 4, \"reasoning\": \"ok\", \"breakdown\": {}}";
        assert!(parse_verdict(response).is_err());
    }

    #[test]
    fn test_parse_verdict_rejects_empty_object() {
        assert!(parse_verdict("{}").is_err());
    }
}
