//! 審査操作（状態遷移）
//!
//! pending → approved / rejected のみをユーザー操作として提供する。
//! 終端状態への再適用は拒否しない（上書きされる）。

use crate::backend::MockBackend;
use crate::error::{ReviewError, Result};
use caption_review_common::{ItemStatus, PipelineItem};
use dialoguer::{Input, Select};
use tracing::warn;

/// 審査アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn target_status(&self) -> ItemStatus {
        match self {
            ReviewAction::Approve => ItemStatus::Approved,
            ReviewAction::Reject => ItemStatus::Rejected,
        }
    }
}

/// 審査を適用
///
/// 戻り値の更新後アイテムが唯一の正とする。
pub async fn apply_review(
    backend: &MockBackend,
    id: &str,
    action: ReviewAction,
    description: Option<&str>,
) -> Result<PipelineItem> {
    let updated = backend
        .update_item_status(id, action.target_status(), description)
        .await?;
    Ok(updated)
}

/// 既に終端状態のアイテムへ審査を適用する前の確認ログ
pub fn warn_if_terminal(item: &PipelineItem, action: ReviewAction) {
    if item.status.is_terminal() {
        warn!(
            id = %item.id,
            current = %item.status,
            target = %action.target_status(),
            "終端状態のアイテムを上書きします"
        );
    }
}

/// 対話アクション
pub enum SessionAction {
    /// そのまま承認
    Approve,
    /// 却下
    Reject,
    /// 説明を編集して承認
    EditAndApprove(String),
    /// Geminiで説明を再生成
    Regenerate,
    /// この項目をスキップ
    Skip,
    /// 終了
    Quit,
}

/// 対話式で1件分の操作を選択
pub fn prompt_session_action(item: &PipelineItem, can_regenerate: bool) -> Result<SessionAction> {
    let mut options = vec!["承認", "却下", "説明を編集して承認"];
    if can_regenerate {
        options.push("Geminiで再生成");
    }
    options.push("スキップ");
    options.push("終了");

    let selection = Select::new()
        .with_prompt("操作を選択")
        .items(&options[..])
        .default(0)
        .interact()
        .map_err(|e| ReviewError::Prompt(e.to_string()))?;

    let action = match options[selection] {
        "承認" => SessionAction::Approve,
        "却下" => SessionAction::Reject,
        "説明を編集して承認" => {
            let edited: String = Input::new()
                .with_prompt("説明")
                .with_initial_text(item.description.clone())
                .interact_text()
                .map_err(|e| ReviewError::Prompt(e.to_string()))?;
            SessionAction::EditAndApprove(edited)
        }
        "Geminiで再生成" => SessionAction::Regenerate,
        "スキップ" => SessionAction::Skip,
        _ => SessionAction::Quit,
    };
    Ok(action)
}
