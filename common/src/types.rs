//! パイプライン・審査の型定義
//!
//! CLIと審査ロジックで共有される型:
//! - PipelineItem: 審査キューの1件（画像1枚）
//! - ItemStatus / Source: ライフサイクル状態と説明文の出所
//! - EvaluationVerdict: Judgeが返す採点結果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// パイプラインアイテムの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Approved,
    Rejected,
    Failed,
    Processing,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 5] = [
        ItemStatus::Pending,
        ItemStatus::Approved,
        ItemStatus::Rejected,
        ItemStatus::Failed,
        ItemStatus::Processing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Approved => "approved",
            ItemStatus::Rejected => "rejected",
            ItemStatus::Failed => "failed",
            ItemStatus::Processing => "processing",
        }
    }

    /// これ以上遷移しない状態か
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ItemStatus::Approved | ItemStatus::Rejected | ItemStatus::Failed
        )
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 説明文の出所
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// ローカルモデル（Ollama）が生成
    LocalModel,
    /// クラウド備援（Gemini）が生成
    CloudFallback,
    /// 審査者が手動で編集
    Manual,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Source::LocalModel => "local-model",
            Source::CloudFallback => "cloud-fallback",
            Source::Manual => "manual",
        };
        f.write_str(label)
    }
}

/// 画像メタデータ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,
}

/// 検出された物体（矩形 + ラベル + 信頼度）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedObject {
    #[serde(rename = "box_2d")]
    pub box_2d: [u32; 4],
    pub label: String,
    /// 0.0〜1.0
    pub confidence: f64,
}

/// 物体検出モデルの生出力
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub model: String,
    pub objects: Vec<DetectedObject>,
}

/// 審査キューのアイテム
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineItem {
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    pub thumbnail_url: String,
    pub status: ItemStatus,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub metadata: ImageMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<DetectionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
    pub source: Source,
}

impl PipelineItem {
    /// 検出結果のうち最も高い信頼度
    pub fn max_confidence(&self) -> Option<f64> {
        self.detection
            .as_ref()?
            .objects
            .iter()
            .map(|o| o.confidence)
            .fold(None, |acc, c| match acc {
                Some(m) if m >= c => Some(m),
                _ => Some(c),
            })
    }

    /// 信頼度がしきい値以上か（表示用の目安。自動承認には使わない）
    pub fn is_high_confidence(&self, threshold: f64) -> bool {
        self.max_confidence().is_some_and(|c| c >= threshold)
    }
}

/// Judgeの採点結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationVerdict {
    /// 1〜5
    pub score: f64,
    pub reasoning: String,
    /// サブ指標名 → スコア
    pub breakdown: BTreeMap<String, f64>,
}
