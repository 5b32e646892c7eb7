//! ベンチマーク結果の集計
//!
//! カテゴリごとに最新の採点結果を保持し、平均点とレーダーチャート用の点列を返す。

use crate::error::Result;
use caption_review_common::{BenchmarkCategory, EvaluationVerdict, CATEGORIES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::warn;

/// レーダーチャートの満点
pub const FULL_MARK: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPoint {
    pub subject: &'static str,
    pub score: f64,
    pub full_mark: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoreboard {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 対象モデル名
    pub model_name: String,
    results: BTreeMap<BenchmarkCategory, EvaluationVerdict>,
}

impl Scoreboard {
    const CURRENT_VERSION: u32 = 1;

    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            model_name: model_name.into(),
            results: BTreeMap::new(),
        }
    }

    /// 読み込み（存在しない・壊れている場合は空）
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader::<_, Scoreboard>(BufReader::new(file)) {
            Ok(board) if board.version == Self::CURRENT_VERSION => board,
            Ok(_) => {
                warn!(path = %path.display(), "スコアボードのバージョン不一致、作り直します");
                Self::default()
            }
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// 採点結果を記録（同じカテゴリは上書き）
    pub fn record(&mut self, category: BenchmarkCategory, verdict: EvaluationVerdict) {
        self.results.insert(category, verdict);
    }

    pub fn get(&self, category: BenchmarkCategory) -> Option<&EvaluationVerdict> {
        self.results.get(&category)
    }

    pub fn is_completed(&self, category: BenchmarkCategory) -> bool {
        self.results.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// 平均点（未実施のみなら 0）
    pub fn average_score(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.results.values().map(|v| v.score).sum();
        sum / self.results.len() as f64
    }

    /// レーダーチャート用の点列（カテゴリ表示順、未実施は 0）
    pub fn radar_points(&self) -> Vec<RadarPoint> {
        CATEGORIES
            .iter()
            .map(|info| RadarPoint {
                subject: info.label,
                score: self.get(info.category).map(|v| v.score).unwrap_or(0.0),
                full_mark: FULL_MARK,
            })
            .collect()
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new("My Local Model")
    }
}
