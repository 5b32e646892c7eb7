//! ベンチマークカテゴリ定義

use serde::{Deserialize, Serialize};
use std::fmt;

/// ベンチマークカテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BenchmarkCategory {
    Reasoning,
    Coding,
    #[serde(rename = "Vision-Language")]
    Vision,
    #[serde(rename = "General Language")]
    General,
    #[serde(rename = "Embedding Capability")]
    Embedding,
}

/// プロンプト種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptType {
    Text,
    Image,
}

/// カテゴリの表示情報
#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    pub category: BenchmarkCategory,
    pub label: &'static str,
    pub description: &'static str,
    pub metrics: &'static [&'static str],
    pub prompt_type: PromptType,
}

/// 全カテゴリ（表示順）
pub const CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo {
        category: BenchmarkCategory::Reasoning,
        label: "Reasoning",
        description: "Multi-hop logic, math word problems, and complex planning.",
        metrics: &["Accuracy", "Step Clarity", "Consistency"],
        prompt_type: PromptType::Text,
    },
    CategoryInfo {
        category: BenchmarkCategory::Coding,
        label: "Coding",
        description: "Code generation, debugging, and algorithmic explanation.",
        metrics: &["Correctness", "Efficiency", "Readability"],
        prompt_type: PromptType::Text,
    },
    CategoryInfo {
        category: BenchmarkCategory::Vision,
        label: "Vision",
        description: "Image description and visual reasoning.",
        metrics: &["Accuracy", "Interpretation Depth", "Alignment"],
        prompt_type: PromptType::Image,
    },
    CategoryInfo {
        category: BenchmarkCategory::General,
        label: "General Lang",
        description: "Fluency, creative writing, and summarization.",
        metrics: &["Fluency", "Coherence", "Creativity"],
        prompt_type: PromptType::Text,
    },
    CategoryInfo {
        category: BenchmarkCategory::Embedding,
        label: "Embedding",
        description: "Semantic similarity and retrieval relevance checks.",
        metrics: &["Relevance", "Discrimination", "Semantic Grasp"],
        prompt_type: PromptType::Text,
    },
];

impl BenchmarkCategory {
    /// Judgeに渡すカテゴリ名
    pub fn name(&self) -> &'static str {
        match self {
            BenchmarkCategory::Reasoning => "Reasoning",
            BenchmarkCategory::Coding => "Coding",
            BenchmarkCategory::Vision => "Vision-Language",
            BenchmarkCategory::General => "General Language",
            BenchmarkCategory::Embedding => "Embedding Capability",
        }
    }

    pub fn info(&self) -> &'static CategoryInfo {
        // CATEGORIES は全バリアントを網羅している
        CATEGORIES
            .iter()
            .find(|c| c.category == *self)
            .unwrap_or(&CATEGORIES[0])
    }

    /// 画像を扱うカテゴリか
    pub fn is_vision(&self) -> bool {
        self.info().prompt_type == PromptType::Image
    }
}

impl fmt::Display for BenchmarkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
