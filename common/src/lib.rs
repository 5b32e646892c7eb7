//! Caption Review Common Library
//!
//! 審査パイプラインとベンチマーク審査で共有される型とユーティリティ

pub mod types;
pub mod category;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod stats;

pub use types::{
    DetectedObject, DetectionResult, EvaluationVerdict, ImageMetadata, ItemStatus, PipelineItem,
    Source,
};
pub use category::{BenchmarkCategory, CategoryInfo, PromptType, CATEGORIES};
pub use error::{Error, Result};
pub use parser::{parse_verdict, strip_json_fence};
pub use stats::{compute, format_uptime, AggregateStats};
