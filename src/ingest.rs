//! 取り込み時の説明文生成
//!
//! 取り込んだ画像（processing 状態）にローカルモデルで説明文を付ける。
//! ローカルモデルが使えず備援が有効なら Gemini で生成する。
//! 成功すると pending（審査待ち）、失敗すると failed になる。

use crate::caption::build_caption_request;
use crate::error::{ReviewError, Result};
use crate::gemini::{GeminiClient, GeminiTransport};
use crate::ollama::{OllamaClient, OllamaTransport};
use caption_review_common::{ItemStatus, PipelineItem, Source};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// 説明文ファイル名
pub const DESCRIPTION_FILE: &str = "description.zh-TW.md";
/// メタデータファイル名
pub const METADATA_FILE: &str = "metadata.json";

/// 生成結果
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub source: Source,
}

/// 取り込み結果の件数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub local: usize,
    pub fallback: usize,
    pub failed: usize,
}

pub struct IngestCaptioner<O, G> {
    local: OllamaClient<O>,
    fallback: Option<GeminiClient<G>>,
    prompt: String,
}

impl<O: OllamaTransport, G: GeminiTransport> IngestCaptioner<O, G> {
    /// `fallback` は use_gemini_fallback が有効なときだけ渡す
    pub fn new(
        local: OllamaClient<O>,
        fallback: Option<GeminiClient<G>>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            local,
            fallback,
            prompt: prompt.into(),
        }
    }

    pub fn local(&self) -> &OllamaClient<O> {
        &self.local
    }

    pub fn fallback(&self) -> Option<&GeminiClient<G>> {
        self.fallback.as_ref()
    }

    /// 1枚分の説明文を生成
    pub async fn describe(&self, image: Option<&[u8]>) -> Result<Caption> {
        let local_err = match self.local.generate(&self.prompt, image).await {
            Ok(text) => {
                return Ok(Caption {
                    text,
                    source: Source::LocalModel,
                })
            }
            Err(e) => e,
        };

        let Some(gemini) = &self.fallback else {
            return Err(local_err);
        };

        warn!(error = %local_err, "local model failed; switching to Gemini fallback");
        let request = build_caption_request(image, &self.prompt);
        match gemini.generate(&request).await? {
            Some(text) => Ok(Caption {
                text,
                source: Source::CloudFallback,
            }),
            None => Err(ReviewError::Upstream("Gemini備援も応答がありません".into())),
        }
    }

    /// processing 状態のアイテムに説明文を付ける
    ///
    /// 画像は `file_path` から読む。その他の状態のアイテムは触らない。
    pub async fn caption_items(&self, items: &mut [PipelineItem]) -> IngestSummary {
        let mut summary = IngestSummary::default();

        for item in items.iter_mut().filter(|i| i.status == ItemStatus::Processing) {
            let started = Instant::now();
            let result = match tokio::fs::read(&item.file_path).await {
                Ok(bytes) => self.describe(Some(&bytes)).await,
                Err(e) => Err(ReviewError::Io(e)),
            };

            match result {
                Ok(caption) => {
                    match caption.source {
                        Source::CloudFallback => summary.fallback += 1,
                        _ => summary.local += 1,
                    }
                    item.description = caption.text;
                    item.source = caption.source;
                    item.status = ItemStatus::Pending;
                    item.processing_time_ms = Some(started.elapsed().as_millis() as u64);
                    info!(id = %item.id, source = %item.source, "description generated");
                }
                Err(e) => {
                    summary.failed += 1;
                    item.status = ItemStatus::Failed;
                    warn!(id = %item.id, file = %item.file_name, error = %e, "description generation failed");
                }
            }
        }

        summary
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactMetadata<'a> {
    id: &'a str,
    original_filename: &'a str,
    timestamp: DateTime<Utc>,
    processing_time_ms: Option<u64>,
    model: &'a str,
    source: Source,
}

/// 生成済みアイテムの説明文とメタデータを `output_dir/<ファイル名の stem>/` に書き出す
///
/// 元画像は移動しない。
pub fn write_artifacts(item: &PipelineItem, model: &str, output_dir: &Path) -> Result<PathBuf> {
    let stem = Path::new(&item.file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| item.id.clone());
    let dir = output_dir.join(stem);
    std::fs::create_dir_all(&dir)?;

    let metadata = ArtifactMetadata {
        id: &item.id,
        original_filename: &item.file_name,
        timestamp: Utc::now(),
        processing_time_ms: item.processing_time_ms,
        model,
        source: item.source,
    };
    std::fs::write(dir.join(METADATA_FILE), serde_json::to_string_pretty(&metadata)?)?;
    std::fs::write(
        dir.join(DESCRIPTION_FILE),
        format!("# Image Description\n\n{}\n", item.description),
    )?;

    Ok(dir)
}
