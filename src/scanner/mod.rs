//! 監視フォルダの取り込み
//!
//! フォルダ直下の画像から processing 状態のアイテムを作る。
//! 説明文は空のまま。生成は ingest が行い、pending か failed に進める。

mod exif;

use crate::error::{ReviewError, Result};
use caption_review_common::{ImageMetadata, ItemStatus, PipelineItem, Source};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

/// パスから安定したIDを作る
pub fn item_id_for(path: &Path) -> String {
    let digest = Sha256::digest(path.to_string_lossy().as_bytes());
    format!("task_{}", &hex::encode(digest)[..16])
}

pub fn scan_folder(folder: &Path) -> Result<Vec<PipelineItem>> {
    if !folder.exists() {
        return Err(ReviewError::FolderNotFound(folder.display().to_string()));
    }

    let mut items = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_image = path
            .extension()
            .map(|ext| is_image_extension(&ext.to_string_lossy()))
            .unwrap_or(false);
        if !is_image {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let (width, height) = match image::image_dimensions(path) {
            Ok(dims) => dims,
            Err(e) => {
                warn!(file = %file_name, error = %e, "画像サイズを取得できません");
                (0, 0)
            }
        };
        let camera = exif::extract_camera_info(path).unwrap_or_default();

        let timestamp = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(Utc::now);

        debug!(file = %file_name, width, height, "image ingested");

        items.push(PipelineItem {
            id: item_id_for(path),
            file_path: path.display().to_string(),
            thumbnail_url: format!("file://{}", path.display()),
            file_name,
            status: ItemStatus::Processing,
            timestamp,
            description: String::new(),
            metadata: ImageMetadata {
                width,
                height,
                camera_model: camera.camera_model,
                iso: camera.iso,
            },
            detection: None,
            processing_time_ms: None,
            // 担当はローカルモデル。備援で生成されたら ingest が書き換える
            source: Source::LocalModel,
        });
    }

    // ファイル名でソート
    items.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(items)
}
