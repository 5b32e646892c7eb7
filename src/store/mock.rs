//! デモ用のモックアイテム生成
//!
//! 先頭5件は pending、残りは状態を巡回させて割り当てる。

use caption_review_common::{
    DetectedObject, DetectionResult, ImageMetadata, ItemStatus, PipelineItem, Source,
};
use chrono::{Duration, Utc};

/// デモの既定件数
pub const DEFAULT_MOCK_COUNT: usize = 20;

const PENDING_HEAD: usize = 5;

const CYCLED_STATUSES: [ItemStatus; 4] = [
    ItemStatus::Pending,
    ItemStatus::Approved,
    ItemStatus::Rejected,
    ItemStatus::Failed,
];

pub fn generate_mock_items(count: usize) -> Vec<PipelineItem> {
    let now = Utc::now();
    let batch = now.timestamp_millis();

    (0..count)
        .map(|i| {
            let status = if i < PENDING_HEAD {
                ItemStatus::Pending
            } else {
                CYCLED_STATUSES[i % CYCLED_STATUSES.len()]
            };
            let file_name = format!("IMG_{}.jpg", 20240000 + i);

            PipelineItem {
                id: format!("task_{}_{}", batch, i),
                file_path: format!("/input/{}", file_name),
                file_name,
                thumbnail_url: format!("https://picsum.photos/400/300?random={}", i),
                status,
                timestamp: now - Duration::hours(i as i64),
                description: format!(
                    "這是一張由 Ollama 模型生成的範例描述。圖片包含了一些自然的風景和物體。 (Sample description {})",
                    i
                ),
                metadata: ImageMetadata {
                    width: 1920,
                    height: 1080,
                    camera_model: Some("Sony A7IV".into()),
                    iso: Some(100 * (i as u32 + 1)),
                },
                detection: Some(DetectionResult {
                    model: "llama3.2-vision".into(),
                    objects: vec![
                        DetectedObject {
                            box_2d: [100, 100, 200, 200],
                            label: "person".into(),
                            confidence: 0.95,
                        },
                        DetectedObject {
                            box_2d: [300, 300, 500, 500],
                            label: "car".into(),
                            confidence: 0.88,
                        },
                    ],
                }),
                // 1200〜3199ms に散らす
                processing_time_ms: Some(1200 + (i as u64 * 733) % 2000),
                source: Source::LocalModel,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_count_and_pending_head() {
        let items = generate_mock_items(DEFAULT_MOCK_COUNT);
        assert_eq!(items.len(), 20);
        assert!(items[..5].iter().all(|i| i.status == ItemStatus::Pending));
        assert!(items.iter().all(|i| i.source == Source::LocalModel));
    }

    #[test]
    fn test_ids_unique() {
        let items = generate_mock_items(DEFAULT_MOCK_COUNT);
        let ids: HashSet<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), items.len());
    }

    #[test]
    fn test_processing_time_range() {
        for item in generate_mock_items(50) {
            let ms = item.processing_time_ms.unwrap();
            assert!((1200..3200).contains(&ms));
        }
    }

    #[test]
    fn test_confidences_in_unit_range() {
        for item in generate_mock_items(3) {
            let detection = item.detection.unwrap();
            assert!(detection.objects.iter().all(|o| (0.0..=1.0).contains(&o.confidence)));
        }
    }

    #[test]
    fn test_zero_count() {
        assert!(generate_mock_items(0).is_empty());
    }
}
