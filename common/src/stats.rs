//! 集計モジュール
//!
//! アイテム一覧から件数・承認率・平均処理時間を算出する。
//! 副作用のない純関数のみ。

use crate::types::{ItemStatus, PipelineItem};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 処理時間が1件も記録されていない場合の平均処理時間（ms）
pub const DEFAULT_AVG_PROCESSING_MS: f64 = 1850.0;

/// 集計スナップショット
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub failed: usize,
    pub processing: usize,
    /// approved / total（total == 0 のときは 0）
    pub approval_rate: f64,
    pub avg_processing_time_ms: f64,
    pub uptime: String,
}

impl AggregateStats {
    /// 状態別の件数
    pub fn count(&self, status: ItemStatus) -> usize {
        match status {
            ItemStatus::Pending => self.pending,
            ItemStatus::Approved => self.approved,
            ItemStatus::Rejected => self.rejected,
            ItemStatus::Failed => self.failed,
            ItemStatus::Processing => self.processing,
        }
    }
}

/// アイテム一覧から集計を算出
///
/// 並び順に依存しない（和は整数で取る）。
pub fn compute(items: &[PipelineItem], uptime: Duration) -> AggregateStats {
    let mut stats = AggregateStats {
        total: items.len(),
        uptime: format_uptime(uptime),
        ..Default::default()
    };

    let mut duration_sum: u64 = 0;
    let mut duration_count: u64 = 0;

    for item in items {
        match item.status {
            ItemStatus::Pending => stats.pending += 1,
            ItemStatus::Approved => stats.approved += 1,
            ItemStatus::Rejected => stats.rejected += 1,
            ItemStatus::Failed => stats.failed += 1,
            ItemStatus::Processing => stats.processing += 1,
        }
        if let Some(ms) = item.processing_time_ms {
            duration_sum = duration_sum.saturating_add(ms);
            duration_count += 1;
        }
    }

    stats.approval_rate = if stats.total > 0 {
        stats.approved as f64 / stats.total as f64
    } else {
        0.0
    };

    stats.avg_processing_time_ms = if duration_count > 0 {
        duration_sum as f64 / duration_count as f64
    } else {
        DEFAULT_AVG_PROCESSING_MS
    };

    stats
}

/// 稼働時間を "2d 4h 12m" 形式に整形
pub fn format_uptime(uptime: Duration) -> String {
    let total_minutes = uptime.as_secs() / 60;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageMetadata, Source};
    use chrono::Utc;

    fn item(id: &str, status: ItemStatus, ms: Option<u64>) -> PipelineItem {
        PipelineItem {
            id: id.to_string(),
            file_name: format!("{}.jpg", id),
            file_path: format!("/input/{}.jpg", id),
            thumbnail_url: String::new(),
            status,
            timestamp: Utc::now(),
            description: String::new(),
            metadata: ImageMetadata::default(),
            detection: None,
            processing_time_ms: ms,
            source: Source::LocalModel,
        }
    }

    // =============================================
    // compute テスト
    // =============================================

    #[test]
    fn test_compute_empty() {
        let stats = compute(&[], Duration::ZERO);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.approval_rate, 0.0);
        assert_eq!(stats.avg_processing_time_ms, DEFAULT_AVG_PROCESSING_MS);
    }

    #[test]
    fn test_compute_counts_per_status() {
        let items = vec![
            item("a", ItemStatus::Pending, None),
            item("b", ItemStatus::Approved, None),
            item("c", ItemStatus::Approved, None),
            item("d", ItemStatus::Rejected, None),
            item("e", ItemStatus::Failed, None),
            item("f", ItemStatus::Processing, None),
        ];
        let stats = compute(&items, Duration::ZERO);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.approved, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.processing, 1);
        assert_eq!(stats.count(ItemStatus::Approved), 2);
        assert!((stats.approval_rate - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_average_ignores_missing_durations() {
        let items = vec![
            item("a", ItemStatus::Pending, Some(1000)),
            item("b", ItemStatus::Pending, Some(2000)),
            item("c", ItemStatus::Pending, None),
        ];
        let stats = compute(&items, Duration::ZERO);
        assert_eq!(stats.avg_processing_time_ms, 1500.0);
    }

    #[test]
    fn test_compute_order_independent() {
        let mut items = vec![
            item("a", ItemStatus::Pending, Some(1201)),
            item("b", ItemStatus::Approved, Some(3187)),
            item("c", ItemStatus::Rejected, Some(2333)),
            item("d", ItemStatus::Failed, None),
        ];
        let uptime = Duration::from_secs(3600);
        let forward = compute(&items, uptime);
        items.reverse();
        let reversed = compute(&items, uptime);
        items.rotate_left(1);
        let rotated = compute(&items, uptime);

        assert_eq!(forward, reversed);
        assert_eq!(forward, rotated);
        assert_eq!(forward, compute(&items, uptime));
    }

    // =============================================
    // format_uptime テスト
    // =============================================

    #[test]
    fn test_format_uptime_days() {
        let uptime = Duration::from_secs(2 * 86_400 + 4 * 3600 + 12 * 60 + 59);
        assert_eq!(format_uptime(uptime), "2d 4h 12m");
    }

    #[test]
    fn test_format_uptime_hours_and_minutes() {
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 5 * 60)), "3h 5m");
        assert_eq!(format_uptime(Duration::from_secs(59)), "0m");
    }
}
