//! モックバックエンド
//!
//! ItemStore を非同期APIとして公開する。各操作は擬似的な遅延のあと完了する。
//! 同時書き込みは想定しない（最後の書き込みが次の読み出しに反映される）。

use crate::error::Result;
use crate::store::{ItemStore, StatusFilter};
use caption_review_common::{compute, AggregateStats, ItemStatus, PipelineItem};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// 擬似遅延
#[derive(Debug, Clone, Copy)]
pub struct Latency {
    pub read: Duration,
    pub write: Duration,
}

impl Latency {
    pub const NONE: Latency = Latency {
        read: Duration::ZERO,
        write: Duration::ZERO,
    };
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            read: Duration::from_millis(500),
            write: Duration::from_millis(300),
        }
    }
}

pub struct MockBackend {
    store: Mutex<ItemStore>,
    latency: Latency,
    started_at: Instant,
}

impl MockBackend {
    pub fn new(store: ItemStore) -> Self {
        Self::with_latency(store, Latency::default())
    }

    pub fn with_latency(store: ItemStore, latency: Latency) -> Self {
        Self {
            store: Mutex::new(store),
            latency,
            started_at: Instant::now(),
        }
    }

    async fn simulate(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    pub async fn get_items(&self) -> Vec<PipelineItem> {
        self.simulate(self.latency.read).await;
        self.store.lock().await.list()
    }

    pub async fn get_items_filtered(&self, filter: StatusFilter) -> Vec<PipelineItem> {
        self.simulate(self.latency.read).await;
        self.store.lock().await.filter(filter)
    }

    pub async fn get_stats(&self) -> AggregateStats {
        let items = self.store.lock().await.list();
        compute(&items, self.started_at.elapsed())
    }

    pub async fn update_item_status(
        &self,
        id: &str,
        status: ItemStatus,
        description: Option<&str>,
    ) -> Result<PipelineItem> {
        self.simulate(self.latency.write).await;
        let result = self.store.lock().await.update_status(id, status, description);
        if let Err(e) = &result {
            debug!(id, error = %e, "update skipped");
        }
        result
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReviewError;
    use crate::store::mock::generate_mock_items;

    fn backend(count: usize) -> MockBackend {
        MockBackend::with_latency(ItemStore::new(generate_mock_items(count)), Latency::NONE)
    }

    #[tokio::test]
    async fn test_update_visible_to_next_read() {
        let backend = backend(6);
        let id = backend.get_items().await[0].id.clone();

        backend
            .update_item_status(&id, ItemStatus::Rejected, None)
            .await
            .unwrap();

        let items = backend.get_items().await;
        assert_eq!(items[0].status, ItemStatus::Rejected);
        let stats = backend.get_stats().await;
        assert_eq!(stats.pending, 4);
        // 6件目は approved
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.approved, 1);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let backend = backend(3);
        let before = backend.get_items().await;
        let result = backend
            .update_item_status("nope", ItemStatus::Approved, None)
            .await;
        assert!(matches!(result, Err(ReviewError::NotFound(_))));
        assert_eq!(backend.get_items().await, before);
    }

    #[tokio::test]
    async fn test_filtered_read() {
        let backend = backend(20);
        let pending = backend
            .get_items_filtered(StatusFilter::Only(ItemStatus::Pending))
            .await;
        assert!(pending.iter().all(|i| i.status == ItemStatus::Pending));
        assert!(pending.len() >= 5);
    }

    #[tokio::test]
    async fn test_latency_is_simulated() {
        let latency = Latency {
            read: Duration::from_millis(20),
            write: Duration::ZERO,
        };
        let backend = MockBackend::with_latency(ItemStore::new(generate_mock_items(1)), latency);
        let started = Instant::now();
        backend.get_items().await;
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
