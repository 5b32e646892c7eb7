//! ダッシュボード
//!
//! バックエンドから取得したアイテム一覧と集計のスナップショットを保持する。
//! 一定間隔でポーリングして更新し、審査結果は更新後アイテムを正として反映する
//! （件数を先回りで加減しない）。

use crate::backend::MockBackend;
use crate::error::Result;
use crate::review::{apply_review, warn_if_terminal, ReviewAction};
use crate::store::StatusFilter;
use caption_review_common::{compute, AggregateStats, PipelineItem};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// 既定のポーリング間隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

pub struct Dashboard {
    backend: Arc<MockBackend>,
    items: Vec<PipelineItem>,
    stats: AggregateStats,
}

impl Dashboard {
    pub fn new(backend: Arc<MockBackend>) -> Self {
        Self {
            backend,
            items: Vec::new(),
            stats: AggregateStats::default(),
        }
    }

    pub fn items(&self) -> &[PipelineItem] {
        &self.items
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    pub fn filtered(&self, filter: StatusFilter) -> Vec<&PipelineItem> {
        self.items.iter().filter(|i| filter.matches(i)).collect()
    }

    /// 一覧と集計を取り直す
    pub async fn refresh(&mut self) {
        let (items, stats) = tokio::join!(self.backend.get_items(), self.backend.get_stats());
        debug!(total = items.len(), "dashboard refreshed");
        self.items = items;
        self.stats = stats;
    }

    /// 審査を適用し、成功時のみスナップショットへ反映
    pub async fn review(
        &mut self,
        id: &str,
        action: ReviewAction,
        description: Option<&str>,
    ) -> Result<PipelineItem> {
        if let Some(current) = self.items.iter().find(|i| i.id == id) {
            warn_if_terminal(current, action);
        }

        let updated = apply_review(&self.backend, id, action, description).await?;

        match self.items.iter_mut().find(|i| i.id == updated.id) {
            Some(slot) => {
                *slot = updated.clone();
                self.stats = compute(&self.items, self.backend.uptime());
            }
            // スナップショットにない（未取得など）ときは全体を取り直す
            None => self.refresh().await,
        }

        info!(id, status = %updated.status, "review applied");
        Ok(updated)
    }
}

/// 一定間隔で refresh し、そのたびに `on_refresh` を呼ぶ
///
/// 最初の更新は即時。`max_ticks` が None なら終わらない。`Some(0)` は何もしない。
pub async fn poll<F>(
    dashboard: &mut Dashboard,
    interval: Duration,
    max_ticks: Option<usize>,
    mut on_refresh: F,
) where
    F: FnMut(&Dashboard),
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ticks = 0usize;
    while max_ticks.map_or(true, |max| ticks < max) {
        ticker.tick().await;
        dashboard.refresh().await;
        on_refresh(dashboard);
        ticks += 1;
    }
}
