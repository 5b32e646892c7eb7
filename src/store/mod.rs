//! アイテムストア
//!
//! 審査キューのアイテムを挿入順で保持する唯一の状態。
//! 読み出しは常にコピーを返し、更新は update_status のみ。

pub mod mock;

use crate::error::{ReviewError, Result};
use caption_review_common::{ItemStatus, PipelineItem, Source};
use tracing::debug;

/// 状態フィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ItemStatus),
}

impl StatusFilter {
    pub fn matches(&self, item: &PipelineItem) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => item.status == *status,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<PipelineItem>,
}

impl ItemStore {
    pub fn new(items: Vec<PipelineItem>) -> Self {
        Self { items }
    }

    /// 全アイテムのスナップショット（挿入順）
    pub fn list(&self) -> Vec<PipelineItem> {
        self.items.clone()
    }

    pub fn get(&self, id: &str) -> Option<PipelineItem> {
        self.items.iter().find(|i| i.id == id).cloned()
    }

    pub fn filter(&self, filter: StatusFilter) -> Vec<PipelineItem> {
        self.items
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 状態を更新
    ///
    /// - idが存在しなければ NotFound（ストアは変更しない）
    /// - 空でない説明文が渡されたときだけ説明文を差し替え、出所を Manual にする
    pub fn update_status(
        &mut self,
        id: &str,
        status: ItemStatus,
        description: Option<&str>,
    ) -> Result<PipelineItem> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ReviewError::NotFound(id.to_string()))?;

        item.status = status;
        if let Some(desc) = description.filter(|d| !d.is_empty()) {
            item.description = desc.to_string();
            item.source = Source::Manual;
        }

        debug!(id, status = %status, source = %item.source, "item status updated");
        Ok(item.clone())
    }
}
