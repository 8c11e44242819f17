//! Candidate query handed to a content source.

use serde::{Deserialize, Serialize};

use crate::config::{ContentKind, GenerationConfig, Mode, StockStatus};
use crate::ItemId;

/// Which items a content source should return, in its own order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentQuery {
    pub mode: Mode,
    /// Max items returned; not applied to single-item lookups
    pub limit: usize,
    pub category_id: Option<u64>,
    pub item_id: Option<ItemId>,
    pub content_kind: ContentKind,
    /// Only applied to reviewable content
    pub stock_status: StockStatus,
}

impl From<&GenerationConfig> for ContentQuery {
    fn from(config: &GenerationConfig) -> Self {
        let stock_status = match config.content_kind {
            ContentKind::Reviewable => config.stock_status,
            ContentKind::Generic => StockStatus::Any,
        };

        Self {
            mode: config.mode,
            limit: config.item_limit,
            category_id: config.category_id,
            item_id: config.override_target(),
            content_kind: config.content_kind,
            stock_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_filter_only_for_reviewable() {
        let config = GenerationConfig {
            stock_status: StockStatus::InStock,
            ..Default::default()
        };
        assert_eq!(ContentQuery::from(&config).stock_status, StockStatus::Any);

        let config = GenerationConfig {
            content_kind: ContentKind::Reviewable,
            ..config
        };
        assert_eq!(
            ContentQuery::from(&config).stock_status,
            StockStatus::InStock
        );
    }

    #[test]
    fn test_single_item_query_carries_target() {
        let config = GenerationConfig::default().single_item(77);
        let query = ContentQuery::from(&config);

        assert_eq!(query.mode, Mode::SingleItem);
        assert_eq!(query.item_id, Some(77));
    }
}
