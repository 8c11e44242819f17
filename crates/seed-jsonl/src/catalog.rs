//! Content catalog backed by a JSONL file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use seed_core::{ContentKind, ContentQuery, ItemId, Mode, StockStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::JsonlError;

/// Kind of a catalog entry as written in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    #[default]
    Post,
    Product,
}

impl CatalogKind {
    pub fn content_kind(&self) -> ContentKind {
        match self {
            CatalogKind::Post => ContentKind::Generic,
            CatalogKind::Product => ContentKind::Reviewable,
        }
    }
}

/// One line of the catalog.
///
/// ```json
/// {"id": 12, "kind": "product", "categories": [3], "stock_status": "in_stock"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    #[serde(default)]
    pub kind: CatalogKind,
    #[serde(default)]
    pub categories: Vec<u64>,
    #[serde(default)]
    pub stock_status: StockStatus,
}

/// Content source reading candidate items from a JSONL catalog.
///
/// The whole catalog is loaded up front; queries preserve file order.
#[derive(Debug, Clone, Default)]
pub struct JsonlContentSource {
    items: Vec<CatalogItem>,
}

impl JsonlContentSource {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Load a catalog file. Blank lines are skipped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, JsonlError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let mut items = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let item: CatalogItem = serde_json::from_str(&line).map_err(|source| {
                JsonlError::CatalogLine {
                    line: index + 1,
                    source,
                }
            })?;
            items.push(item);
        }

        info!(
            "Loaded {} catalog item(s) from '{}'",
            items.len(),
            path.display()
        );
        Ok(Self { items })
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Item ids matching `query`, in catalog order.
    ///
    /// Single-item lookups return the target if the catalog has it, ignoring
    /// kind, category, stock and limit. Other modes filter by kind, category
    /// (by-category only) and stock status, then truncate to the limit.
    pub fn query(&self, query: &ContentQuery) -> Vec<ItemId> {
        if query.mode == Mode::SingleItem {
            return query
                .item_id
                .filter(|target| self.items.iter().any(|item| item.id == *target))
                .into_iter()
                .collect();
        }

        let ids: Vec<ItemId> = self
            .items
            .iter()
            .filter(|item| item.kind.content_kind() == query.content_kind)
            .filter(|item| match (query.mode, query.category_id) {
                (Mode::ByCategory, Some(category)) => item.categories.contains(&category),
                _ => true,
            })
            .filter(|item| query.stock_status.matches(item.stock_status))
            .map(|item| item.id)
            .take(query.limit)
            .collect();

        debug!("Catalog query {:?} matched {} item(s)", query.mode, ids.len());
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::GenerationConfig;
    use std::io::Write;
    use tempfile::TempDir;

    fn item(id: ItemId, kind: CatalogKind, categories: &[u64], stock: StockStatus) -> CatalogItem {
        CatalogItem {
            id,
            kind,
            categories: categories.to_vec(),
            stock_status: stock,
        }
    }

    fn catalog() -> JsonlContentSource {
        JsonlContentSource::new(vec![
            item(1, CatalogKind::Post, &[7], StockStatus::Any),
            item(2, CatalogKind::Product, &[7], StockStatus::InStock),
            item(3, CatalogKind::Post, &[8], StockStatus::Any),
            item(4, CatalogKind::Product, &[8], StockStatus::OutOfStock),
            item(5, CatalogKind::Post, &[7, 8], StockStatus::Any),
            item(6, CatalogKind::Product, &[7], StockStatus::InStock),
        ])
    }

    #[test]
    fn test_unrestricted_query_filters_kind_and_limit() {
        let config = GenerationConfig {
            item_limit: 2,
            ..Default::default()
        };

        assert_eq!(catalog().query(&ContentQuery::from(&config)), vec![1, 3]);
    }

    #[test]
    fn test_by_category_query() {
        let config = GenerationConfig::default().by_category(7);

        assert_eq!(catalog().query(&ContentQuery::from(&config)), vec![1, 5]);
    }

    #[test]
    fn test_reviewable_stock_filter() {
        let config = GenerationConfig {
            content_kind: ContentKind::Reviewable,
            stock_status: StockStatus::InStock,
            ..Default::default()
        };

        assert_eq!(catalog().query(&ContentQuery::from(&config)), vec![2, 6]);
    }

    #[test]
    fn test_single_item_bypasses_filters() {
        let config = GenerationConfig {
            content_kind: ContentKind::Reviewable,
            stock_status: StockStatus::InStock,
            item_limit: 1,
            ..Default::default()
        }
        .single_item(4);

        assert_eq!(catalog().query(&ContentQuery::from(&config)), vec![4]);

        let missing = GenerationConfig::default().single_item(99);
        assert!(catalog().query(&ContentQuery::from(&missing)).is_empty());
    }

    #[test]
    fn test_open_catalog_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("items.jsonl");
        let mut file = File::create(&path).unwrap();
        writeln!(file, r#"{{"id": 10, "kind": "post", "categories": [1]}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"id": 11, "kind": "product", "stock_status": "on_backorder"}}"#
        )
        .unwrap();
        drop(file);

        let source = JsonlContentSource::open(&path).unwrap();

        assert_eq!(source.items().len(), 2);
        assert_eq!(source.items()[1].stock_status, StockStatus::OnBackorder);
        assert!(source.items()[1].categories.is_empty());
    }

    #[test]
    fn test_open_reports_bad_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("items.jsonl");
        std::fs::write(&path, "{\"id\": 1}\nnot json\n").unwrap();

        let err = JsonlContentSource::open(&path).unwrap_err();
        assert!(matches!(err, JsonlError::CatalogLine { line: 2, .. }));
    }
}
