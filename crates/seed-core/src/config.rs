//! Generation settings and the YAML seeder file.
//!
//! ## Seeder file format
//!
//! ```yaml
//! settings:
//!   mode: by_category
//!   category_id: 7
//!   item_limit: 20
//!   records_per_item: 3
//!   content_kind: reviewable
//!   review_source: mixed
//!   min_score: 4
//!   window_months: 6
//! templates:
//!   general: |
//!     Great article, thanks for sharing.
//!     Very helpful.
//!   buyer:
//!     - Arrived quickly and works as described.
//!   non_buyer:
//!     - Looks like a solid choice.
//! authors:
//!   - Jane Doe <jane@example.com>
//!   - Bob
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PreconditionError, SeedError};
use crate::pool::{parse_template_lines, AuthorIdentity};
use crate::record::Approval;
use crate::{ItemId, MAX_SCORE};

/// How candidate items are selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Exactly one item, named by `target_item_id`
    SingleItem,
    /// Items in `category_id`, up to `item_limit`
    ByCategory,
    /// Any item of the configured kind, up to `item_limit`
    #[default]
    Unrestricted,
}

/// Kind of content being seeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Articles and pages: general pool, no score
    #[default]
    Generic,
    /// Products: buyer/non-buyer pools and a numeric score
    Reviewable,
}

/// Which reviewable pool a record is drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    Buyer,
    NonBuyer,
    /// Fair coin per record
    #[default]
    Mixed,
}

impl fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReviewSource::Buyer => "buyer",
            ReviewSource::NonBuyer => "non_buyer",
            ReviewSource::Mixed => "mixed",
        })
    }
}

/// Stock-status filter applied to reviewable content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    Any,
    InStock,
    OutOfStock,
    OnBackorder,
}

impl StockStatus {
    /// Whether an item with `status` passes this filter.
    pub fn matches(&self, status: StockStatus) -> bool {
        *self == StockStatus::Any || *self == status
    }
}

/// Immutable settings snapshot for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub mode: Mode,

    /// Single-item override; bypasses the processed ledger when set
    #[serde(default)]
    pub target_item_id: Option<ItemId>,

    #[serde(default)]
    pub category_id: Option<u64>,

    /// Max items considered per run (ignored in single-item mode)
    #[serde(default = "default_item_limit")]
    pub item_limit: usize,

    #[serde(default = "default_records_per_item")]
    pub records_per_item: u32,

    #[serde(default)]
    pub content_kind: ContentKind,

    #[serde(default)]
    pub review_source: ReviewSource,

    /// Lowest score drawn for reviewable content; the highest is always 5
    #[serde(default = "default_min_score")]
    pub min_score: u8,

    #[serde(default)]
    pub approval: Approval,

    /// Timestamps fall within this many calendar months before now
    #[serde(default = "default_window_months")]
    pub window_months: u32,

    #[serde(default)]
    pub stock_status: StockStatus,

    /// Keep the author cursor across runs instead of restarting at the first author
    #[serde(default)]
    pub persist_author_cursor: bool,

    /// Seed for reproducible scores, timestamps and coin flips
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_item_limit() -> usize {
    10
}

fn default_records_per_item() -> u32 {
    1
}

fn default_min_score() -> u8 {
    4
}

fn default_window_months() -> u32 {
    12
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            target_item_id: None,
            category_id: None,
            item_limit: default_item_limit(),
            records_per_item: default_records_per_item(),
            content_kind: ContentKind::default(),
            review_source: ReviewSource::default(),
            min_score: default_min_score(),
            approval: Approval::default(),
            window_months: default_window_months(),
            stock_status: StockStatus::default(),
            persist_author_cursor: false,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Target the given item, bypassing the processed ledger.
    pub fn single_item(mut self, item_id: ItemId) -> Self {
        self.mode = Mode::SingleItem;
        self.target_item_id = Some(item_id);
        self
    }

    /// Restrict candidates to a category, dropping any single-item target.
    pub fn by_category(mut self, category_id: u64) -> Self {
        self.mode = Mode::ByCategory;
        self.category_id = Some(category_id);
        self.target_item_id = None;
        self
    }

    /// Whether this run force-regenerates a specific item.
    ///
    /// Only single-item mode overrides; a target id left over in another
    /// mode is rejected by [`GenerationConfig::validate`].
    pub fn is_override(&self) -> bool {
        self.mode == Mode::SingleItem && self.target_item_id.is_some()
    }

    /// The item a single-item run force-regenerates, if any.
    pub fn override_target(&self) -> Option<ItemId> {
        if self.mode == Mode::SingleItem {
            self.target_item_id
        } else {
            None
        }
    }

    /// Check the mode-specific and numeric settings.
    ///
    /// Pool and author emptiness depends on stored state and is checked
    /// separately when the run assembles its template source.
    pub fn validate(&self) -> Result<(), PreconditionError> {
        match self.mode {
            Mode::SingleItem if self.target_item_id.is_none() => {
                return Err(PreconditionError::MissingTargetItem)
            }
            Mode::ByCategory if self.category_id.unwrap_or(0) == 0 => {
                return Err(PreconditionError::MissingCategory)
            }
            Mode::Unrestricted | Mode::ByCategory if self.target_item_id.is_some() => {
                return Err(PreconditionError::TargetOutsideSingleItem)
            }
            _ => {}
        }

        if self.mode != Mode::SingleItem && self.item_limit == 0 {
            return Err(PreconditionError::InvalidItemLimit);
        }
        if self.records_per_item == 0 {
            return Err(PreconditionError::InvalidRecordsPerItem);
        }
        if self.content_kind == ContentKind::Reviewable
            && !(1..=MAX_SCORE).contains(&self.min_score)
        {
            return Err(PreconditionError::InvalidMinScore(self.min_score));
        }

        Ok(())
    }
}

/// Template block in a seeder file: either a list or one template per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateBlock {
    Lines(Vec<String>),
    Text(String),
}

impl Default for TemplateBlock {
    fn default() -> Self {
        TemplateBlock::Lines(Vec::new())
    }
}

impl TemplateBlock {
    pub fn templates(&self) -> Vec<String> {
        match self {
            TemplateBlock::Lines(lines) => lines
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            TemplateBlock::Text(text) => parse_template_lines(text),
        }
    }
}

/// Templates to merge into the stored pools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLists {
    #[serde(default)]
    pub general: TemplateBlock,
    #[serde(default)]
    pub buyer: TemplateBlock,
    #[serde(default)]
    pub non_buyer: TemplateBlock,
}

/// A seeder file: settings, templates to append and the author list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeederFile {
    #[serde(default)]
    pub settings: GenerationConfig,

    #[serde(default)]
    pub templates: TemplateLists,

    /// `Name <email>` or `Name`
    #[serde(default)]
    pub authors: Vec<String>,
}

impl SeederFile {
    /// Load a seeder file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a seeder file from YAML and check its settings.
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        let file: SeederFile = serde_yaml::from_str(yaml)?;
        file.settings.validate()?;
        Ok(file)
    }

    pub fn author_identities(&self) -> Vec<AuthorIdentity> {
        self.authors
            .iter()
            .filter_map(|line| AuthorIdentity::parse(line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();

        assert_eq!(config.mode, Mode::Unrestricted);
        assert_eq!(config.item_limit, 10);
        assert_eq!(config.records_per_item, 1);
        assert!(!config.is_override());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_mode_requirements() {
        let config = GenerationConfig {
            mode: Mode::SingleItem,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(PreconditionError::MissingTargetItem));

        let config = GenerationConfig::default().by_category(0);
        assert_eq!(config.validate(), Err(PreconditionError::MissingCategory));

        let config = GenerationConfig::default().single_item(12);
        assert!(config.is_override());
        assert_eq!(config.override_target(), Some(12));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_target_outside_single_item_is_rejected() {
        let config = GenerationConfig {
            target_item_id: Some(2),
            ..Default::default()
        };
        assert!(!config.is_override());
        assert_eq!(config.override_target(), None);
        assert_eq!(
            config.validate(),
            Err(PreconditionError::TargetOutsideSingleItem)
        );

        let config = GenerationConfig {
            mode: Mode::ByCategory,
            category_id: Some(4),
            target_item_id: Some(2),
            ..Default::default()
        };
        assert!(!config.is_override());
        assert_eq!(
            config.validate(),
            Err(PreconditionError::TargetOutsideSingleItem)
        );

        // Switching to a category drops the target
        let config = GenerationConfig::default().single_item(2).by_category(4);
        assert_eq!(config.target_item_id, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_seeder_file_rejects_stray_target() {
        let yaml = r#"
settings:
  mode: unrestricted
  target_item_id: 9
"#;
        assert!(matches!(
            SeederFile::from_yaml(yaml),
            Err(SeedError::Precondition(
                PreconditionError::TargetOutsideSingleItem
            ))
        ));
    }

    #[test]
    fn test_validate_numeric_bounds() {
        let config = GenerationConfig {
            records_per_item: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(PreconditionError::InvalidRecordsPerItem)
        );

        let config = GenerationConfig {
            item_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(PreconditionError::InvalidItemLimit));

        // Item limit does not matter when a single item is targeted
        let config = GenerationConfig {
            item_limit: 0,
            ..Default::default()
        }
        .single_item(3);
        assert!(config.validate().is_ok());

        let config = GenerationConfig {
            content_kind: ContentKind::Reviewable,
            min_score: 6,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(PreconditionError::InvalidMinScore(6)));
    }

    #[test]
    fn test_seeder_file_from_yaml() {
        let yaml = r#"
settings:
  mode: by_category
  category_id: 7
  records_per_item: 3
  content_kind: reviewable
  review_source: buyer
  min_score: 3
  approval: pending
  stock_status: in_stock
templates:
  general: |
    Great article.

    Very helpful.
  buyer:
    - Works as described.
    - "  "
authors:
  - Jane Doe <jane@example.com>
  - Bob
"#;
        let file = SeederFile::from_yaml(yaml).unwrap();

        assert_eq!(file.settings.mode, Mode::ByCategory);
        assert_eq!(file.settings.category_id, Some(7));
        assert_eq!(file.settings.review_source, ReviewSource::Buyer);
        assert_eq!(file.settings.approval, Approval::Pending);
        assert_eq!(file.settings.stock_status, StockStatus::InStock);
        assert_eq!(file.settings.window_months, 12);
        assert_eq!(
            file.templates.general.templates(),
            vec!["Great article.", "Very helpful."]
        );
        assert_eq!(file.templates.buyer.templates(), vec!["Works as described."]);
        assert!(file.templates.non_buyer.templates().is_empty());
        assert_eq!(
            file.author_identities(),
            vec![
                AuthorIdentity::new("Jane Doe", "jane@example.com"),
                AuthorIdentity::new("Bob", ""),
            ]
        );
    }

    #[test]
    fn test_seeder_file_rejects_invalid_settings() {
        let yaml = r#"
settings:
  mode: single_item
"#;
        let result = SeederFile::from_yaml(yaml);
        assert!(matches!(
            result,
            Err(SeedError::Precondition(PreconditionError::MissingTargetItem))
        ));
    }

    #[test]
    fn test_seeder_file_from_missing_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = SeederFile::from_file(dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(SeedError::IoError(_))));
    }

    #[test]
    fn test_stock_status_matches() {
        assert!(StockStatus::Any.matches(StockStatus::OutOfStock));
        assert!(StockStatus::InStock.matches(StockStatus::InStock));
        assert!(!StockStatus::InStock.matches(StockStatus::OnBackorder));
    }
}
