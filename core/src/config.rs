use crate::{
    error::ScopeResult,
    paginate::{PageSize, FULL_PAGE_SIZE, PREVIEW_PAGE_SIZE},
    record::Field,
    sort::LabelSet,
    store::Backend,
};
use serde::{Deserialize, Serialize};

/// Operator-console settings, read from a JSON file.
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeConfig {
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Per-store record bound. Adds beyond it are dropped.
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_preview_page_size")]
    pub preview_page_size: usize,
    #[serde(default)]
    pub default_backend: Backend,
    /// Bucket sort against the legacy fixed city list instead of the
    /// locations actually present.
    #[serde(default)]
    pub legacy_city_labels: bool,
    #[serde(default = "default_search_field")]
    pub search_field: Field,
}

fn default_data_path() -> String {
    "financial_fraud_detection.csv".into()
}

fn default_page_size() -> usize {
    FULL_PAGE_SIZE
}

fn default_preview_page_size() -> usize {
    PREVIEW_PAGE_SIZE
}

fn default_search_field() -> Field {
    Field::TransactionType
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            data_path:          default_data_path(),
            capacity:           None,
            page_size:          default_page_size(),
            preview_page_size:  default_preview_page_size(),
            default_backend:    Backend::Indexed,
            legacy_city_labels: false,
            search_field:       default_search_field(),
        }
    }
}

impl ScopeConfig {
    /// Load from a JSON file.
    /// In tests, use ScopeConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ScopeConfig = serde_json::from_str(&content)?;
        config.page_sizes()?;
        Ok(config)
    }

    /// Config with small bounds for use in tests.
    pub fn default_test() -> Self {
        Self {
            data_path: "test-data.csv".into(),
            capacity: Some(1_000),
            ..Self::default()
        }
    }

    /// (full, preview) page sizes, both validated.
    pub fn page_sizes(&self) -> ScopeResult<(PageSize, PageSize)> {
        Ok((
            PageSize::new(self.page_size)?,
            PageSize::new(self.preview_page_size)?,
        ))
    }

    pub fn label_set(&self) -> LabelSet {
        if self.legacy_city_labels {
            LabelSet::legacy_cities()
        } else {
            LabelSet::Discovered
        }
    }
}
