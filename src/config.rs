use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::aggregate::{AggregateOptions, DISCOUNT_BINS, PRICE_BINS, TOP_N};

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "tokodash.json";
pub const DEFAULT_DATA_PATH: &str = "tokopedia_kaos_pria.csv";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// ```json
/// { "data_path": "tokopedia_kaos_pria.csv", "price_bins": 50,
///   "discount_bins": 30, "top_n": 10, "price_range": [50000, 150000] }
/// ```
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub price_bins: usize,
    pub discount_bins: usize,
    pub top_n: usize,
    /// `[min, max]` price selected when a dataset loads.  Unset selects the
    /// dataset's full range.
    pub price_range: Option<[u64; 2]>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            price_bins: PRICE_BINS,
            discount_bins: DISCOUNT_BINS,
            top_n: TOP_N,
            price_range: None,
        }
    }
}

impl DashboardConfig {
    /// Parse a config file.  Zero counts fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Read `path` if it exists; otherwise, or if it is broken, use defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Using config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.price_bins == 0 {
            self.price_bins = defaults.price_bins;
        }
        if self.discount_bins == 0 {
            self.discount_bins = defaults.discount_bins;
        }
        if self.top_n == 0 {
            self.top_n = defaults.top_n;
        }
        self
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            price_bins: self.price_bins,
            discount_bins: self.discount_bins,
            top_n: self.top_n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join(CONFIG_FILE));
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.aggregate_options(), AggregateOptions::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{ "data_path": "listing.parquet", "top_n": 5, "price_bins": 0, "price_range": [1000, 2000] }"#,
        )
        .unwrap();

        let config = DashboardConfig::load_or_default(&path);
        assert_eq!(config.data_path, PathBuf::from("listing.parquet"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.price_bins, PRICE_BINS);
        assert_eq!(config.discount_bins, DISCOUNT_BINS);
        assert_eq!(config.price_range, Some([1000, 2000]));
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "not json").unwrap();

        assert!(DashboardConfig::from_file(&path).is_err());
        assert_eq!(DashboardConfig::load_or_default(&path), DashboardConfig::default());
    }
}
