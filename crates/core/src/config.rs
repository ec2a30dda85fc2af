//! Engine configuration.
//!
//! Every tunable constant of the pipeline and the voice dispatcher lives here so
//! it can be changed without touching the component contracts.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Tunables for preparation, alerting and dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Row-level alert threshold: rows with fewer units are "Stock Bajo".
    pub low_stock_threshold: u64,
    /// Critical-stock voice query threshold. Independent of `low_stock_threshold`.
    pub critical_stock_threshold: u64,
    /// Minimum fuzzy similarity (0-100, exclusive) to accept a misheard product name.
    pub fuzzy_match_threshold: u8,
    /// Number of categories returned by the top-selling query.
    pub top_selling_count: usize,
    /// Number of rows returned by the "low stock this month" query.
    pub low_stock_month_limit: usize,
    /// Seed for the train/holdout shuffle.
    pub split_seed: u64,
    /// Fraction of rows held out for evaluation, in (0, 1).
    pub test_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 1000,
            critical_stock_threshold: 10,
            fuzzy_match_threshold: 80,
            top_selling_count: 3,
            low_stock_month_limit: 5,
            split_seed: 42,
            test_ratio: 0.2,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.test_ratio.is_finite() && self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(CoreError::invalid_config(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        if self.fuzzy_match_threshold > 100 {
            return Err(CoreError::invalid_config(format!(
                "fuzzy_match_threshold must be <= 100, got {}",
                self.fuzzy_match_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_test_ratio() {
        for ratio in [0.0, 1.0, -0.5, f64::NAN] {
            let cfg = EngineConfig {
                test_ratio: ratio,
                ..EngineConfig::default()
            };
            assert!(matches!(cfg.validate(), Err(CoreError::InvalidConfig(_))));
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"low_stock_threshold": 500}"#).unwrap();
        assert_eq!(cfg.low_stock_threshold, 500);
        assert_eq!(cfg.critical_stock_threshold, 10);
        assert_eq!(cfg.split_seed, 42);
    }
}
