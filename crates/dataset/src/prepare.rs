use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use stockcast_core::{CategoryCode, EngineConfig};

use crate::encoder::CategoryEncoder;
use crate::error::PrepareError;
use crate::record::{FeatureRow, RawSalesRecord, SalesRecord, parse_order_date};

/// Train/holdout split parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SplitConfig {
    /// Fraction of rows held out, in (0, 1).
    pub test_ratio: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
        }
    }
}

impl From<&EngineConfig> for SplitConfig {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            test_ratio: cfg.test_ratio,
            seed: cfg.split_seed,
        }
    }
}

/// One side of the split: parallel feature rows, targets and source row indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partition {
    pub features: Vec<FeatureRow>,
    pub targets: Vec<f64>,
    /// Indices into `PreparedDataset::records`.
    pub rows: Vec<usize>,
}

impl Partition {
    fn from_rows(records: &[SalesRecord], rows: &[usize]) -> Self {
        let mut features = Vec::with_capacity(rows.len());
        let mut targets = Vec::with_capacity(rows.len());
        for &i in rows {
            features.push(records[i].features());
            targets.push(records[i].units as f64);
        }
        Self {
            features,
            targets,
            rows: rows.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The feature table of one loaded dataset.
///
/// Immutable once built; a new load produces a new instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDataset {
    records: Vec<SalesRecord>,
    encoder: CategoryEncoder,
    train: Partition,
    holdout: Partition,
}

impl PreparedDataset {
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn encoder(&self) -> &CategoryEncoder {
        &self.encoder
    }

    pub fn train(&self) -> &Partition {
        &self.train
    }

    pub fn holdout(&self) -> &Partition {
        &self.holdout
    }

    pub fn label(&self, code: CategoryCode) -> Option<&str> {
        self.encoder.decode(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalize raw rows into a prepared dataset.
///
/// Fails fast on the first malformed date or blank category; rows are never
/// silently dropped.
pub fn prepare(raw: &[RawSalesRecord], split: &SplitConfig) -> Result<PreparedDataset, PrepareError> {
    if !(split.test_ratio.is_finite() && split.test_ratio > 0.0 && split.test_ratio < 1.0) {
        return Err(PrepareError::InvalidSplit(format!(
            "test_ratio must be in (0, 1), got {}",
            split.test_ratio
        )));
    }

    let mut dates = Vec::with_capacity(raw.len());
    for (i, r) in raw.iter().enumerate() {
        let row = i + 1;
        let date = parse_order_date(&r.order_date).ok_or_else(|| PrepareError::MalformedDate {
            row,
            value: r.order_date.clone(),
        })?;
        if r.category.trim().is_empty() {
            return Err(PrepareError::EmptyCategory { row });
        }
        dates.push(date);
    }

    let encoder = CategoryEncoder::fit(raw.iter().map(|r| r.category.as_str()));

    let mut records = Vec::with_capacity(raw.len());
    for (r, date) in raw.iter().zip(dates) {
        let code = encoder
            .encode(&r.category)
            .ok_or_else(|| PrepareError::EmptyCategory { row: records.len() + 1 })?;
        records.push(SalesRecord::new(date, code, r.units));
    }

    let (train_rows, holdout_rows) = split_indices(records.len(), split)?;
    let train = Partition::from_rows(&records, &train_rows);
    let holdout = Partition::from_rows(&records, &holdout_rows);

    info!(
        rows = records.len(),
        categories = encoder.len(),
        train = train.len(),
        holdout = holdout.len(),
        seed = split.seed,
        "dataset prepared"
    );

    Ok(PreparedDataset {
        records,
        encoder,
        train,
        holdout,
    })
}

/// Seeded shuffle split. The holdout takes the first `ceil(n * ratio)` shuffled
/// indices, training takes the rest.
///
/// ChaCha8 has a value-stable stream, so a seed picks the same partitions on
/// every build.
fn split_indices(n: usize, split: &SplitConfig) -> Result<(Vec<usize>, Vec<usize>), PrepareError> {
    // The epsilon keeps exact products like 15 * 0.2 from rounding up to 4.
    let n_holdout = ((n as f64) * split.test_ratio - 1e-9).ceil().max(0.0) as usize;
    let n_train = n.saturating_sub(n_holdout);
    if n_holdout == 0 || n_train == 0 {
        return Err(PrepareError::InsufficientRows { rows: n });
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(split.seed);
    order.shuffle(&mut rng);

    let (holdout, train) = order.split_at(n_holdout);
    debug!(n_train, n_holdout, "split computed");
    Ok((train.to_vec(), holdout.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(date: &str, category: &str, units: u64) -> RawSalesRecord {
        RawSalesRecord::new(date, category, units)
    }

    fn sample(n: usize) -> Vec<RawSalesRecord> {
        (0..n)
            .map(|i| {
                let month = (i % 12) + 1;
                let category = if i % 2 == 0 { "Widget" } else { "Gadget" };
                raw(&format!("2023-{month:02}-01"), category, (i as u64) * 10)
            })
            .collect()
    }

    #[test]
    fn split_is_eighty_twenty() {
        let ds = prepare(&sample(10), &SplitConfig::default()).unwrap();
        assert_eq!(ds.train().len(), 8);
        assert_eq!(ds.holdout().len(), 2);
        assert_eq!(ds.len(), 10);
    }

    #[test]
    fn holdout_rounds_up_like_ceil() {
        let ds = prepare(&sample(11), &SplitConfig::default()).unwrap();
        assert_eq!(ds.holdout().len(), 3);
        assert_eq!(ds.train().len(), 8);

        let ds = prepare(&sample(15), &SplitConfig::default()).unwrap();
        assert_eq!(ds.holdout().len(), 3);
    }

    #[test]
    fn partitions_cover_every_row_exactly_once() {
        let ds = prepare(&sample(37), &SplitConfig::default()).unwrap();
        let mut all: Vec<usize> = ds.train().rows.iter().chain(&ds.holdout().rows).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn partition_targets_match_source_rows() {
        let ds = prepare(&sample(20), &SplitConfig::default()).unwrap();
        for (pos, &row) in ds.holdout().rows.iter().enumerate() {
            assert_eq!(ds.holdout().targets[pos], ds.records()[row].units as f64);
            assert_eq!(ds.holdout().features[pos], ds.records()[row].features());
        }
    }

    #[test]
    fn malformed_date_aborts_the_load() {
        let mut rows = sample(5);
        rows[3].order_date = "31-31-2023".to_string();
        let err = prepare(&rows, &SplitConfig::default()).unwrap_err();
        assert_eq!(
            err,
            PrepareError::MalformedDate {
                row: 4,
                value: "31-31-2023".to_string()
            }
        );
    }

    #[test]
    fn blank_category_is_rejected() {
        let mut rows = sample(5);
        rows[0].category = "   ".to_string();
        let err = prepare(&rows, &SplitConfig::default()).unwrap_err();
        assert_eq!(err, PrepareError::EmptyCategory { row: 1 });
    }

    #[test]
    fn single_row_cannot_be_split() {
        let err = prepare(&sample(1), &SplitConfig::default()).unwrap_err();
        assert_eq!(err, PrepareError::InsufficientRows { rows: 1 });
        let err = prepare(&[], &SplitConfig::default()).unwrap_err();
        assert_eq!(err, PrepareError::InsufficientRows { rows: 0 });
    }

    #[test]
    fn invalid_ratio_is_rejected() {
        let split = SplitConfig {
            test_ratio: 1.5,
            seed: 1,
        };
        assert!(matches!(prepare(&sample(10), &split), Err(PrepareError::InvalidSplit(_))));
    }

    #[test]
    fn seeded_split_is_pinned() {
        let ds = prepare(&sample(10), &SplitConfig::default()).unwrap();
        assert_eq!(ds.holdout().rows, vec![0, 3]);

        let ds = prepare(&sample(20), &SplitConfig::default()).unwrap();
        assert_eq!(ds.holdout().rows, vec![7, 12, 0, 2]);
    }

    #[test]
    fn different_seeds_shuffle_differently() {
        let a = prepare(&sample(50), &SplitConfig { test_ratio: 0.2, seed: 1 }).unwrap();
        let b = prepare(&sample(50), &SplitConfig { test_ratio: 0.2, seed: 2 }).unwrap();
        assert_ne!(a.holdout().rows, b.holdout().rows);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: preparing the same input twice with the same seed yields
        /// identical partitions and identical encoding.
        #[test]
        fn preparation_is_idempotent(n in 2usize..200, seed in any::<u64>()) {
            let rows = sample(n);
            let split = SplitConfig { test_ratio: 0.2, seed };
            let a = prepare(&rows, &split).unwrap();
            let b = prepare(&rows, &split).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
