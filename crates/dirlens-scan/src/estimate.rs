//! Sampling based directory size estimation.
//!
//! Only the first [`SIZE_SAMPLE_LIMIT`] entries, in the order the platform
//! lists them, are read. Larger directories get the sampled sum scaled by
//! `entries / sampled`. The sample is not random, so the estimate is biased
//! toward whatever the listing returns first.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use dirlens_core::{Logger, SIZE_SAMPLE_LIMIT, StatError, default_logger};

/// Aggregate size of a directory's direct children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeEstimate {
    /// Number of direct children.
    pub item_count: u64,
    /// Number of children whose size was read.
    pub sampled: u64,
    /// Sum of the sampled sizes.
    pub sampled_bytes: u64,
    /// Sampled sum, scaled to the full population when the sample is partial.
    pub total_size: u64,
}

impl SizeEstimate {
    /// Whether `total_size` was scaled from a partial sample.
    pub fn is_estimate(&self) -> bool {
        self.sampled < self.item_count
    }
}

/// Estimates directory sizes from a bounded sample of children.
pub struct SizeEstimator {
    sample_limit: usize,
    logger: Arc<dyn Logger>,
}

impl SizeEstimator {
    /// Create an estimator with the default sample size.
    pub fn new() -> Self {
        Self {
            sample_limit: SIZE_SAMPLE_LIMIT,
            logger: default_logger(),
        }
    }

    /// Use a custom sample size (at least 1).
    pub fn with_sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit.max(1);
        self
    }

    /// Use the given logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Estimate the size of `dir`.
    ///
    /// Fails only when the directory cannot be listed. Children whose
    /// metadata cannot be read count as zero bytes.
    pub fn estimate(&self, dir: &Path) -> Result<SizeEstimate, StatError> {
        let entries: Vec<_> = fs::read_dir(dir)
            .map_err(|e| StatError::io(dir, e))?
            .collect();

        let item_count = entries.len();
        let sample: Vec<_> = entries
            .into_iter()
            .take(self.sample_limit)
            .collect();
        let sampled = sample.len();

        // Each child read is independent and failure-isolated.
        let sampled_bytes: u64 = sample
            .into_par_iter()
            .map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        self.logger
                            .debug(&format!("Skipping unreadable entry in {}: {err}", dir.display()));
                        return 0;
                    }
                };
                match fs::metadata(entry.path()) {
                    Ok(metadata) => metadata.len(),
                    Err(err) => {
                        self.logger.debug(&format!(
                            "Skipping size of {}: {err}",
                            entry.path().display()
                        ));
                        0
                    }
                }
            })
            .sum();

        let total_size = scale_sample(sampled_bytes, sampled as u64, item_count as u64);
        if sampled < item_count {
            self.logger.debug(&format!(
                "Estimated {} from {sampled} of {item_count} entries",
                dir.display()
            ));
        }

        Ok(SizeEstimate {
            item_count: item_count as u64,
            sampled: sampled as u64,
            sampled_bytes,
            total_size,
        })
    }
}

impl Default for SizeEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale a sampled sum to the full population, rounding half up.
///
/// Returns `sampled_bytes` unchanged when the sample covers everything.
pub fn scale_sample(sampled_bytes: u64, sampled: u64, population: u64) -> u64 {
    if sampled == 0 || sampled >= population {
        return sampled_bytes;
    }
    let numerator = sampled_bytes as u128 * population as u128;
    let denominator = sampled as u128;
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirlens_core::NullLogger;
    use tempfile::TempDir;

    fn estimator() -> SizeEstimator {
        SizeEstimator::new().with_logger(Arc::new(NullLogger))
    }

    #[test]
    fn test_scale_sample() {
        assert_eq!(scale_sample(1000, 100, 100), 1000);
        assert_eq!(scale_sample(1000, 100, 250), 2500);
        // 10 * 3 / 2 = 15
        assert_eq!(scale_sample(10, 2, 3), 15);
        // 1 * 3 / 2 = 1.5 rounds up
        assert_eq!(scale_sample(1, 2, 3), 2);
        // 1 * 4 / 3 = 1.33 rounds down
        assert_eq!(scale_sample(1, 3, 4), 1);
        assert_eq!(scale_sample(0, 0, 0), 0);
    }

    #[test]
    fn test_small_directory_is_exact() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), vec![0u8; 10]).unwrap();
        fs::write(temp.path().join("b"), vec![0u8; 32]).unwrap();

        let estimate = estimator().estimate(temp.path()).unwrap();
        assert_eq!(estimate.item_count, 2);
        assert_eq!(estimate.total_size, 42);
        assert!(!estimate.is_estimate());
    }

    #[test]
    fn test_empty_directory() {
        let temp = TempDir::new().unwrap();
        let estimate = estimator().estimate(temp.path()).unwrap();
        assert_eq!(estimate.item_count, 0);
        assert_eq!(estimate.total_size, 0);
    }

    #[test]
    fn test_large_directory_uniform_sizes_scale_exactly() {
        let temp = TempDir::new().unwrap();
        for i in 0..150 {
            fs::write(temp.path().join(format!("f{i:03}")), vec![0u8; 8]).unwrap();
        }

        let estimate = estimator().estimate(temp.path()).unwrap();
        assert_eq!(estimate.item_count, 150);
        assert_eq!(estimate.sampled, SIZE_SAMPLE_LIMIT as u64);
        assert!(estimate.is_estimate());
        assert_eq!(estimate.sampled_bytes, 800);
        assert_eq!(estimate.total_size, 1200);
    }

    #[test]
    fn test_custom_sample_limit() {
        let temp = TempDir::new().unwrap();
        for i in 0..5 {
            fs::write(temp.path().join(format!("f{i}")), vec![0u8; 3]).unwrap();
        }

        let estimate = estimator().with_sample_limit(2).estimate(temp.path()).unwrap();
        assert_eq!(estimate.sampled, 2);
        assert_eq!(estimate.total_size, 15);
    }

    #[test]
    fn test_unlistable_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = estimator().estimate(&temp.path().join("missing")).unwrap_err();
        assert!(err.is_not_found());
    }
}
