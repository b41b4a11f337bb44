//! Sufficient statistics for the conjugate updates.
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::traits::SuffStat;

/// Sufficient statistic for Bernoulli-coded rate data: the number of
/// observations and the number of successes.
///
/// Observations arrive as raw `f64`s; any value greater than zero counts
/// as a success, everything else as a failure. This coding matches the
/// 0/1-coded sequences the analytics layer produces.
///
/// # Example
///
/// ```
/// use conjugate::data::BernoulliSuffStat;
/// use conjugate::traits::SuffStat;
///
/// let mut stat = BernoulliSuffStat::new();
/// stat.observe_many(&[1.0, 0.0, 1.0]);
///
/// assert_eq!(stat.n(), 3);
/// assert_eq!(stat.k(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct BernoulliSuffStat {
    n: usize,
    k: usize,
}

impl BernoulliSuffStat {
    /// Create an empty statistic.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successes.
    #[inline]
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }
}

impl SuffStat<f64> for BernoulliSuffStat {
    fn n(&self) -> usize {
        self.n
    }

    fn observe(&mut self, x: &f64) {
        self.n += 1;
        if *x > 0.0 {
            self.k += 1;
        }
    }

    fn forget(&mut self, x: &f64) {
        self.n -= 1;
        if *x > 0.0 {
            self.k -= 1;
        }
    }
}

/// Sufficient statistic for real-valued observations under a Gaussian
/// likelihood with known variance: the count and the running sum.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct GaussianSuffStat {
    n: usize,
    sum_x: f64,
}

impl GaussianSuffStat {
    /// Create an empty statistic.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the observations.
    #[inline]
    #[must_use]
    pub fn sum_x(&self) -> f64 {
        self.sum_x
    }

    /// Sample mean of the observations. Meaningful only when `n > 0`.
    #[inline]
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.sum_x / self.n as f64
    }
}

impl SuffStat<f64> for GaussianSuffStat {
    fn n(&self) -> usize {
        self.n
    }

    fn observe(&mut self, x: &f64) {
        self.n += 1;
        self.sum_x += x;
    }

    fn forget(&mut self, x: &f64) {
        self.n -= 1;
        self.sum_x -= x;
    }
}
