//! Empirical summaries of posterior samples
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use itertools::Itertools;
use std::fmt;

use crate::misc::quantile;

/// Point and interval estimates computed from a finite sample sequence,
/// typically posterior draws.
///
/// The input order of `samples` is preserved so downstream Monte Carlo
/// composition can address draws positionally; sorting happens on a
/// private copy.
///
/// # Examples
///
/// ```
/// use conjugate::summary::Summary;
///
/// let summary =
///     Summary::from_samples((1..=100).map(f64::from).collect()).unwrap();
///
/// assert!((summary.median() - 50.5).abs() < 1E-12);
/// assert!((summary.ci95().0 - 3.475).abs() < 1E-12);
/// assert!((summary.ci95().1 - 97.525).abs() < 1E-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Summary {
    mean: f64,
    median: f64,
    mode: f64,
    variance: f64,
    std_dev: f64,
    ci95: (f64, f64),
    ci99: (f64, f64),
    samples: Vec<f64>,
}

/// Error constructing a [`Summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryError {
    /// The sample sequence was empty
    Empty,
    /// A sample was NaN or infinite
    NonFiniteSample,
}

impl Summary {
    /// Summarize a sample sequence.
    ///
    /// Mean, variance, and standard deviation come from the samples as
    /// given; the median and the 95%/99% interval bounds are
    /// linear-interpolation empirical quantiles over a sorted copy. A
    /// single sample yields zero variance and collapses every interval
    /// bound onto that sample.
    ///
    /// # Errors
    /// [`SummaryError::Empty`] on an empty sequence,
    /// [`SummaryError::NonFiniteSample`] if any sample is NaN or infinite.
    pub fn from_samples(samples: Vec<f64>) -> Result<Self, SummaryError> {
        if samples.is_empty() {
            return Err(SummaryError::Empty);
        }
        if samples.iter().any(|x| !x.is_finite()) {
            return Err(SummaryError::NonFiniteSample);
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = if samples.len() < 2 {
            0.0
        } else {
            samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>()
                / (n - 1.0)
        };

        let sorted: Vec<f64> = samples
            .iter()
            .copied()
            .sorted_unstable_by(|a, b| {
                a.partial_cmp(b).expect("samples are finite")
            })
            .collect();

        Ok(Summary {
            mean,
            median: quantile(&sorted, 0.5),
            mode: mean,
            variance,
            std_dev: variance.sqrt(),
            ci95: (quantile(&sorted, 0.025), quantile(&sorted, 0.975)),
            ci99: (quantile(&sorted, 0.005), quantile(&sorted, 0.995)),
            samples,
        })
    }

    /// Sample mean.
    #[inline]
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Empirical median, the 0.5 quantile.
    #[inline]
    #[must_use]
    pub fn median(&self) -> f64 {
        self.median
    }

    /// Mode estimate.
    ///
    /// Approximated by the sample mean; a kernel-density mode estimate is
    /// a known gap, so treat this as a central-tendency proxy rather than
    /// a density peak.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> f64 {
        self.mode
    }

    /// Unbiased sample variance; 0 for a single sample.
    #[inline]
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Sample standard deviation.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Central 95% interval (empirical 0.025 and 0.975 quantiles).
    #[inline]
    #[must_use]
    pub fn ci95(&self) -> (f64, f64) {
        self.ci95
    }

    /// Central 99% interval (empirical 0.005 and 0.995 quantiles).
    #[inline]
    #[must_use]
    pub fn ci99(&self) -> (f64, f64) {
        self.ci99
    }

    /// The samples in their original order.
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Consume the summary, returning the samples.
    #[inline]
    #[must_use]
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

impl std::error::Error for SummaryError {}

impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => {
                write!(f, "cannot summarize an empty sample sequence")
            }
            Self::NonFiniteSample => write!(f, "samples must be finite"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1E-12;

    #[test]
    fn single_sample_collapses_everything() {
        let summary = Summary::from_samples(vec![3.25]).unwrap();

        assert::close(summary.mean(), 3.25, TOL);
        assert::close(summary.median(), 3.25, TOL);
        assert::close(summary.variance(), 0.0, TOL);
        assert::close(summary.std_dev(), 0.0, TOL);
        assert_eq!(summary.ci95(), (3.25, 3.25));
        assert_eq!(summary.ci99(), (3.25, 3.25));
    }

    #[test]
    fn reference_values_for_one_to_one_hundred() {
        let summary =
            Summary::from_samples((1..=100).map(f64::from).collect()).unwrap();

        assert::close(summary.mean(), 50.5, TOL);
        assert::close(summary.median(), 50.5, TOL);
        assert::close(summary.variance(), 83_325.0 / 99.0, 1E-9);

        let (lo, hi) = summary.ci95();
        assert::close(lo, 3.475, TOL);
        assert::close(hi, 97.525, TOL);

        let (lo, hi) = summary.ci99();
        assert::close(lo, 1.495, TOL);
        assert::close(hi, 99.505, TOL);
    }

    #[test]
    fn two_samples() {
        let summary = Summary::from_samples(vec![1.0, 3.0]).unwrap();
        assert::close(summary.mean(), 2.0, TOL);
        assert::close(summary.median(), 2.0, TOL);
        assert::close(summary.variance(), 2.0, TOL);
    }

    #[test]
    fn preserves_input_order() {
        let samples = vec![3.0, 1.0, 2.0];
        let summary = Summary::from_samples(samples.clone()).unwrap();

        assert_eq!(summary.samples(), samples.as_slice());
        assert::close(summary.median(), 2.0, TOL);
    }

    #[test]
    fn mode_is_the_mean_proxy() {
        let summary = Summary::from_samples(vec![1.0, 2.0, 6.0]).unwrap();
        assert::close(summary.mode(), summary.mean(), TOL);
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(
            Summary::from_samples(vec![]).unwrap_err(),
            SummaryError::Empty
        );
    }

    #[test]
    fn rejects_non_finite_samples() {
        assert_eq!(
            Summary::from_samples(vec![1.0, f64::NAN]).unwrap_err(),
            SummaryError::NonFiniteSample
        );
        assert_eq!(
            Summary::from_samples(vec![1.0, f64::INFINITY]).unwrap_err(),
            SummaryError::NonFiniteSample
        );
    }

    #[test]
    fn into_samples_round_trips() {
        let samples = vec![0.25, 0.5, 0.75];
        let summary = Summary::from_samples(samples.clone()).unwrap();
        assert_eq!(summary.into_samples(), samples);
    }
}
