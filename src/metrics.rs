//! Bayesian estimates of product metrics
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use itertools::izip;
use rand::Rng;
use std::fmt;

use crate::dist::{Beta, Gaussian, NormalConjugate};
use crate::summary::Summary;
use crate::traits::{ConjugatePrior, Sampleable};

/// Expected customer lifetime is capped at this many periods when churn
/// draws approach zero.
const MAX_LIFETIME_PERIODS: f64 = 100.0;

/// Default number of Monte Carlo draws per estimate.
pub const DEFAULT_MC_SAMPLES: usize = 10_000;

/// A metric estimate with uncertainty: the posterior summary plus the
/// draws that produced it, addressable by position for downstream
/// composition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct MetricEstimate {
    summary: Summary,
}

impl MetricEstimate {
    /// Posterior mean.
    #[inline]
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.summary.mean()
    }

    /// Posterior median.
    #[inline]
    #[must_use]
    pub fn median(&self) -> f64 {
        self.summary.median()
    }

    /// Mode proxy (see [`Summary::mode`]).
    #[inline]
    #[must_use]
    pub fn mode(&self) -> f64 {
        self.summary.mode()
    }

    /// Central 95% credible interval.
    #[inline]
    #[must_use]
    pub fn ci95(&self) -> (f64, f64) {
        self.summary.ci95()
    }

    /// Central 99% credible interval.
    #[inline]
    #[must_use]
    pub fn ci99(&self) -> (f64, f64) {
        self.summary.ci99()
    }

    /// Posterior draws in draw order.
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        self.summary.samples()
    }

    /// The full summary.
    #[inline]
    #[must_use]
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

impl From<Summary> for MetricEstimate {
    fn from(summary: Summary) -> Self {
        MetricEstimate { summary }
    }
}

/// Error from a metric estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// No trials or observations were provided
    NoObservations,
    /// More successes than trials
    SuccessesExceedTrials {
        /// successes given
        successes: u64,
        /// trials given
        trials: u64,
    },
    /// Fewer than two positive order values
    TooFewOrders {
        /// positive orders found
        n_orders: usize,
    },
    /// Too few points to fit a trend
    HistoryTooShort {
        /// points given
        n_points: usize,
    },
}

impl std::error::Error for MetricsError {}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoObservations => {
                write!(f, "at least one observation is required")
            }
            Self::SuccessesExceedTrials { successes, trials } => {
                write!(f, "successes ({successes}) exceed trials ({trials})")
            }
            Self::TooFewOrders { n_orders } => write!(
                f,
                "at least two positive order values are required, got {n_orders}"
            ),
            Self::HistoryTooShort { n_points } => write!(
                f,
                "at least three historical points are required, got {n_points}"
            ),
        }
    }
}

/// Bayesian estimators for the usual product metrics, each with a typed
/// default prior that can be overridden.
///
/// # Examples
///
/// ```
/// use conjugate::metrics::BusinessMetrics;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let mut rng = SmallRng::seed_from_u64(0xFACADE);
/// let metrics = BusinessMetrics::new();
///
/// let conversion = metrics.conversion_rate(120, 1_000, &mut rng).unwrap();
/// let (lo, hi) = conversion.ci95();
/// assert!(lo < conversion.mean() && conversion.mean() < hi);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessMetrics {
    conversion_prior: Beta,
    retention_prior: Beta,
    churn_prior: Beta,
    revenue_prior: NormalConjugate,
    mc_samples: usize,
}

impl Default for BusinessMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl BusinessMetrics {
    /// Estimators with uninformative rate priors and a weak revenue prior
    /// centered at 100 ± 50 with observation noise variance 100.
    #[must_use]
    pub fn new() -> Self {
        BusinessMetrics {
            conversion_prior: Beta::uniform(),
            retention_prior: Beta::uniform(),
            churn_prior: Beta::uniform(),
            revenue_prior: NormalConjugate::new_unchecked(100.0, 50.0, 100.0),
            mc_samples: DEFAULT_MC_SAMPLES,
        }
    }

    /// Override the conversion-rate prior.
    #[must_use]
    pub fn with_conversion_prior(mut self, prior: Beta) -> Self {
        self.conversion_prior = prior;
        self
    }

    /// Override the retention prior.
    #[must_use]
    pub fn with_retention_prior(mut self, prior: Beta) -> Self {
        self.retention_prior = prior;
        self
    }

    /// Override the churn prior.
    #[must_use]
    pub fn with_churn_prior(mut self, prior: Beta) -> Self {
        self.churn_prior = prior;
        self
    }

    /// Override the revenue prior.
    #[must_use]
    pub fn with_revenue_prior(mut self, prior: NormalConjugate) -> Self {
        self.revenue_prior = prior;
        self
    }

    /// Override the Monte Carlo sample count.
    #[must_use]
    pub fn with_mc_samples(mut self, mc_samples: usize) -> Self {
        self.mc_samples = mc_samples;
        self
    }

    /// The revenue prior in use.
    #[must_use]
    pub fn revenue_prior(&self) -> &NormalConjugate {
        &self.revenue_prior
    }

    /// Monte Carlo sample count behind each estimate.
    #[must_use]
    pub fn mc_samples(&self) -> usize {
        self.mc_samples
    }

    fn estimate<R, D>(&self, dist: &D, rng: &mut R) -> MetricEstimate
    where
        R: Rng,
        D: Sampleable<f64>,
    {
        let samples = dist.sample(self.mc_samples, rng);
        MetricEstimate::from(
            Summary::from_samples(samples).expect("posterior draws are finite"),
        )
    }

    fn rate_estimate<R: Rng>(
        &self,
        prior: &Beta,
        successes: u64,
        trials: u64,
        rng: &mut R,
    ) -> Result<MetricEstimate, MetricsError> {
        if trials == 0 {
            return Err(MetricsError::NoObservations);
        }
        if successes > trials {
            return Err(MetricsError::SuccessesExceedTrials {
                successes,
                trials,
            });
        }

        let mut data = vec![0.0; trials as usize];
        data[..successes as usize].fill(1.0);

        let posterior = prior.update(&data).expect("trials is non-zero");
        Ok(self.estimate(&posterior, rng))
    }

    /// Conversion rate from `successes` out of `trials`, under the
    /// conversion prior.
    ///
    /// # Errors
    /// [`MetricsError::NoObservations`] when `trials` is zero,
    /// [`MetricsError::SuccessesExceedTrials`] when the counts are
    /// inconsistent.
    pub fn conversion_rate<R: Rng>(
        &self,
        successes: u64,
        trials: u64,
        rng: &mut R,
    ) -> Result<MetricEstimate, MetricsError> {
        self.rate_estimate(&self.conversion_prior, successes, trials, rng)
    }

    /// Average order value under a log-normal model: a Gaussian is fit to
    /// the log of the positive orders with standard error σ̂/√n and its
    /// draws are exponentiated back to currency units.
    ///
    /// Orders at or below zero are dropped before fitting. A zero-spread
    /// order book yields a point-mass estimate at the geometric mean.
    ///
    /// # Errors
    /// [`MetricsError::TooFewOrders`] when fewer than two positive orders
    /// remain.
    pub fn average_order_value<R: Rng>(
        &self,
        orders: &[f64],
        rng: &mut R,
    ) -> Result<MetricEstimate, MetricsError> {
        let log_orders: Vec<f64> = orders
            .iter()
            .filter(|&&x| x > 0.0)
            .map(|x| x.ln())
            .collect();
        if log_orders.len() < 2 {
            return Err(MetricsError::TooFewOrders {
                n_orders: log_orders.len(),
            });
        }

        let n = log_orders.len() as f64;
        let mean = log_orders.iter().sum::<f64>() / n;
        let var = log_orders
            .iter()
            .map(|x| (x - mean) * (x - mean))
            .sum::<f64>()
            / (n - 1.0);
        let std_err = (var / n).sqrt();

        let samples: Vec<f64> = if std_err > 0.0 {
            Gaussian::new(mean, std_err)
                .expect("moments of finite data are finite")
                .sample(self.mc_samples, rng)
                .iter()
                .map(|x| x.exp())
                .collect()
        } else {
            vec![mean.exp(); self.mc_samples]
        };

        Ok(MetricEstimate::from(
            Summary::from_samples(samples).expect("draws are finite"),
        ))
    }

    /// Retention per period from cohort rows, where `cohort[0]` is the
    /// cohort's size and `cohort[j]` its active users in period `j`.
    ///
    /// For each period, trials aggregate the sizes of the cohorts that
    /// observed it and successes aggregate their active counts. Periods
    /// with no users yield `None` rather than a made-up estimate.
    pub fn retention_rate<R: Rng>(
        &self,
        cohorts: &[Vec<u64>],
        rng: &mut R,
    ) -> Vec<Option<MetricEstimate>> {
        let n_periods = cohorts.iter().map(Vec::len).max().unwrap_or(0);

        (0..n_periods)
            .map(|period| {
                let mut trials = 0_u64;
                let mut active = 0_u64;
                for cohort in cohorts {
                    if period < cohort.len() {
                        trials += cohort[0];
                        active += cohort[period];
                    }
                }

                if trials == 0 {
                    None
                } else {
                    // clamp dirty exports where actives exceed the cohort
                    // size
                    let successes = active.min(trials);
                    Some(
                        self.rate_estimate(
                            &self.retention_prior,
                            successes,
                            trials,
                            rng,
                        )
                        .expect("trials is non-zero"),
                    )
                }
            })
            .collect()
    }

    /// Churn probability from counts of retained and churned customers,
    /// under the churn prior.
    ///
    /// # Errors
    /// [`MetricsError::NoObservations`] when both counts are zero.
    pub fn churn_probability<R: Rng>(
        &self,
        active_customers: u64,
        churned_customers: u64,
        rng: &mut R,
    ) -> Result<MetricEstimate, MetricsError> {
        self.rate_estimate(
            &self.churn_prior,
            churned_customers,
            active_customers + churned_customers,
            rng,
        )
    }

    /// Revenue per period under the Normal-conjugate revenue prior: the
    /// posterior over the mean period revenue given the observed series.
    ///
    /// # Errors
    /// [`MetricsError::NoObservations`] when `revenues` is empty.
    pub fn revenue_per_period<R: Rng>(
        &self,
        revenues: &[f64],
        rng: &mut R,
    ) -> Result<MetricEstimate, MetricsError> {
        let posterior = self
            .revenue_prior
            .update(revenues)
            .map_err(|_| MetricsError::NoObservations)?;
        Ok(self.estimate(&posterior, rng))
    }

    /// Customer lifetime value, CLV = AOV × purchase frequency × expected
    /// lifetime, propagated by positional Monte Carlo over the three
    /// sample sequences (cycled up to the configured draw count).
    ///
    /// Expected lifetime is 1/churn capped at 100 periods; churn draws at
    /// or below zero take the cap.
    #[must_use]
    pub fn customer_lifetime_value(
        &self,
        avg_order_value: &MetricEstimate,
        purchase_frequency: &MetricEstimate,
        churn_rate: &MetricEstimate,
    ) -> MetricEstimate {
        let clv_samples: Vec<f64> = izip!(
            avg_order_value.samples().iter().cycle(),
            purchase_frequency.samples().iter().cycle(),
            churn_rate.samples().iter().cycle(),
        )
        .take(self.mc_samples)
        .map(|(aov, freq, churn)| {
            let lifetime = if *churn > 0.0 {
                churn.recip().min(MAX_LIFETIME_PERIODS)
            } else {
                MAX_LIFETIME_PERIODS
            };
            aov * freq * lifetime
        })
        .collect();

        MetricEstimate::from(
            Summary::from_samples(clv_samples)
                .expect("composed draws are finite"),
        )
    }

    /// Revenue projections `periods` ahead from a linear trend over the
    /// historical series, with prediction uncertainty widening with the
    /// horizon. Draws are clamped at zero.
    ///
    /// A perfectly linear history degenerates to point-mass projections on
    /// the trend line.
    ///
    /// # Errors
    /// [`MetricsError::HistoryTooShort`] for fewer than three points,
    /// which leave the residual variance without degrees of freedom.
    pub fn revenue_projection<R: Rng>(
        &self,
        historical_revenue: &[f64],
        periods: usize,
        rng: &mut R,
    ) -> Result<Vec<MetricEstimate>, MetricsError> {
        let n_points = historical_revenue.len();
        if n_points < 3 {
            return Err(MetricsError::HistoryTooShort { n_points });
        }

        let n = n_points as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = historical_revenue.iter().sum::<f64>() / n;

        let mut num = 0.0;
        let mut den = 0.0;
        for (i, y) in historical_revenue.iter().enumerate() {
            let dx = i as f64 - mean_x;
            num += dx * (y - mean_y);
            den += dx * dx;
        }
        let slope = num / den;
        let intercept = slope.mul_add(-mean_x, mean_y);

        let residual_ss: f64 = historical_revenue
            .iter()
            .enumerate()
            .map(|(i, y)| {
                let pred = slope.mul_add(i as f64, intercept);
                (y - pred) * (y - pred)
            })
            .sum();
        let sigma = (residual_ss / (n - 2.0)).sqrt();

        Ok((0..periods)
            .map(|t| {
                let future_x = n + t as f64;
                let mean_pred = slope.mul_add(future_x, intercept);
                let dx = future_x - mean_x;
                let pred_se = sigma * (1.0 + 1.0 / n + dx * dx / den).sqrt();

                let samples: Vec<f64> = if pred_se > 0.0 {
                    Gaussian::new(mean_pred, pred_se)
                        .expect("finite trend over finite history")
                        .sample(self.mc_samples, rng)
                        .iter()
                        .map(|x| x.max(0.0))
                        .collect()
                } else {
                    vec![mean_pred.max(0.0); self.mc_samples]
                };

                MetricEstimate::from(
                    Summary::from_samples(samples).expect("draws are finite"),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn metrics() -> BusinessMetrics {
        BusinessMetrics::new().with_mc_samples(2_000)
    }

    fn point_mass(value: f64, n: usize) -> MetricEstimate {
        MetricEstimate::from(Summary::from_samples(vec![value; n]).unwrap())
    }

    #[test]
    fn conversion_rate_tracks_the_posterior_mean() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let est = metrics().conversion_rate(120, 1000, &mut rng).unwrap();

        // Posterior mean of Beta(121, 881)
        assert::close(est.mean(), 121.0 / 1002.0, 0.01);
        let (lo, hi) = est.ci95();
        assert!(lo < est.mean() && est.mean() < hi);
        assert_eq!(est.samples().len(), 2_000);
    }

    #[test]
    fn conversion_rate_rejects_bad_counts() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        assert_eq!(
            metrics().conversion_rate(1, 0, &mut rng).unwrap_err(),
            MetricsError::NoObservations
        );
        assert_eq!(
            metrics().conversion_rate(5, 3, &mut rng).unwrap_err(),
            MetricsError::SuccessesExceedTrials {
                successes: 5,
                trials: 3
            }
        );
    }

    #[test]
    fn aov_recovers_the_scale_of_the_orders() {
        let mut rng = Xoshiro256Plus::seed_from_u64(11);
        let orders: Vec<f64> =
            (1..=50).map(|i| 40.0 + f64::from(i % 10)).collect();
        let est = metrics().average_order_value(&orders, &mut rng).unwrap();
        assert!(40.0 < est.mean() && est.mean() < 50.0);
    }

    #[test]
    fn aov_drops_nonpositive_orders() {
        let mut rng = Xoshiro256Plus::seed_from_u64(11);
        let est = metrics()
            .average_order_value(&[-5.0, 0.0, 20.0, 22.0, 18.0], &mut rng)
            .unwrap();
        assert!(15.0 < est.mean() && est.mean() < 25.0);
    }

    #[test]
    fn aov_requires_two_positive_orders() {
        let mut rng = Xoshiro256Plus::seed_from_u64(11);
        assert_eq!(
            metrics().average_order_value(&[10.0], &mut rng).unwrap_err(),
            MetricsError::TooFewOrders { n_orders: 1 }
        );
    }

    #[test]
    fn aov_with_identical_orders_is_a_point_mass() {
        let mut rng = Xoshiro256Plus::seed_from_u64(11);
        let est = metrics()
            .average_order_value(&[25.0, 25.0, 25.0], &mut rng)
            .unwrap();
        assert::close(est.mean(), 25.0, 1E-9);
        assert::close(est.summary().variance(), 0.0, 1E-12);
    }

    #[test]
    fn retention_aggregates_cohorts_by_period() {
        let mut rng = Xoshiro256Plus::seed_from_u64(5);
        let cohorts = vec![vec![100_u64, 80, 60], vec![100_u64, 50]];
        let series = metrics().retention_rate(&cohorts, &mut rng);

        assert_eq!(series.len(), 3);
        // Period 0: everyone is active
        assert!(series[0].as_ref().unwrap().mean() > 0.95);
        // Period 1: 130 of 200
        let p1 = series[1].as_ref().unwrap().mean();
        assert!((p1 - 0.65).abs() < 0.05);
        // Period 2: 60 of 100
        let p2 = series[2].as_ref().unwrap().mean();
        assert!((p2 - 0.6).abs() < 0.05);
    }

    #[test]
    fn retention_of_no_cohorts_is_empty() {
        let mut rng = Xoshiro256Plus::seed_from_u64(5);
        assert!(metrics().retention_rate(&[], &mut rng).is_empty());
    }

    #[test]
    fn retention_period_with_no_users_is_skipped() {
        let mut rng = Xoshiro256Plus::seed_from_u64(5);
        let series = metrics().retention_rate(&[vec![0_u64, 0]], &mut rng);
        assert_eq!(series, vec![None, None]);
    }

    #[test]
    fn revenue_per_period_pools_prior_and_data() {
        let mut rng = Xoshiro256Plus::seed_from_u64(23);
        let est = metrics()
            .revenue_per_period(&[112.0, 98.0, 105.0, 110.0], &mut rng)
            .unwrap();
        // Four observations at noise variance 100 dominate the wide prior
        assert!((est.mean() - 106.0).abs() < 2.0);
    }

    #[test]
    fn revenue_per_period_rejects_empty_input() {
        let mut rng = Xoshiro256Plus::seed_from_u64(23);
        assert_eq!(
            metrics().revenue_per_period(&[], &mut rng).unwrap_err(),
            MetricsError::NoObservations
        );
    }

    #[test]
    fn churn_probability_is_the_churned_share() {
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        let est = metrics().churn_probability(900, 100, &mut rng).unwrap();
        assert!((est.mean() - 0.1).abs() < 0.02);
    }

    #[test]
    fn clv_composes_point_masses_exactly() {
        let m = metrics();
        let aov = point_mass(10.0, 4);
        let freq = point_mass(2.0, 4);
        let churn = point_mass(0.5, 4);

        let clv = m.customer_lifetime_value(&aov, &freq, &churn);
        assert::close(clv.mean(), 40.0, 1E-12);
        assert::close(clv.summary().variance(), 0.0, 1E-12);
    }

    #[test]
    fn clv_caps_the_lifetime_for_vanishing_churn() {
        let m = metrics();
        let aov = point_mass(10.0, 4);
        let freq = point_mass(2.0, 4);

        let zero_churn =
            m.customer_lifetime_value(&aov, &freq, &point_mass(0.0, 4));
        assert::close(zero_churn.mean(), 2000.0, 1E-12);

        let tiny_churn =
            m.customer_lifetime_value(&aov, &freq, &point_mass(1E-9, 4));
        assert::close(tiny_churn.mean(), 2000.0, 1E-12);
    }

    #[test]
    fn clv_cycles_positional_draws() {
        let m = BusinessMetrics::new().with_mc_samples(4);
        let aov = MetricEstimate::from(
            Summary::from_samples(vec![10.0, 20.0]).unwrap(),
        );
        let freq = MetricEstimate::from(
            Summary::from_samples(vec![1.0, 2.0]).unwrap(),
        );
        let churn = MetricEstimate::from(
            Summary::from_samples(vec![0.5, 0.25]).unwrap(),
        );

        let clv = m.customer_lifetime_value(&aov, &freq, &churn);
        // Pairings cycle in lockstep: (10, 1, 0.5), (20, 2, 0.25), ...
        assert_eq!(clv.samples(), &[20.0, 160.0, 20.0, 160.0]);
    }

    #[test]
    fn projection_of_a_perfect_trend_is_deterministic() {
        let mut rng = Xoshiro256Plus::seed_from_u64(13);
        let projections = metrics()
            .revenue_projection(&[10.0, 20.0, 30.0], 2, &mut rng)
            .unwrap();

        assert_eq!(projections.len(), 2);
        assert::close(projections[0].mean(), 40.0, 1E-9);
        assert::close(projections[1].mean(), 50.0, 1E-9);
    }

    #[test]
    fn projection_uncertainty_widens_with_the_horizon() {
        let mut rng = Xoshiro256Plus::seed_from_u64(13);
        let history = [12.0, 18.0, 33.0, 41.0, 48.0, 62.0];
        let projections =
            metrics().revenue_projection(&history, 3, &mut rng).unwrap();

        let w1 = projections[0].ci95().1 - projections[0].ci95().0;
        let w3 = projections[2].ci95().1 - projections[2].ci95().0;
        assert!(w1 > 0.0 && w3 > w1);
    }

    #[test]
    fn projection_requires_three_points() {
        let mut rng = Xoshiro256Plus::seed_from_u64(13);
        assert_eq!(
            metrics()
                .revenue_projection(&[1.0, 2.0], 1, &mut rng)
                .unwrap_err(),
            MetricsError::HistoryTooShort { n_points: 2 }
        );
    }

    #[test]
    fn projection_clamps_negative_revenue_draws() {
        let mut rng = Xoshiro256Plus::seed_from_u64(17);
        // Steeply declining revenue projects below zero
        let history = [100.0, 70.0, 45.0, 20.0, 5.0];
        let projections =
            metrics().revenue_projection(&history, 1, &mut rng).unwrap();
        assert!(projections[0].samples().iter().all(|&x| x >= 0.0));
    }
}
