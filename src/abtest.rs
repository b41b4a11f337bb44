//! Bayesian A/B testing over two conjugate arms
use rand::Rng;

use crate::dist::Beta;
use crate::impl_display;
use crate::misc::quantile;
use crate::summary::Summary;
use crate::traits::{ConjugatePrior, Mean, Posterior, Sampleable};

/// Default number of paired Monte Carlo draws behind every derived
/// statistic.
pub const DEFAULT_MC_SAMPLES: usize = 10_000;

/// Two-arm Bayesian test: a prior per arm, the raw data each arm has
/// accumulated, and posteriors re-derived from the original priors over
/// all accumulated data whenever data arrive.
///
/// Every derived statistic draws a fresh paired Monte Carlo sample from
/// the two posteriors with the caller's generator, so a fixed seed and
/// call order reproduce results exactly.
///
/// # Examples
///
/// ```
/// use conjugate::abtest::ABTest;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let mut rng = SmallRng::seed_from_u64(0xC0FFEE);
/// let mut test = ABTest::new();
///
/// let mut control = vec![0.0; 1_000];
/// control[..120].fill(1.0);
/// let mut treatment = vec![0.0; 1_000];
/// treatment[..150].fill(1.0);
///
/// test.add_control_data(&control);
/// test.add_treatment_data(&treatment);
///
/// assert!(test.probability_of_improvement(&mut rng) > 0.9);
/// ```
pub struct ABTest<Pr: ConjugatePrior> {
    control_prior: Pr,
    treatment_prior: Pr,
    control_data: Vec<f64>,
    treatment_data: Vec<f64>,
    control_post: Option<Pr::Posterior>,
    treatment_post: Option<Pr::Posterior>,
    mc_samples: usize,
}

impl ABTest<Beta> {
    /// A rate test with uniform Beta(1, 1) priors on both arms.
    #[must_use]
    pub fn new() -> Self {
        ABTest::with_priors(Beta::uniform(), Beta::uniform())
    }
}

impl Default for ABTest<Beta> {
    fn default() -> Self {
        ABTest::new()
    }
}

impl<Pr> ABTest<Pr>
where
    Pr: ConjugatePrior,
    Pr::Posterior: Posterior,
{
    /// A test with custom priors per arm. Both arms share a prior family;
    /// their parameters may differ.
    pub fn with_priors(control_prior: Pr, treatment_prior: Pr) -> Self {
        ABTest {
            control_prior,
            treatment_prior,
            control_data: Vec::new(),
            treatment_data: Vec::new(),
            control_post: None,
            treatment_post: None,
            mc_samples: DEFAULT_MC_SAMPLES,
        }
    }

    /// Set the Monte Carlo sample count used by the derived statistics.
    #[must_use]
    pub fn with_mc_samples(mut self, mc_samples: usize) -> Self {
        self.mc_samples = mc_samples;
        self
    }

    /// Append observations to the control arm and re-derive its posterior.
    pub fn add_control_data(&mut self, data: &[f64]) {
        self.control_data.extend_from_slice(data);
        self.refresh_posteriors();
    }

    /// Append observations to the treatment arm and re-derive its
    /// posterior.
    pub fn add_treatment_data(&mut self, data: &[f64]) {
        self.treatment_data.extend_from_slice(data);
        self.refresh_posteriors();
    }

    fn refresh_posteriors(&mut self) {
        if !self.control_data.is_empty() {
            self.control_post = Some(
                self.control_prior
                    .update(&self.control_data)
                    .expect("accumulated data is non-empty"),
            );
        }
        if !self.treatment_data.is_empty() {
            self.treatment_post = Some(
                self.treatment_prior
                    .update(&self.treatment_data)
                    .expect("accumulated data is non-empty"),
            );
        }
    }

    /// Control-arm posterior, once the arm has data.
    pub fn control_posterior(&self) -> Option<&Pr::Posterior> {
        self.control_post.as_ref()
    }

    /// Treatment-arm posterior, once the arm has data.
    pub fn treatment_posterior(&self) -> Option<&Pr::Posterior> {
        self.treatment_post.as_ref()
    }

    /// Observations accumulated by the control arm.
    pub fn control_data(&self) -> &[f64] {
        &self.control_data
    }

    /// Observations accumulated by the treatment arm.
    pub fn treatment_data(&self) -> &[f64] {
        &self.treatment_data
    }

    /// Monte Carlo sample count behind the derived statistics.
    #[must_use]
    pub fn mc_samples(&self) -> usize {
        self.mc_samples
    }

    fn paired_draws<R: Rng>(&self, rng: &mut R) -> Option<(Vec<f64>, Vec<f64>)> {
        let control = self.control_post.as_ref()?;
        let treatment = self.treatment_post.as_ref()?;
        Some((
            control.sample(self.mc_samples, rng),
            treatment.sample(self.mc_samples, rng),
        ))
    }

    /// P(treatment > control): the fraction of paired posterior draws
    /// where the treatment sample exceeds the control sample.
    ///
    /// Returns 0.5 while either arm still lacks data.
    pub fn probability_of_improvement<R: Rng>(&self, rng: &mut R) -> f64 {
        match self.paired_draws(rng) {
            None => 0.5,
            Some((control, treatment)) => {
                let wins = treatment
                    .iter()
                    .zip(&control)
                    .filter(|(t, c)| t > c)
                    .count();
                wins as f64 / control.len() as f64
            }
        }
    }

    /// Expected loss of committing to each arm, as
    /// `(control_loss, treatment_loss)`: the mean of the difference in the
    /// arm's disfavor over paired draws.
    ///
    /// Returns `(0.0, 0.0)` while either arm still lacks data.
    pub fn expected_loss<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        match self.paired_draws(rng) {
            None => (0.0, 0.0),
            Some((control, treatment)) => {
                let mut control_loss = 0.0;
                let mut treatment_loss = 0.0;
                for (t, c) in treatment.iter().zip(&control) {
                    let diff = t - c;
                    if diff > 0.0 {
                        control_loss += diff;
                    } else {
                        treatment_loss -= diff;
                    }
                }
                let n = control.len() as f64;
                (control_loss / n, treatment_loss / n)
            }
        }
    }

    /// Central credible interval for treatment − control at `confidence`,
    /// from the empirical quantiles of the paired-draw differences.
    ///
    /// Returns `(0.0, 0.0)` while either arm still lacks data.
    pub fn credible_interval_difference<R: Rng>(
        &self,
        confidence: f64,
        rng: &mut R,
    ) -> (f64, f64) {
        match self.paired_draws(rng) {
            None => (0.0, 0.0),
            Some((control, treatment)) => {
                let mut diffs: Vec<f64> = treatment
                    .iter()
                    .zip(&control)
                    .map(|(t, c)| t - c)
                    .collect();
                diffs.sort_unstable_by(|a, b| {
                    a.partial_cmp(b).expect("posterior draws are finite")
                });

                let tail = (1.0 - confidence) / 2.0;
                (quantile(&diffs, tail), quantile(&diffs, 1.0 - tail))
            }
        }
    }

    /// Relative uplift of treatment over control as
    /// `(mean, lower95, upper95)`. Paired draws whose control sample is at
    /// or below zero are excluded so the ratio stays finite.
    ///
    /// Returns `(0.0, 0.0, 0.0)` while either arm lacks data or when every
    /// draw was excluded.
    pub fn relative_uplift<R: Rng>(&self, rng: &mut R) -> (f64, f64, f64) {
        match self.paired_draws(rng) {
            None => (0.0, 0.0, 0.0),
            Some((control, treatment)) => {
                let uplifts: Vec<f64> = treatment
                    .iter()
                    .zip(&control)
                    .filter(|(_, c)| **c > 0.0)
                    .map(|(t, c)| (t - c) / c)
                    .collect();

                match Summary::from_samples(uplifts) {
                    Ok(summary) => {
                        let (lower, upper) = summary.ci95();
                        (summary.mean(), lower, upper)
                    }
                    Err(_) => (0.0, 0.0, 0.0),
                }
            }
        }
    }

    /// Recommendation derived from fresh improvement and loss estimates.
    pub fn recommendation<R: Rng>(&self, rng: &mut R) -> Recommendation {
        let prob = self.probability_of_improvement(rng);
        let (_, treatment_loss) = self.expected_loss(rng);
        Recommendation::from_evidence(prob, treatment_loss)
    }

    /// Render a text report over all derived statistics.
    pub fn report<R: Rng>(&self, rng: &mut R) -> String {
        let (Some(control), Some(treatment)) =
            (self.control_post.as_ref(), self.treatment_post.as_ref())
        else {
            return String::from("Insufficient data for analysis");
        };

        let control_mean = control.mean().expect("posterior mean is defined");
        let treatment_mean =
            treatment.mean().expect("posterior mean is defined");

        let prob = self.probability_of_improvement(rng);
        let (control_loss, treatment_loss) = self.expected_loss(rng);
        let (diff_lower, diff_upper) =
            self.credible_interval_difference(0.95, rng);
        let (uplift_mean, uplift_lower, uplift_upper) =
            self.relative_uplift(rng);
        let recommendation =
            Recommendation::from_evidence(prob, treatment_loss);

        format!(
            "A/B Test Results:\n\
             =================\n\
             Control:    n={}, mean={:.4}\n\
             Treatment:  n={}, mean={:.4}\n\n\
             Probability of Improvement: {:.2}%\n\
             Expected Loss:\n  \
             - Control:   {:.4}\n  \
             - Treatment: {:.4}\n\n\
             95% Credible Interval for Difference: [{:.4}, {:.4}]\n\
             Relative Uplift: {:.2}% [{:.2}%, {:.2}%]\n\n\
             Recommendation: {}\n",
            self.control_data.len(),
            control_mean,
            self.treatment_data.len(),
            treatment_mean,
            prob * 100.0,
            control_loss,
            treatment_loss,
            diff_lower,
            diff_upper,
            uplift_mean * 100.0,
            uplift_lower * 100.0,
            uplift_upper * 100.0,
            recommendation,
        )
    }
}

/// Qualitative read of the evidence, from fixed decision thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recommendation {
    /// P(improvement) above 0.95 with negligible treatment loss
    Strong,
    /// P(improvement) above 0.80
    Moderate,
    /// P(improvement) below 0.20
    FavorsControl,
    /// Anything in between
    Inconclusive,
}

impl Recommendation {
    /// Classify evidence from the probability of improvement and the
    /// treatment's expected loss.
    #[must_use]
    pub fn from_evidence(prob_improvement: f64, treatment_loss: f64) -> Self {
        if prob_improvement > 0.95 && treatment_loss < 0.01 {
            Recommendation::Strong
        } else if prob_improvement > 0.80 {
            Recommendation::Moderate
        } else if prob_improvement < 0.20 {
            Recommendation::FavorsControl
        } else {
            Recommendation::Inconclusive
        }
    }
}

impl From<&Recommendation> for String {
    fn from(rec: &Recommendation) -> String {
        match rec {
            Recommendation::Strong => {
                "Strong evidence favors treatment. Recommend implementation."
            }
            Recommendation::Moderate => {
                "Moderate evidence favors treatment. Consider implementation \
                 or continue testing."
            }
            Recommendation::FavorsControl => {
                "Evidence favors control. Treatment likely inferior."
            }
            Recommendation::Inconclusive => {
                "Insufficient evidence to make a recommendation. Continue \
                 testing."
            }
        }
        .to_string()
    }
}

impl_display!(Recommendation);
