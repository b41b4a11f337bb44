//! NormalConjugate is the conjugate prior on a Gaussian mean with known
//! observation variance
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use rand::Rng;

use crate::data::GaussianSuffStat;
use crate::dist::{Gaussian, NormalConjugate};
use crate::traits::{
    Cdf, ConjugatePrior, ContinuousDistr, Entropy, HasDensity, InverseCdf,
    Mean, Median, Mode, Posterior, Sampleable, SuffStat, Support,
    UpdateError, Variance,
};

fn posterior_from_stat(
    prior: &NormalConjugate,
    stat: &GaussianSuffStat,
) -> GaussianPosterior {
    let n = stat.n() as f64;
    let x_bar = stat.mean();

    // Precision-weighted combination of prior belief and data
    let tau_0 = (prior.sigma() * prior.sigma()).recip();
    let tau = prior.known_variance().recip();

    let tau_post = n.mul_add(tau, tau_0);
    let mu_post = n.mul_add(tau * x_bar, tau_0 * prior.mu()) / tau_post;
    let sigma_post = tau_post.recip().sqrt();

    GaussianPosterior {
        gaussian: Gaussian::new(mu_post, sigma_post)
            .expect("posterior parameters stay positive"),
    }
}

impl ConjugatePrior for NormalConjugate {
    type Posterior = GaussianPosterior;

    /// Derive the Gaussian posterior over the mean.
    ///
    /// With prior precision τ₀ = 1/σ₀², observation precision τ = 1/v, and
    /// n observations averaging x̄: τ' = τ₀ + nτ, μ' = (τ₀μ₀ + nτx̄) / τ',
    /// σ' = √(1/τ').
    ///
    /// # Example
    ///
    /// ```
    /// use conjugate::prelude::*;
    ///
    /// let prior = NormalConjugate::new(0.0, 1.0, 1.0).unwrap();
    /// let posterior = prior.update(&[2.0]).unwrap();
    ///
    /// // Equal prior and observation precision meet in the middle
    /// assert!((posterior.mu() - 1.0).abs() < 1E-12);
    /// ```
    fn update(&self, data: &[f64]) -> Result<GaussianPosterior, UpdateError> {
        if data.is_empty() {
            return Err(UpdateError::EmptyData);
        }

        let mut stat = GaussianSuffStat::new();
        stat.observe_many(data);

        Ok(posterior_from_stat(self, &stat))
    }
}

/// Gaussian posterior over a mean.
///
/// A [`Gaussian`] bundled with interval and point estimation. To keep
/// updating, re-derive from the original prior over all accumulated data,
/// or seed a new prior with [`GaussianPosterior::mu`] and
/// [`GaussianPosterior::sigma`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct GaussianPosterior {
    gaussian: Gaussian,
}

impl GaussianPosterior {
    /// The underlying Gaussian distribution.
    #[inline]
    #[must_use]
    pub fn dist(&self) -> &Gaussian {
        &self.gaussian
    }

    /// Posterior location.
    #[inline]
    #[must_use]
    pub fn mu(&self) -> f64 {
        self.gaussian.mu()
    }

    /// Posterior scale.
    #[inline]
    #[must_use]
    pub fn sigma(&self) -> f64 {
        self.gaussian.sigma()
    }
}

impl HasDensity<f64> for GaussianPosterior {
    fn ln_f(&self, x: &f64) -> f64 {
        self.gaussian.ln_f(x)
    }
}

impl Sampleable<f64> for GaussianPosterior {
    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        self.gaussian.draw(rng)
    }

    fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        self.gaussian.sample(n, rng)
    }
}

impl Support<f64> for GaussianPosterior {
    fn supports(&self, x: &f64) -> bool {
        self.gaussian.supports(x)
    }
}

impl ContinuousDistr<f64> for GaussianPosterior {}

impl Cdf<f64> for GaussianPosterior {
    fn cdf(&self, x: &f64) -> f64 {
        self.gaussian.cdf(x)
    }
}

impl InverseCdf<f64> for GaussianPosterior {
    fn invcdf(&self, p: f64) -> f64 {
        self.gaussian.invcdf(p)
    }
}

impl Mean<f64> for GaussianPosterior {
    fn mean(&self) -> Option<f64> {
        self.gaussian.mean()
    }
}

impl Median<f64> for GaussianPosterior {
    fn median(&self) -> Option<f64> {
        self.gaussian.median()
    }
}

impl Mode<f64> for GaussianPosterior {
    fn mode(&self) -> Option<f64> {
        self.gaussian.mode()
    }
}

impl Variance<f64> for GaussianPosterior {
    fn variance(&self) -> Option<f64> {
        self.gaussian.variance()
    }
}

impl Entropy for GaussianPosterior {
    fn entropy(&self) -> f64 {
        self.gaussian.entropy()
    }
}

impl Posterior for GaussianPosterior {
    /// The posterior mode, which for a Gaussian is its mean.
    fn map_estimate(&self) -> f64 {
        self.gaussian.mu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1E-10;

    #[test]
    fn update_matches_direct_formulas() {
        let prior = NormalConjugate::new(1.0, 2.0, 0.25).unwrap();
        let data = [1.2, 0.8, 1.5, 0.9];
        let posterior = prior.update(&data).unwrap();

        let n = data.len() as f64;
        let x_bar = data.iter().sum::<f64>() / n;
        let tau_0 = 1.0 / (2.0 * 2.0);
        let tau = 1.0 / 0.25;
        let tau_post = tau_0 + n * tau;
        let expected_mu = (tau_0 * 1.0 + n * tau * x_bar) / tau_post;
        let expected_sigma = (1.0 / tau_post).sqrt();

        assert::close(posterior.mu(), expected_mu, TOL);
        assert::close(posterior.sigma(), expected_sigma, TOL);
    }

    #[test]
    fn update_rejects_empty_data() {
        let prior = NormalConjugate::new(0.0, 1.0, 1.0).unwrap();
        assert_eq!(prior.update(&[]).unwrap_err(), UpdateError::EmptyData);
    }

    #[test]
    fn update_single_matches_update_on_one_element() {
        let prior = NormalConjugate::new(-2.0, 1.5, 0.5).unwrap();
        assert_eq!(prior.update_single(3.3), prior.update(&[3.3]).unwrap());
    }

    #[test]
    fn update_does_not_mutate_the_prior() {
        let prior = NormalConjugate::new(1.0, 2.0, 0.25).unwrap();
        let _ = prior.update(&[5.0, 6.0]).unwrap();
        assert::close(prior.mu(), 1.0, TOL);
        assert::close(prior.sigma(), 2.0, TOL);
    }

    #[test]
    fn tight_prior_dominates_sparse_data() {
        let prior = NormalConjugate::new(0.0, 0.001, 1.0).unwrap();
        let posterior = prior.update(&[100.0]).unwrap();
        assert!(posterior.mu().abs() < 0.01);
    }

    #[test]
    fn data_overwhelms_a_wide_prior() {
        let prior = NormalConjugate::new(0.0, 1000.0, 1.0).unwrap();
        let data = vec![5.0; 50];
        let posterior = prior.update(&data).unwrap();
        assert::close(posterior.mu(), 5.0, 1E-5);
    }

    #[test]
    fn posterior_is_narrower_than_the_prior() {
        let prior = NormalConjugate::new(0.0, 2.0, 1.0).unwrap();
        let posterior = prior.update(&[0.5]).unwrap();
        assert!(posterior.sigma() < prior.sigma());
    }

    #[test]
    fn hpd_equals_the_central_interval_and_is_symmetric() {
        let prior = NormalConjugate::new(0.0, 1.0, 1.0).unwrap();
        let posterior = prior.update(&[1.0, 2.0, 0.5]).unwrap();

        let (lo, hi) = posterior.credible_interval(0.95);
        assert_eq!(posterior.hpd_interval(0.95), (lo, hi));
        assert::close((lo + hi) / 2.0, posterior.mu(), 1E-9);
    }

    #[test]
    fn map_is_the_posterior_mean() {
        let prior = NormalConjugate::new(0.0, 1.0, 1.0).unwrap();
        let posterior = prior.update(&[2.0, 3.0]).unwrap();
        assert::close(posterior.map_estimate(), posterior.mu(), TOL);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn posterior_matches_direct_formulas(
            mu0 in -10.0..10.0_f64,
            sigma0 in 0.1..5.0_f64,
            known_variance in 0.1..5.0_f64,
            data in proptest::collection::vec(-10.0..10.0_f64, 1..50),
        ) {
            let prior =
                NormalConjugate::new(mu0, sigma0, known_variance).unwrap();
            let posterior = prior.update(&data).unwrap();

            let n = data.len() as f64;
            let x_bar = data.iter().sum::<f64>() / n;
            let tau_0 = 1.0 / (sigma0 * sigma0);
            let tau = 1.0 / known_variance;
            let tau_post = tau_0 + n * tau;
            let expected_mu = (tau_0 * mu0 + n * tau * x_bar) / tau_post;
            let expected_sigma = (1.0 / tau_post).sqrt();

            prop_assert!((posterior.mu() - expected_mu).abs() < 1E-9);
            prop_assert!((posterior.sigma() - expected_sigma).abs() < 1E-9);
        }
    }
}
