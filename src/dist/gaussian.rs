//! Gaussian/Normal distribution over x in (-∞, ∞)
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use rand::Rng;
use rand_distr::Normal;
use special::Error as _;
use std::f64::consts::SQRT_2;
use std::fmt;

use crate::consts::{HALF_LN_2PI, HALF_LN_2PI_E};
use crate::impl_display;
use crate::traits::{
    Cdf, ContinuousDistr, Entropy, HasDensity, InverseCdf, Mean, Median,
    Mode, Sampleable, Support, Variance,
};

/// Gaussian / [Normal distribution](https://en.wikipedia.org/wiki/Normal_distribution),
/// N(μ, σ) over real values.
///
/// # Examples
///
/// ```
/// use conjugate::prelude::*;
///
/// let gauss = Gaussian::new(2.0, 1.5).unwrap();
///
/// // The cdf at the mean is always one half
/// assert!((gauss.cdf(&2.0_f64) - 0.5).abs() < 1E-12);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "serde1", serde(try_from = "GaussianParameters"))]
#[cfg_attr(feature = "serde1", serde(into = "GaussianParameters"))]
pub struct Gaussian {
    /// Mean
    mu: f64,
    /// Standard deviation
    sigma: f64,
    /// Cached log(sigma)
    ln_sigma: f64,
}

impl PartialEq for Gaussian {
    fn eq(&self, other: &Gaussian) -> bool {
        self.mu == other.mu && self.sigma == other.sigma
    }
}

/// Plain parameter pair for serialization and interop.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct GaussianParameters {
    /// Mean
    pub mu: f64,
    /// Standard deviation
    pub sigma: f64,
}

impl TryFrom<GaussianParameters> for Gaussian {
    type Error = GaussianError;

    fn try_from(params: GaussianParameters) -> Result<Self, Self::Error> {
        Gaussian::new(params.mu, params.sigma)
    }
}

impl From<Gaussian> for GaussianParameters {
    fn from(gauss: Gaussian) -> Self {
        GaussianParameters {
            mu: gauss.mu,
            sigma: gauss.sigma,
        }
    }
}

/// Error for an invalid Gaussian parameterization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum GaussianError {
    /// The mu parameter is infinite or NaN
    MuNotFinite {
        /// given value
        mu: f64,
    },
    /// The sigma parameter is less than or equal to zero
    SigmaTooLow {
        /// given value
        sigma: f64,
    },
    /// The sigma parameter is infinite or NaN
    SigmaNotFinite {
        /// given value
        sigma: f64,
    },
}

impl Gaussian {
    /// Create a new Gaussian distribution
    ///
    /// # Arguments
    /// - mu: mean
    /// - sigma: standard deviation
    ///
    /// # Errors
    /// Errors if `mu` is non-finite or `sigma` is non-positive, infinite,
    /// or NaN.
    pub fn new(mu: f64, sigma: f64) -> Result<Self, GaussianError> {
        if !mu.is_finite() {
            Err(GaussianError::MuNotFinite { mu })
        } else if sigma <= 0.0 {
            Err(GaussianError::SigmaTooLow { sigma })
        } else if !sigma.is_finite() {
            Err(GaussianError::SigmaNotFinite { sigma })
        } else {
            Ok(Gaussian::new_unchecked(mu, sigma))
        }
    }

    /// Creates a new Gaussian without checking whether the parameters are
    /// valid.
    #[inline]
    #[must_use]
    pub fn new_unchecked(mu: f64, sigma: f64) -> Self {
        Gaussian {
            mu,
            sigma,
            ln_sigma: sigma.ln(),
        }
    }

    /// Standard normal
    ///
    /// # Example
    ///
    /// ```rust
    /// # use conjugate::dist::Gaussian;
    /// let gauss = Gaussian::standard();
    ///
    /// assert_eq!(gauss, Gaussian::new(0.0, 1.0).unwrap());
    /// ```
    #[inline]
    #[must_use]
    pub fn standard() -> Self {
        Gaussian {
            mu: 0.0,
            sigma: 1.0,
            ln_sigma: 0.0,
        }
    }

    /// Get mu parameter
    #[inline]
    #[must_use]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Get sigma parameter
    #[inline]
    #[must_use]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Default for Gaussian {
    fn default() -> Self {
        Gaussian::standard()
    }
}

impl From<&Gaussian> for String {
    fn from(gauss: &Gaussian) -> String {
        format!("N(μ: {}, σ: {})", gauss.mu, gauss.sigma)
    }
}

impl_display!(Gaussian);

impl HasDensity<f64> for Gaussian {
    fn ln_f(&self, x: &f64) -> f64 {
        let k = (*x - self.mu) / self.sigma;
        (0.5 * k).mul_add(-k, -self.ln_sigma) - HALF_LN_2PI
    }
}

impl Sampleable<f64> for Gaussian {
    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        let g = Normal::new(self.mu, self.sigma).unwrap();
        rng.sample(g)
    }

    fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let g = Normal::new(self.mu, self.sigma).unwrap();
        (0..n).map(|_| rng.sample(g)).collect()
    }
}

impl ContinuousDistr<f64> for Gaussian {}

impl Support<f64> for Gaussian {
    fn supports(&self, x: &f64) -> bool {
        x.is_finite()
    }
}

impl Cdf<f64> for Gaussian {
    fn cdf(&self, x: &f64) -> f64 {
        let errf = ((*x - self.mu) / (self.sigma * SQRT_2)).error();
        0.5 * (1.0 + errf)
    }
}

impl InverseCdf<f64> for Gaussian {
    fn invcdf(&self, p: f64) -> f64 {
        assert!((0.0..=1.0).contains(&p), "P out of range");

        (self.sigma * SQRT_2)
            .mul_add(2.0_f64.mul_add(p, -1.0).inv_error(), self.mu)
    }
}

impl Mean<f64> for Gaussian {
    fn mean(&self) -> Option<f64> {
        Some(self.mu)
    }
}

impl Median<f64> for Gaussian {
    fn median(&self) -> Option<f64> {
        Some(self.mu)
    }
}

impl Mode<f64> for Gaussian {
    fn mode(&self) -> Option<f64> {
        Some(self.mu)
    }
}

impl Variance<f64> for Gaussian {
    fn variance(&self) -> Option<f64> {
        Some(self.sigma * self.sigma)
    }
}

impl Entropy for Gaussian {
    fn entropy(&self) -> f64 {
        HALF_LN_2PI_E + self.ln_sigma
    }
}

impl std::error::Error for GaussianError {}

impl fmt::Display for GaussianError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MuNotFinite { mu } => write!(f, "non-finite mu: {mu}"),
            Self::SigmaTooLow { sigma } => {
                write!(f, "sigma ({sigma}) must be greater than zero")
            }
            Self::SigmaNotFinite { sigma } => {
                write!(f, "non-finite sigma: {sigma}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1E-12;

    #[test]
    fn new() {
        let gauss = Gaussian::new(1.2, 3.0).unwrap();
        assert::close(gauss.mu, 1.2, TOL);
        assert::close(gauss.sigma, 3.0, TOL);
    }

    #[test]
    fn new_should_reject_bad_params() {
        assert!(Gaussian::new(f64::NAN, 1.0).is_err());
        assert!(Gaussian::new(f64::INFINITY, 1.0).is_err());
        assert!(Gaussian::new(0.0, 0.0).is_err());
        assert!(Gaussian::new(0.0, -1.0).is_err());
        assert!(Gaussian::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn standard() {
        let gauss = Gaussian::standard();
        assert::close(gauss.mu, 0.0, TOL);
        assert::close(gauss.sigma, 1.0, TOL);
    }

    #[test]
    fn mean_median_and_mode_are_mu() {
        let mu = 3.4;
        let gauss = Gaussian::new(mu, 0.5).unwrap();
        assert::close(gauss.mean().unwrap(), mu, TOL);
        assert::close(gauss.median().unwrap(), mu, TOL);
        assert::close(gauss.mode().unwrap(), mu, TOL);
    }

    #[test]
    fn variance_should_be_sigma_squared() {
        let sigma = 0.5;
        let gauss = Gaussian::new(3.4, sigma).unwrap();
        assert::close(gauss.variance().unwrap(), sigma * sigma, TOL);
    }

    #[test]
    fn draws_should_be_finite() {
        let mut rng = rand::thread_rng();
        let gauss = Gaussian::standard();
        for _ in 0..100 {
            let x: f64 = gauss.draw(&mut rng);
            assert!(x.is_finite());
        }
    }

    #[test]
    fn sample_length() {
        let mut rng = rand::thread_rng();
        let gauss = Gaussian::standard();
        let xs: Vec<f64> = gauss.sample(10, &mut rng);
        assert_eq!(xs.len(), 10);
    }

    #[test]
    fn standard_ln_pdf_at_zero() {
        let gauss = Gaussian::standard();
        assert::close(gauss.ln_pdf(&0.0_f64), -0.918_938_533_204_672_7, TOL);
    }

    #[test]
    fn standard_ln_pdf_off_zero() {
        let gauss = Gaussian::standard();
        assert::close(gauss.ln_pdf(&2.1_f64), -3.123_938_533_204_672_7, TOL);
    }

    #[test]
    fn nonstandard_ln_pdf_on_mean() {
        let gauss = Gaussian::new(-1.2, 0.33).unwrap();
        assert::close(gauss.ln_pdf(&-1.2_f64), 0.189_724_091_316_938_46, TOL);
    }

    #[test]
    fn should_contain_finite_values() {
        let gauss = Gaussian::standard();
        assert!(gauss.supports(&10E8_f64));
        assert!(gauss.supports(&-10E8_f64));
    }

    #[test]
    fn should_not_contain_nan_or_infinity() {
        let gauss = Gaussian::standard();
        assert!(!gauss.supports(&f64::NAN));
        assert!(!gauss.supports(&f64::INFINITY));
        assert!(!gauss.supports(&f64::NEG_INFINITY));
    }

    #[test]
    fn cdf_at_mean_should_be_one_half() {
        let mu = 2.3;
        let gauss = Gaussian::new(mu, 0.2).unwrap();
        assert::close(gauss.cdf(&mu), 0.5, TOL);
    }

    #[test]
    fn cdf_value_at_one() {
        let gauss = Gaussian::standard();
        assert::close(gauss.cdf(&1.0_f64), 0.841_344_746_068_542_9, TOL);
    }

    #[test]
    fn cdf_value_at_neg_two() {
        let gauss = Gaussian::standard();
        assert::close(gauss.cdf(&-2.0_f64), 0.022_750_131_948_179_195, TOL);
    }

    #[test]
    fn quantile_at_one_half_should_be_mu() {
        let mu = 1.2315;
        let gauss = Gaussian::new(mu, 1.0).unwrap();
        let x: f64 = gauss.quantile(0.5);
        assert::close(x, mu, TOL);
    }

    #[test]
    fn quantile_agrees_with_cdf() {
        let gauss = Gaussian::new(1.5, 2.0).unwrap();
        for p in [0.01, 0.25, 0.5, 0.75, 0.99] {
            let x = gauss.invcdf(p);
            assert::close(gauss.cdf(&x), p, 1E-9);
        }
    }

    #[test]
    fn standard_gaussian_entropy() {
        let gauss = Gaussian::standard();
        assert::close(gauss.entropy(), 1.418_938_533_204_672_7, TOL);
    }

    #[test]
    fn entropy() {
        let gauss = Gaussian::new(3.0, 12.3).unwrap();
        assert::close(gauss.entropy(), 3.928_537_795_583_044_7, TOL);
    }
}
