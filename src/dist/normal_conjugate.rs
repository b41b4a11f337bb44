//! Normal mean prior with known observation variance
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use rand::Rng;
use std::fmt;

use crate::dist::{Gaussian, GaussianError};
use crate::impl_display;
use crate::traits::{
    Cdf, ContinuousDistr, Entropy, HasDensity, InverseCdf, Mean, Median,
    Mode, Sampleable, Support, Variance,
};

mod gaussian_prior;

pub use gaussian_prior::GaussianPosterior;

/// Conjugate prior over the mean of a Gaussian likelihood whose
/// observation variance is known and fixed.
///
/// The belief about the mean is itself Gaussian, N(μ₀, σ₀);
/// `known_variance` is the assumed noise variance of the observations, not
/// a quantity that gets inferred.
///
/// # Examples
///
/// ```
/// use conjugate::prelude::*;
///
/// // Weekly revenue believed to sit near 100 ± 50, observed with noise
/// // variance 100
/// let prior = NormalConjugate::new(100.0, 50.0, 100.0).unwrap();
/// let posterior = prior.update(&[112.0, 98.0, 105.0]).unwrap();
///
/// // Three observations already overwhelm the wide prior
/// assert!((posterior.mu() - 105.0).abs() < 1.0);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "serde1", serde(try_from = "NormalConjugateParameters"))]
#[cfg_attr(feature = "serde1", serde(into = "NormalConjugateParameters"))]
pub struct NormalConjugate {
    gaussian: Gaussian,
    known_variance: f64,
}

impl PartialEq for NormalConjugate {
    fn eq(&self, other: &NormalConjugate) -> bool {
        self.gaussian == other.gaussian
            && self.known_variance == other.known_variance
    }
}

/// Plain parameter triple for serialization and interop.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct NormalConjugateParameters {
    /// Prior location μ₀
    pub mu: f64,
    /// Prior scale σ₀
    pub sigma: f64,
    /// Fixed observation noise variance
    pub known_variance: f64,
}

impl TryFrom<NormalConjugateParameters> for NormalConjugate {
    type Error = NormalConjugateError;

    fn try_from(
        params: NormalConjugateParameters,
    ) -> Result<Self, Self::Error> {
        NormalConjugate::new(params.mu, params.sigma, params.known_variance)
    }
}

impl From<NormalConjugate> for NormalConjugateParameters {
    fn from(prior: NormalConjugate) -> Self {
        NormalConjugateParameters {
            mu: prior.mu(),
            sigma: prior.sigma(),
            known_variance: prior.known_variance,
        }
    }
}

/// Error for an invalid NormalConjugate parameterization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum NormalConjugateError {
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
    /// The known observation variance is less than or equal to zero
    KnownVarianceTooLow {
        /// given value
        known_variance: f64,
    },
    /// The known observation variance is infinite or NaN
    KnownVarianceNotFinite {
        /// given value
        known_variance: f64,
    },
}

impl From<GaussianError> for NormalConjugateError {
    fn from(err: GaussianError) -> Self {
        match err {
            GaussianError::MuNotFinite { mu } => Self::MuNotFinite { mu },
            GaussianError::SigmaTooLow { sigma } => Self::SigmaTooLow { sigma },
            GaussianError::SigmaNotFinite { sigma } => {
                Self::SigmaNotFinite { sigma }
            }
        }
    }
}

impl NormalConjugate {
    /// Create a prior with location μ₀, scale σ₀, and a fixed observation
    /// noise variance.
    ///
    /// # Errors
    /// Errors if μ₀ is non-finite, or σ₀ or `known_variance` is
    /// non-positive, infinite, or NaN.
    pub fn new(
        mu: f64,
        sigma: f64,
        known_variance: f64,
    ) -> Result<Self, NormalConjugateError> {
        let gaussian = Gaussian::new(mu, sigma)?;
        if known_variance <= 0.0 {
            Err(NormalConjugateError::KnownVarianceTooLow { known_variance })
        } else if !known_variance.is_finite() {
            Err(NormalConjugateError::KnownVarianceNotFinite {
                known_variance,
            })
        } else {
            Ok(NormalConjugate {
                gaussian,
                known_variance,
            })
        }
    }

    /// Creates a new NormalConjugate without checking the parameters.
    #[inline]
    #[must_use]
    pub fn new_unchecked(mu: f64, sigma: f64, known_variance: f64) -> Self {
        NormalConjugate {
            gaussian: Gaussian::new_unchecked(mu, sigma),
            known_variance,
        }
    }

    /// Prior location μ₀.
    #[inline]
    #[must_use]
    pub fn mu(&self) -> f64 {
        self.gaussian.mu()
    }

    /// Prior scale σ₀.
    #[inline]
    #[must_use]
    pub fn sigma(&self) -> f64 {
        self.gaussian.sigma()
    }

    /// Fixed observation noise variance.
    #[inline]
    #[must_use]
    pub fn known_variance(&self) -> f64 {
        self.known_variance
    }

    /// The prior belief as a Gaussian distribution.
    #[inline]
    #[must_use]
    pub fn gaussian(&self) -> &Gaussian {
        &self.gaussian
    }
}

impl From<&NormalConjugate> for String {
    fn from(prior: &NormalConjugate) -> String {
        format!(
            "NormalConjugate(μ₀: {}, σ₀: {}, v: {})",
            prior.mu(),
            prior.sigma(),
            prior.known_variance
        )
    }
}

impl_display!(NormalConjugate);

impl HasDensity<f64> for NormalConjugate {
    fn ln_f(&self, x: &f64) -> f64 {
        self.gaussian.ln_f(x)
    }
}

impl Sampleable<f64> for NormalConjugate {
    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        self.gaussian.draw(rng)
    }

    fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        self.gaussian.sample(n, rng)
    }
}

impl Support<f64> for NormalConjugate {
    fn supports(&self, x: &f64) -> bool {
        self.gaussian.supports(x)
    }
}

impl ContinuousDistr<f64> for NormalConjugate {}

impl Cdf<f64> for NormalConjugate {
    fn cdf(&self, x: &f64) -> f64 {
        self.gaussian.cdf(x)
    }
}

impl InverseCdf<f64> for NormalConjugate {
    fn invcdf(&self, p: f64) -> f64 {
        self.gaussian.invcdf(p)
    }
}

impl Mean<f64> for NormalConjugate {
    fn mean(&self) -> Option<f64> {
        self.gaussian.mean()
    }
}

impl Median<f64> for NormalConjugate {
    fn median(&self) -> Option<f64> {
        self.gaussian.median()
    }
}

impl Mode<f64> for NormalConjugate {
    fn mode(&self) -> Option<f64> {
        self.gaussian.mode()
    }
}

impl Variance<f64> for NormalConjugate {
    fn variance(&self) -> Option<f64> {
        self.gaussian.variance()
    }
}

impl Entropy for NormalConjugate {
    fn entropy(&self) -> f64 {
        self.gaussian.entropy()
    }
}

impl std::error::Error for NormalConjugateError {}

impl fmt::Display for NormalConjugateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MuNotFinite { mu } => write!(f, "non-finite mu: {mu}"),
            Self::SigmaTooLow { sigma } => {
                write!(f, "sigma ({sigma}) must be greater than zero")
            }
            Self::SigmaNotFinite { sigma } => {
                write!(f, "non-finite sigma: {sigma}")
            }
            Self::KnownVarianceTooLow { known_variance } => write!(
                f,
                "known variance ({known_variance}) must be greater than zero"
            ),
            Self::KnownVarianceNotFinite { known_variance } => {
                write!(f, "non-finite known variance: {known_variance}")
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
        let prior = NormalConjugate::new(100.0, 50.0, 100.0).unwrap();
        assert::close(prior.mu(), 100.0, TOL);
        assert::close(prior.sigma(), 50.0, TOL);
        assert::close(prior.known_variance(), 100.0, TOL);
    }

    #[test]
    fn new_should_reject_bad_params() {
        assert!(NormalConjugate::new(f64::NAN, 1.0, 1.0).is_err());
        assert!(NormalConjugate::new(0.0, 0.0, 1.0).is_err());
        assert!(NormalConjugate::new(0.0, 1.0, 0.0).is_err());
        assert!(NormalConjugate::new(0.0, 1.0, -2.0).is_err());
        assert!(NormalConjugate::new(0.0, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn known_variance_error_carries_the_value() {
        let err = NormalConjugate::new(0.0, 1.0, -2.0).unwrap_err();
        assert_eq!(
            err,
            NormalConjugateError::KnownVarianceTooLow { known_variance: -2.0 }
        );
    }

    #[test]
    fn density_matches_the_prior_gaussian() {
        let prior = NormalConjugate::new(1.0, 2.0, 0.5).unwrap();
        let gauss = Gaussian::new(1.0, 2.0).unwrap();
        for x in [-2.0, 0.0, 1.0, 3.5] {
            assert::close(prior.pdf(&x), gauss.pdf(&x), TOL);
        }
    }

    #[test]
    fn moments_match_the_prior_gaussian() {
        let prior = NormalConjugate::new(1.0, 2.0, 0.5).unwrap();
        assert::close(prior.mean().unwrap(), 1.0, TOL);
        assert::close(prior.median().unwrap(), 1.0, TOL);
        assert::close(prior.mode().unwrap(), 1.0, TOL);
        assert::close(prior.variance().unwrap(), 4.0, TOL);
    }
}
