//! Beta distribution over x in [0, 1]
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use rand::Rng;
use rand_distr::Gamma as RGamma;
use special::Beta as SBeta;
use special::Gamma as SGamma;
use std::fmt;

use crate::impl_display;
use crate::traits::{
    Cdf, ContinuousDistr, Entropy, HasDensity, InverseCdf, Mean, Median,
    Mode, Sampleable, Support, Variance,
};

mod bernoulli_prior;

pub use bernoulli_prior::BetaPosterior;

/// [Beta distribution](https://en.wikipedia.org/wiki/Beta_distribution),
/// Beta(α, β) over x in [0, 1], the workhorse model for bounded rates.
///
/// # Examples
///
/// ```
/// use conjugate::prelude::*;
///
/// // Uniform prior over a conversion rate
/// let beta = Beta::uniform();
/// assert_eq!(beta, Beta::new(1.0, 1.0).unwrap());
///
/// // A symmetric density splits its mass at one half
/// let beta = Beta::new(2.0, 2.0).unwrap();
/// assert!((beta.cdf(&0.5_f64) - 0.5).abs() < 1E-10);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "serde1", serde(try_from = "BetaParameters"))]
#[cfg_attr(feature = "serde1", serde(into = "BetaParameters"))]
pub struct Beta {
    alpha: f64,
    beta: f64,
    /// Cached ln B(α, β)
    ln_beta_ab: f64,
}

impl PartialEq for Beta {
    fn eq(&self, other: &Beta) -> bool {
        self.alpha == other.alpha && self.beta == other.beta
    }
}

/// Plain parameter pair for serialization and interop.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct BetaParameters {
    /// Shape parameter α
    pub alpha: f64,
    /// Shape parameter β
    pub beta: f64,
}

impl TryFrom<BetaParameters> for Beta {
    type Error = BetaError;

    fn try_from(params: BetaParameters) -> Result<Self, Self::Error> {
        Beta::new(params.alpha, params.beta)
    }
}

impl From<Beta> for BetaParameters {
    fn from(beta: Beta) -> Self {
        BetaParameters {
            alpha: beta.alpha,
            beta: beta.beta,
        }
    }
}

/// Error for an invalid Beta parameterization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum BetaError {
    /// The alpha parameter is less than or equal to zero
    AlphaTooLow {
        /// given value
        alpha: f64,
    },
    /// The alpha parameter is infinite or NaN
    AlphaNotFinite {
        /// given value
        alpha: f64,
    },
    /// The beta parameter is less than or equal to zero
    BetaTooLow {
        /// given value
        beta: f64,
    },
    /// The beta parameter is infinite or NaN
    BetaNotFinite {
        /// given value
        beta: f64,
    },
}

impl Beta {
    /// Create a `Beta` distribution with shapes α and β.
    ///
    /// # Errors
    /// Errors if either parameter is non-positive, infinite, or NaN.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use conjugate::dist::Beta;
    /// let beta = Beta::new(2.0, 5.0);
    /// assert!(beta.is_ok());
    ///
    /// let beta_nope = Beta::new(-2.0, 5.0);
    /// assert!(beta_nope.is_err());
    /// ```
    pub fn new(alpha: f64, beta: f64) -> Result<Self, BetaError> {
        if alpha <= 0.0 {
            Err(BetaError::AlphaTooLow { alpha })
        } else if !alpha.is_finite() {
            Err(BetaError::AlphaNotFinite { alpha })
        } else if beta <= 0.0 {
            Err(BetaError::BetaTooLow { beta })
        } else if !beta.is_finite() {
            Err(BetaError::BetaNotFinite { beta })
        } else {
            Ok(Beta::new_unchecked(alpha, beta))
        }
    }

    /// Creates a new Beta without checking whether the parameters are
    /// valid.
    #[inline]
    #[must_use]
    pub fn new_unchecked(alpha: f64, beta: f64) -> Self {
        Beta {
            alpha,
            beta,
            ln_beta_ab: alpha.ln_beta(beta),
        }
    }

    /// Uniform distribution over [0, 1], Beta(1, 1).
    #[inline]
    #[must_use]
    pub fn uniform() -> Self {
        Beta::new_unchecked(1.0, 1.0)
    }

    /// Jeffreys prior, Beta(0.5, 0.5).
    #[inline]
    #[must_use]
    pub fn jeffreys() -> Self {
        Beta::new_unchecked(0.5, 0.5)
    }

    /// Get the alpha parameter.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Get the beta parameter.
    #[inline]
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// The mode set of the density.
    ///
    /// The interior mode (α−1)/(α+β−2) when both shapes exceed one; the
    /// density is bimodal at {0, 1} when both shapes are below one;
    /// otherwise the mass piles on a single boundary.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use conjugate::dist::Beta;
    /// assert_eq!(Beta::new(3.0, 2.0).unwrap().modes(), vec![2.0 / 3.0]);
    /// assert_eq!(Beta::jeffreys().modes(), vec![0.0, 1.0]);
    /// ```
    #[must_use]
    pub fn modes(&self) -> Vec<f64> {
        if self.alpha > 1.0 && self.beta > 1.0 {
            vec![(self.alpha - 1.0) / (self.alpha + self.beta - 2.0)]
        } else if self.alpha < 1.0 && self.beta < 1.0 {
            vec![0.0, 1.0]
        } else if self.alpha < 1.0 {
            vec![0.0]
        } else {
            vec![1.0]
        }
    }
}

impl Default for Beta {
    fn default() -> Self {
        Beta::uniform()
    }
}

impl From<&Beta> for String {
    fn from(beta: &Beta) -> String {
        format!("Beta(α: {}, β: {})", beta.alpha, beta.beta)
    }
}

impl_display!(Beta);

impl HasDensity<f64> for Beta {
    fn ln_f(&self, x: &f64) -> f64 {
        // An exponent of zero contributes exactly zero so the boundary
        // points stay finite for the uniform-like shapes.
        let a_term = if self.alpha == 1.0 {
            0.0
        } else {
            (self.alpha - 1.0) * x.ln()
        };
        let b_term = if self.beta == 1.0 {
            0.0
        } else {
            (self.beta - 1.0) * (1.0 - *x).ln()
        };
        a_term + b_term - self.ln_beta_ab
    }
}

impl Sampleable<f64> for Beta {
    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        let ga = RGamma::new(self.alpha, 1.0).unwrap();
        let gb = RGamma::new(self.beta, 1.0).unwrap();
        let a = rng.sample(ga);
        let b = rng.sample(gb);
        a / (a + b)
    }

    fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let ga = RGamma::new(self.alpha, 1.0).unwrap();
        let gb = RGamma::new(self.beta, 1.0).unwrap();
        (0..n)
            .map(|_| {
                let a = rng.sample(ga);
                let b = rng.sample(gb);
                a / (a + b)
            })
            .collect()
    }
}

impl Support<f64> for Beta {
    fn supports(&self, x: &f64) -> bool {
        (0.0..=1.0).contains(x)
    }
}

impl ContinuousDistr<f64> for Beta {}

impl Cdf<f64> for Beta {
    fn cdf(&self, x: &f64) -> f64 {
        if *x <= 0.0 {
            0.0
        } else if *x >= 1.0 {
            1.0
        } else {
            x.inc_beta(self.alpha, self.beta, self.ln_beta_ab)
        }
    }
}

impl InverseCdf<f64> for Beta {
    fn invcdf(&self, p: f64) -> f64 {
        assert!((0.0..=1.0).contains(&p), "P out of range");
        p.inv_inc_beta(self.alpha, self.beta, self.ln_beta_ab)
    }
}

impl Mean<f64> for Beta {
    fn mean(&self) -> Option<f64> {
        Some(self.alpha / (self.alpha + self.beta))
    }
}

impl Median<f64> for Beta {
    fn median(&self) -> Option<f64> {
        Some(self.invcdf(0.5))
    }
}

impl Mode<f64> for Beta {
    fn mode(&self) -> Option<f64> {
        match self.modes().as_slice() {
            [m] => Some(*m),
            _ => None,
        }
    }
}

impl Variance<f64> for Beta {
    fn variance(&self) -> Option<f64> {
        let apb = self.alpha + self.beta;
        Some(self.alpha * self.beta / (apb * apb * (apb + 1.0)))
    }
}

impl Entropy for Beta {
    fn entropy(&self) -> f64 {
        let apb = self.alpha + self.beta;
        self.ln_beta_ab - (self.alpha - 1.0) * self.alpha.digamma()
            - (self.beta - 1.0) * self.beta.digamma()
            + (apb - 2.0) * apb.digamma()
    }
}

impl std::error::Error for BetaError {}

impl fmt::Display for BetaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlphaTooLow { alpha } => {
                write!(f, "alpha ({alpha}) must be greater than zero")
            }
            Self::AlphaNotFinite { alpha } => {
                write!(f, "non-finite alpha: {alpha}")
            }
            Self::BetaTooLow { beta } => {
                write!(f, "beta ({beta}) must be greater than zero")
            }
            Self::BetaNotFinite { beta } => {
                write!(f, "non-finite beta: {beta}")
            }
        }
    }
}
