//! Beta is the conjugate prior on the Bernoulli success rate
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use rand::Rng;

use crate::data::BernoulliSuffStat;
use crate::dist::Beta;
use crate::traits::{
    Cdf, ConjugatePrior, ContinuousDistr, Entropy, HasDensity, InverseCdf,
    Mean, Median, Mode, Posterior, Sampleable, SuffStat, Support,
    UpdateError, Variance,
};

fn posterior_from_stat(
    prior: &Beta,
    stat: &BernoulliSuffStat,
) -> BetaPosterior {
    let (n, k) = (stat.n(), stat.k());

    let a = prior.alpha() + k as f64;
    let b = prior.beta() + (n - k) as f64;

    BetaPosterior {
        beta: Beta::new(a, b).expect("posterior parameters stay positive"),
    }
}

impl ConjugatePrior for Beta {
    type Posterior = BetaPosterior;

    /// Derive the Beta posterior over the success rate.
    ///
    /// Each datum greater than zero counts as a success, everything else
    /// as a failure: k successes among n data move Beta(α, β) to
    /// Beta(α + k, β + n − k).
    ///
    /// # Example
    ///
    /// ```
    /// use conjugate::prelude::*;
    ///
    /// let prior = Beta::uniform();
    /// let posterior = prior.update(&[1.0, 0.0, 1.0, 1.0, 0.0]).unwrap();
    ///
    /// assert_eq!(posterior.alpha(), 4.0);
    /// assert_eq!(posterior.beta(), 3.0);
    /// ```
    fn update(&self, data: &[f64]) -> Result<BetaPosterior, UpdateError> {
        if data.is_empty() {
            return Err(UpdateError::EmptyData);
        }

        let mut stat = BernoulliSuffStat::new();
        stat.observe_many(data);

        Ok(posterior_from_stat(self, &stat))
    }
}

/// Beta posterior over a rate.
///
/// A [`Beta`] bundled with interval and point estimation. To keep
/// updating, re-derive from the original prior over all accumulated data,
/// or seed a new prior with [`BetaPosterior::alpha`] and
/// [`BetaPosterior::beta`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct BetaPosterior {
    beta: Beta,
}

impl BetaPosterior {
    /// The underlying Beta distribution.
    #[inline]
    #[must_use]
    pub fn dist(&self) -> &Beta {
        &self.beta
    }

    /// Posterior alpha parameter.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.beta.alpha()
    }

    /// Posterior beta parameter.
    #[inline]
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta.beta()
    }

    /// The posterior mode set.
    #[must_use]
    pub fn modes(&self) -> Vec<f64> {
        self.beta.modes()
    }
}

impl HasDensity<f64> for BetaPosterior {
    fn ln_f(&self, x: &f64) -> f64 {
        self.beta.ln_f(x)
    }
}

impl Sampleable<f64> for BetaPosterior {
    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        self.beta.draw(rng)
    }

    fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        self.beta.sample(n, rng)
    }
}

impl Support<f64> for BetaPosterior {
    fn supports(&self, x: &f64) -> bool {
        self.beta.supports(x)
    }
}

impl ContinuousDistr<f64> for BetaPosterior {}

impl Cdf<f64> for BetaPosterior {
    fn cdf(&self, x: &f64) -> f64 {
        self.beta.cdf(x)
    }
}

impl InverseCdf<f64> for BetaPosterior {
    fn invcdf(&self, p: f64) -> f64 {
        self.beta.invcdf(p)
    }
}

impl Mean<f64> for BetaPosterior {
    fn mean(&self) -> Option<f64> {
        self.beta.mean()
    }
}

impl Median<f64> for BetaPosterior {
    fn median(&self) -> Option<f64> {
        self.beta.median()
    }
}

impl Mode<f64> for BetaPosterior {
    fn mode(&self) -> Option<f64> {
        self.beta.mode()
    }
}

impl Variance<f64> for BetaPosterior {
    fn variance(&self) -> Option<f64> {
        self.beta.variance()
    }
}

impl Entropy for BetaPosterior {
    fn entropy(&self) -> f64 {
        self.beta.entropy()
    }
}

impl Posterior for BetaPosterior {
    /// The posterior mode; the lower boundary value when the density has
    /// no interior peak, the posterior mean if no mode is defined at all.
    fn map_estimate(&self) -> f64 {
        self.modes()
            .first()
            .copied()
            .unwrap_or_else(|| self.beta.mean().expect("Beta mean is defined"))
    }
}
