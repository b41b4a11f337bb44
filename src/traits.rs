//! Capability traits for distributions, priors, and posteriors.
//!
//! Distributions advertise what they can do through small, single-purpose
//! traits rather than one monolithic interface; `Beta` and `Gaussian` are
//! independent types satisfying the same contracts. The inference layer
//! adds [`ConjugatePrior`] for closed-form updating and [`Posterior`] for
//! interval and point estimates over the updated density.

use rand::Rng;
use std::fmt;

/// Probability density over values of type `X`.
pub trait HasDensity<X> {
    /// Probability density at `x`, with no support check.
    fn f(&self, x: &X) -> f64 {
        self.ln_f(x).exp()
    }

    /// Log density at `x`, with no support check.
    fn ln_f(&self, x: &X) -> f64;
}

/// Draw random values of type `X`.
pub trait Sampleable<X> {
    /// Single draw.
    fn draw<R: Rng>(&self, rng: &mut R) -> X;

    /// Multiple independent draws, in draw order.
    ///
    /// Implemented as repeated single draws with no state shared between
    /// them, so the output sequence is index-addressable and reproducible
    /// for a fixed `rng` seed and call order.
    fn sample<R: Rng>(&self, n: usize, mut rng: &mut R) -> Vec<X> {
        (0..n).map(|_| self.draw(&mut rng)).collect()
    }
}

/// Identifies the support of the distribution.
pub trait Support<X> {
    /// Returns `true` if `x` is in the support.
    fn supports(&self, x: &X) -> bool;
}

/// Continuous probability distribution.
///
/// The provided `pdf`/`ln_pdf` guard the raw density with the support:
/// outside it the density is a defined zero (`ln_pdf` returns -∞), never
/// NaN.
pub trait ContinuousDistr<X>: HasDensity<X> + Support<X> {
    /// Value of the PDF at `x`; 0.0 outside the support.
    fn pdf(&self, x: &X) -> f64 {
        self.ln_pdf(x).exp()
    }

    /// Value of the log PDF at `x`; -∞ outside the support.
    fn ln_pdf(&self, x: &X) -> f64 {
        if self.supports(x) {
            self.ln_f(x)
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// Cumulative distribution function.
pub trait Cdf<X>: HasDensity<X> {
    /// Probability that a value is less than or equal to `x`.
    fn cdf(&self, x: &X) -> f64;

    /// Survival function, `1 - cdf(x)`.
    fn sf(&self, x: &X) -> f64 {
        1.0 - self.cdf(x)
    }
}

/// Inverse CDF (quantile function).
pub trait InverseCdf<X>: HasDensity<X> {
    /// The value of `x` at the given CDF probability.
    ///
    /// # Panics
    /// Panics if `p` is outside [0, 1].
    fn invcdf(&self, p: f64) -> X;

    /// Alias for `invcdf`.
    fn quantile(&self, p: f64) -> X {
        self.invcdf(p)
    }

    /// Central interval containing probability mass `p`.
    fn interval(&self, p: f64) -> (X, X) {
        let pt = (1.0 - p) / 2.0;
        (self.invcdf(pt), self.invcdf(p + pt))
    }
}

/// Expected value.
pub trait Mean<M> {
    /// Returns `None` if the mean is undefined.
    fn mean(&self) -> Option<M>;
}

/// The median, the 0.5 quantile.
pub trait Median<M> {
    /// Returns `None` if the median is undefined.
    fn median(&self) -> Option<M>;
}

/// The value where the density is highest.
pub trait Mode<M> {
    /// Returns `None` if no single mode exists.
    fn mode(&self) -> Option<M>;
}

/// Variance.
pub trait Variance<V> {
    /// Returns `None` if the variance is undefined.
    fn variance(&self) -> Option<V>;
}

/// Standard deviation, derived from [`Variance`].
pub trait StdDev: Variance<f64> {
    /// Square root of the variance.
    fn stddev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}

impl<T: Variance<f64>> StdDev for T {}

/// Differential entropy.
pub trait Entropy {
    /// The differential entropy in nats.
    fn entropy(&self) -> f64;
}

/// Incrementally collected summary of observed data that is sufficient for
/// a closed-form posterior.
pub trait SuffStat<X> {
    /// Number of observations assimilated.
    fn n(&self) -> usize;

    /// Assimilate the datum `x`.
    fn observe(&mut self, x: &X);

    /// Remove the datum `x`.
    fn forget(&mut self, x: &X);

    /// Assimilate several observations.
    fn observe_many(&mut self, xs: &[X]) {
        xs.iter().for_each(|x| self.observe(x));
    }

    /// Forget several observations.
    fn forget_many(&mut self, xs: &[X]) {
        xs.iter().for_each(|x| self.forget(x));
    }
}

/// Error from deriving a posterior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateError {
    /// The data sequence was empty
    EmptyData,
}

impl std::error::Error for UpdateError {}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyData => {
                write!(f, "cannot update on an empty data sequence")
            }
        }
    }
}

/// A prior admitting a closed-form posterior under its natural likelihood.
///
/// Priors are immutable: `update` derives a fresh posterior value and
/// leaves the prior untouched, so one prior can serve any number of
/// independent updates. Posteriors are not priors themselves; to keep
/// updating, re-derive from the original prior over all data seen so far,
/// or seed a new prior from the posterior's parameters.
pub trait ConjugatePrior {
    /// The posterior distribution type.
    type Posterior;

    /// Derive the posterior from `data`.
    ///
    /// # Errors
    /// Returns [`UpdateError::EmptyData`] if `data` is empty.
    fn update(&self, data: &[f64]) -> Result<Self::Posterior, UpdateError>;

    /// Derive the posterior from a single observation.
    ///
    /// Defined as `update` over the one-element sequence, so the result is
    /// numerically identical to `update(&[x])`.
    fn update_single(&self, x: f64) -> Self::Posterior {
        self.update(std::slice::from_ref(&x))
            .expect("a single observation is never empty")
    }
}

/// Interval and point estimates over an updated density.
pub trait Posterior: Sampleable<f64> + InverseCdf<f64> + Mean<f64> {
    /// Central (equal-tailed) credible interval at `confidence`.
    fn credible_interval(&self, confidence: f64) -> (f64, f64) {
        self.interval(confidence)
    }

    /// Maximum a posteriori estimate.
    fn map_estimate(&self) -> f64;

    /// Highest posterior density interval at `confidence`.
    ///
    /// Equated with the central credible interval rather than searched
    /// numerically: exact for symmetric posteriors, an approximation for
    /// skewed ones.
    fn hpd_interval(&self, confidence: f64) -> (f64, f64) {
        self.credible_interval(confidence)
    }
}
