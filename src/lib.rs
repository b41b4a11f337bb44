//! Closed-form Bayesian inference for product analytics.
//!
//! `conjugate` provides the two conjugate prior/posterior pairs that cover
//! most product questions — Beta over a Bernoulli success rate and a Normal
//! mean prior with known observation variance — together with the decision
//! workflows built on top of them: empirical posterior summaries, Bayesian
//! A/B testing, and business-metric estimation (conversion, average order
//! value, retention, churn, customer lifetime value, revenue projection).
//!
//! Updates are exact and closed-form; sampling is the only Monte Carlo in
//! the crate, and every sampling call takes the caller's random number
//! generator, so results are reproducible under a fixed seed.
//!
//! # Example
//!
//! Conjugate analysis of conversion data with a uniform prior:
//!
//! ```
//! use conjugate::prelude::*;
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut rng = SmallRng::seed_from_u64(0x72B5);
//!
//! // 120 conversions out of 1000 visitors, coded as 0/1 data
//! let mut visits = vec![0.0; 1_000];
//! visits[..120].fill(1.0);
//!
//! let prior = Beta::uniform();
//! let posterior = prior.update(&visits).unwrap();
//!
//! assert_eq!(posterior.alpha(), 121.0);
//! assert_eq!(posterior.beta(), 881.0);
//!
//! let (lo, hi) = posterior.credible_interval(0.95);
//! assert!(lo < 0.121 && 0.121 < hi);
//!
//! // Posterior draws feed the summary engine
//! let summary = Summary::from_samples(posterior.sample(10_000, &mut rng)).unwrap();
//! assert!((summary.mean() - 0.121).abs() < 0.01);
//! ```
#![warn(clippy::all)]

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

/// `Display` through `From<&T> for String`
#[macro_export]
macro_rules! impl_display {
    ($kind: ty) => {
        impl std::fmt::Display for $kind {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", String::from(self))
            }
        }
    };
}

pub mod abtest;
pub mod consts;
pub mod data;
pub mod dist;
pub mod metrics;
pub mod misc;
pub mod prelude;
pub mod summary;
pub mod traits;
