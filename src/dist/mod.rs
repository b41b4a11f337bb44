//! Probability distributions and conjugate priors
pub mod beta;
pub mod gaussian;
pub mod normal_conjugate;

pub use self::beta::{Beta, BetaError, BetaParameters, BetaPosterior};
pub use self::gaussian::{Gaussian, GaussianError, GaussianParameters};
pub use self::normal_conjugate::{
    GaussianPosterior, NormalConjugate, NormalConjugateError,
    NormalConjugateParameters,
};
