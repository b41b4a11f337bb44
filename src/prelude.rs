//! Re-imports for convenience
#[doc(no_inline)]
pub use crate::abtest::{ABTest, Recommendation};
#[doc(no_inline)]
pub use crate::data::{BernoulliSuffStat, GaussianSuffStat};
#[doc(no_inline)]
pub use crate::dist::*;
#[doc(no_inline)]
pub use crate::metrics::{BusinessMetrics, MetricEstimate, MetricsError};
#[doc(no_inline)]
pub use crate::summary::{Summary, SummaryError};
#[doc(no_inline)]
pub use crate::traits::*;
