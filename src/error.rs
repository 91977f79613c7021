use thiserror::Error;

use crate::core::Tier;
use crate::sim::JobId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("job {0} has a burst time of zero")]
    ZeroBurst(JobId),

    #[error("job id {0} appears more than once")]
    DuplicateJob(JobId),

    #[error("latest arrival plus total burst time does not fit the clock")]
    HorizonOverflow,

    #[error("time quantum must be positive")]
    ZeroQuantum,

    #[error("feedback queue needs at least one tier")]
    NoTiers,

    #[error("class table targets tier {tier}, but only {num_tiers} tiers exist")]
    TierOutOfRange { tier: Tier, num_tiers: usize },

    #[error("class bound {bound} does not exceed the previous bound {previous}")]
    UnsortedClasses { bound: i64, previous: i64 },
}
