use crate::core::{TaskId, Ticks, Tier};
use crate::sim::JobId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedCoreEvent {
    Admitted {
        job: JobId,
        tier: Tier,
    },
    Dispatched {
        job: JobId,
        tier: Tier,
        start: Ticks,
        end: Ticks,
    },
    // Preempted job put back on a tier, possibly a different one
    Requeued {
        job: JobId,
        from: Tier,
        to: Tier,
    },
    Completed {
        job: JobId,
        task: TaskId,
        at: Ticks,
    },
    // Nothing runnable; the clock advanced one tick
    Idle {
        at: Ticks,
    },
}
