pub mod config;
pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use crate::core::{SchedCoreEvent, Slice, TickDelta, Ticks, Tier, Timeline};
pub use error::SimError;
pub use scheduler::{ClassTable, MlfqScheduler, MlqScheduler, PriorityClass, Scheduler};
pub use sim::{Admission, Averages, CompletedJob, Job, JobId, Schedule, Sim};

/// Multi-level queue run with the default priority classes
/// (`..=1` -> tier 0, `..=3` -> tier 1, rest -> tier 2).
pub fn schedule_mlq(jobs: &[Job], quantum: Ticks) -> Result<Schedule, SimError> {
    let scheduler = MlqScheduler::with_quantum(quantum)?;
    Ok(Sim::new(jobs.to_vec(), scheduler, Admission::Upfront)?.run())
}

/// Multi-level feedback queue run over `tiers` tiers with quanta
/// `base_quantum << tier`.
pub fn schedule_mlfq(
    jobs: &[Job],
    tiers: usize,
    base_quantum: Ticks,
) -> Result<Schedule, SimError> {
    let scheduler = MlfqScheduler::new(tiers, base_quantum)?;
    Ok(Sim::new(jobs.to_vec(), scheduler, Admission::Upfront)?.run())
}
