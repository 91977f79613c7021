pub mod class;
pub mod mlfq;
pub mod mlq;

use crate::core::{
    Ticks,
    state::{KernelCtx, TaskId, Tier},
};
pub use class::{ClassTable, PriorityClass};
pub use mlfq::MlfqScheduler;
pub use mlq::MlqScheduler;

pub type EnqueueFlags = u64;

// Task is entering the tier set for the first time
pub const ENQ_ADMIT: EnqueueFlags = 1 << 0;
// Task used up its slice with work left over
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 1;

/// How a tier hands out CPU time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Preempt after at most `quantum` ticks.
    RoundRobin { quantum: Ticks },
    /// Run to completion.
    Fcfs,
}

impl Discipline {
    pub fn slice(&self, remaining: Ticks) -> Ticks {
        match *self {
            Discipline::RoundRobin { quantum } => quantum.min(remaining),
            Discipline::Fcfs => remaining,
        }
    }
}

/// A tiered scheduling policy driven by [`SchedCore`](crate::core::SchedCore).
///
/// The core owns the tiers and always dispatches the head of the lowest
/// numbered non-empty tier. A policy decides which tier a task is put on and
/// how long it may run once popped.
pub trait Scheduler {
    fn name(&self) -> &'static str;

    fn num_tiers(&self) -> usize;

    /// Places `task` on a tier. `flags` tells admission apart from re-queueing
    /// after preemption.
    fn enqueue(&mut self, ctx: &mut KernelCtx, task: TaskId, flags: EnqueueFlags);

    /// Length of the slice granted to `task`, just popped from `tier`.
    fn slice(&self, ctx: &KernelCtx, task: TaskId, tier: Tier) -> Ticks;
}
