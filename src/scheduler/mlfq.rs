use super::{Discipline, ENQ_ADMIT, EnqueueFlags, KernelCtx, Scheduler, TaskId, Ticks, Tier};
use crate::error::SimError;

/// Multi-level feedback queue. Every task is admitted to tier 0 and drops one
/// tier each time it is preempted. Tier `t` has a quantum of `base << t`; the
/// last tier runs to completion. There is no promotion.
#[derive(Debug, Clone)]
pub struct MlfqScheduler {
    disciplines: Vec<Discipline>,
}

impl MlfqScheduler {
    pub fn new(num_tiers: usize, base_quantum: Ticks) -> Result<Self, SimError> {
        if num_tiers == 0 {
            return Err(SimError::NoTiers);
        }
        if base_quantum == 0 {
            return Err(SimError::ZeroQuantum);
        }

        let last = num_tiers - 1;
        let disciplines = (0..num_tiers)
            .map(|tier| {
                if tier == last {
                    Discipline::Fcfs
                } else {
                    Discipline::RoundRobin {
                        quantum: tier_quantum(base_quantum, tier),
                    }
                }
            })
            .collect();

        Ok(Self { disciplines })
    }

    pub fn discipline(&self, tier: Tier) -> Discipline {
        self.disciplines[tier]
    }

    fn last_tier(&self) -> Tier {
        self.disciplines.len() - 1
    }
}

// base * 2^tier, saturating
fn tier_quantum(base: Ticks, tier: Tier) -> Ticks {
    let scale = u32::try_from(tier)
        .ok()
        .and_then(|shift| 1u64.checked_shl(shift))
        .unwrap_or(u64::MAX);
    base.saturating_mul(scale)
}

impl Scheduler for MlfqScheduler {
    fn name(&self) -> &'static str {
        "MLFQ"
    }

    fn num_tiers(&self) -> usize {
        self.disciplines.len()
    }

    fn enqueue(&mut self, ctx: &mut KernelCtx, task: TaskId, flags: EnqueueFlags) {
        let tier = if flags & ENQ_ADMIT != 0 {
            0
        } else {
            (ctx.task(task).tier + 1).min(self.last_tier())
        };
        ctx.dsq_push_back(tier, task);
    }

    fn slice(&self, ctx: &KernelCtx, task: TaskId, tier: Tier) -> Ticks {
        self.disciplines[tier].slice(ctx.task(task).remaining)
    }
}
