use super::{
    ClassTable, Discipline, ENQ_ADMIT, EnqueueFlags, KernelCtx, Scheduler, TaskId, Ticks, Tier,
};
use crate::error::SimError;

pub const MLQ_TIERS: usize = 3;

/// Multi-level queue: static priority classes, two round-robin tiers over a
/// run-to-completion tier. A task never leaves the tier it was admitted to.
#[derive(Debug, Clone)]
pub struct MlqScheduler {
    classes: ClassTable,
    disciplines: [Discipline; MLQ_TIERS],
}

impl MlqScheduler {
    pub fn new(quantum: Ticks, classes: ClassTable) -> Result<Self, SimError> {
        if quantum == 0 {
            return Err(SimError::ZeroQuantum);
        }
        classes.validate(MLQ_TIERS)?;

        let rr = Discipline::RoundRobin { quantum };
        Ok(Self {
            classes,
            disciplines: [rr, rr, Discipline::Fcfs],
        })
    }

    pub fn with_quantum(quantum: Ticks) -> Result<Self, SimError> {
        Self::new(quantum, ClassTable::default())
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub fn discipline(&self, tier: Tier) -> Discipline {
        self.disciplines[tier]
    }
}

impl Scheduler for MlqScheduler {
    fn name(&self) -> &'static str {
        "MLQ"
    }

    fn num_tiers(&self) -> usize {
        MLQ_TIERS
    }

    fn enqueue(&mut self, ctx: &mut KernelCtx, task: TaskId, flags: EnqueueFlags) {
        let tier = if flags & ENQ_ADMIT != 0 {
            self.classes.classify(ctx.task(task).priority)
        } else {
            ctx.task(task).tier
        };
        ctx.dsq_push_back(tier, task);
    }

    fn slice(&self, ctx: &KernelCtx, task: TaskId, tier: Tier) -> Ticks {
        self.disciplines[tier].slice(ctx.task(task).remaining)
    }
}
