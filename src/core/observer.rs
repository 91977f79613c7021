use super::state::{KernelCtx, TaskState, Ticks};

/// Invariant checks run after every dispatch iteration. The table sweeps only
/// exist in debug builds.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    last_now: Ticks,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, core: &KernelCtx) {
        self.step += 1;

        debug_assert!(
            core.now >= self.last_now,
            "Clock went backwards: {} -> {}",
            self.last_now,
            core.now
        );
        self.last_now = core.now;

        if let Some(task_id) = core.current {
            let task = core.task(task_id);
            debug_assert_eq!(
                task.state,
                TaskState::Running,
                "current task {task_id} must be Running"
            );
            debug_assert!(task.remaining > 0, "current task {task_id} has no work left");
        }

        #[cfg(debug_assertions)]
        Self::sweep(core);
    }

    #[cfg(debug_assertions)]
    fn sweep(core: &KernelCtx) {
        for (&task_id, &dsq_id) in &core.task_to_dsq {
            let task = core.task(task_id);
            assert_eq!(
                task.state,
                TaskState::Queued,
                "Task {task_id} in DSQ {dsq_id:?} must be Queued"
            );
            assert_eq!(
                core.tier_dsq(task.tier),
                dsq_id,
                "Task {task_id} tier {} disagrees with its DSQ",
                task.tier
            );
        }

        // Together with the per-entry checks above, equal counts mean every
        // queued task has exactly one membership entry
        let queued: usize = core.dsqs.values().map(|dsq| dsq.len()).sum();
        assert_eq!(
            queued,
            core.task_to_dsq.len(),
            "A task is queued without DSQ membership"
        );

        for task in &core.tasks {
            if task.state == TaskState::Completed {
                assert_eq!(task.remaining, 0, "Completed task {} has work left", task.id);
                assert!(task.completion_time.is_some());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Job;

    #[test]
    fn consistent_state_passes() {
        let mut ctx = KernelCtx::new(2);
        let a = ctx.create_task(&Job::new(1, 0, 4, 0));
        ctx.dsq_push_back(1, a);

        let mut observer = Observer::new();
        observer.observe(&ctx);
        ctx.advance_time(3);
        observer.observe(&ctx);
        assert_eq!(observer.steps(), 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "disagrees with its DSQ")]
    fn catches_tier_mismatch() {
        let mut ctx = KernelCtx::new(2);
        let a = ctx.create_task(&Job::new(1, 0, 4, 0));
        ctx.dsq_push_back(1, a);
        ctx.task_mut(a).tier = 0;

        Observer::new().observe(&ctx);
    }
}
