use log::{debug, trace};

use super::{
    event::SchedCoreEvent,
    observer::Observer,
    state::{KernelCtx, TaskId, Ticks},
    timeline::{Slice, Timeline},
};
use crate::scheduler::{ENQ_ADMIT, ENQ_PREEMPT, EnqueueFlags, Scheduler};
use crate::sim::Job;

pub struct SchedCore<S: Scheduler> {
    pub ctx: KernelCtx,
    pub scheduler: S,
    timeline: Timeline,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(scheduler: S) -> Self {
        let ctx = KernelCtx::new(scheduler.num_tiers());
        Self {
            ctx,
            scheduler,
            timeline: Timeline::new(),
            observer: Observer::new(),
        }
    }

    /// Creates a task for `job` and lets the policy classify it.
    pub fn admit(&mut self, job: &Job) -> (TaskId, SchedCoreEvent) {
        let task = self.ctx.create_task(job);
        self.scheduler.enqueue(&mut self.ctx, task, ENQ_ADMIT);

        let tier = self.ctx.task(task).tier;
        trace!("t={} admit job {} on tier {}", self.ctx.now, job.id, tier);
        (task, SchedCoreEvent::Admitted { job: job.id, tier })
    }

    /// One dispatch iteration:
    /// 1. Put the task preempted by the previous slice back on a tier
    /// 2. Pop the head of the highest-priority non-empty tier
    /// 3. Run it for the slice its policy grants, then complete it or keep it
    ///    on the CPU until the next iteration
    ///
    /// With nothing runnable the clock moves forward a single tick.
    pub fn tick(&mut self) -> Vec<SchedCoreEvent> {
        let mut events = Vec::new();

        if let Some(task) = self.ctx.take_current() {
            events.push(self.requeue(task));
        }

        match self.ctx.dsq_pop_first() {
            Some((tier, task)) => self.run(task, tier, &mut events),
            None => {
                self.ctx.advance_time(1);
                trace!("t={} idle", self.ctx.now);
                events.push(SchedCoreEvent::Idle { at: self.ctx.now });
            }
        }

        self.observer.observe(&self.ctx);
        events
    }

    fn run(&mut self, task: TaskId, tier: usize, events: &mut Vec<SchedCoreEvent>) {
        self.ctx.set_running(task);

        let slice = self.scheduler.slice(&self.ctx, task, tier);
        let start = self.ctx.now;
        let remaining = self.ctx.run_slice(task, slice);
        let end = self.ctx.now;
        let job = self.ctx.task(task).job_id;

        debug!("[{start}, {end}) job {job} on tier {tier}, {remaining} left");
        self.timeline.record(Slice {
            job,
            tier,
            start,
            end,
        });
        events.push(SchedCoreEvent::Dispatched {
            job,
            tier,
            start,
            end,
        });

        if remaining == 0 {
            self.ctx.mark_completed(task);
            debug!("t={end} job {job} completed");
            events.push(SchedCoreEvent::Completed { job, task, at: end });
        } else {
            self.ctx.current = Some(task);
        }
    }

    fn requeue(&mut self, task: TaskId) -> SchedCoreEvent {
        let from = self.ctx.task(task).tier;
        let flags: EnqueueFlags = ENQ_PREEMPT;
        self.scheduler.enqueue(&mut self.ctx, task, flags);

        let to = self.ctx.task(task).tier;
        let job = self.ctx.task(task).job_id;
        debug!("t={} requeue job {job}: tier {from} -> {to}", self.ctx.now);
        SchedCoreEvent::Requeued { job, from, to }
    }

    /// True once no task is queued or waiting to be put back.
    pub fn is_drained(&self) -> bool {
        self.ctx.current.is_none() && self.ctx.all_dsqs_empty()
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
