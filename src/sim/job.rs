use serde::Deserialize;

use crate::core::state::{Task, TickDelta, Ticks, Tier};

pub type JobId = u64;

/// Caller-supplied description of a process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(default)]
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    // Lower is more urgent. Only MLQ looks at it.
    #[serde(default)]
    pub priority: i64,
}

impl Job {
    pub fn new(id: JobId, arrival_time: Ticks, burst_time: Ticks, priority: i64) -> Self {
        Self {
            id,
            arrival_time,
            burst_time,
            priority,
        }
    }
}

/// A job that ran to completion, with its finalized metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedJob {
    pub job: Job,
    /// Tier the job finished on.
    pub queue_level: Tier,
    pub completion_time: Ticks,
    pub turnaround_time: TickDelta,
    pub waiting_time: TickDelta,
    pub response_time: TickDelta,
}

impl CompletedJob {
    pub(crate) fn finalize(job: Job, task: &Task) -> Self {
        let completion_time = task
            .completion_time
            .expect("Finalizing a task that has not completed");
        let first_dispatch = task
            .first_dispatch
            .expect("Completed task was never dispatched");

        let turnaround_time = delta(completion_time, job.arrival_time);
        let waiting_time = turnaround_time - job.burst_time as TickDelta;
        let response_time = delta(first_dispatch, job.arrival_time);

        Self {
            job,
            queue_level: task.tier,
            completion_time,
            turnaround_time,
            waiting_time,
            response_time,
        }
    }
}

// Lossless: `Sim::new` rejects workloads whose horizon exceeds `TickDelta::MAX`
fn delta(to: Ticks, from: Ticks) -> TickDelta {
    to as TickDelta - from as TickDelta
}
