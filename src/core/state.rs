use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

use crate::sim::{Job, JobId};

// Index into Task Vec
pub type TaskId = usize;
pub type Tier = usize;
pub type Ticks = u64;
// Signed difference of two clock values; metrics of a job dispatched
// before its arrival come out negative.
pub type TickDelta = i64;
new_key_type! {
    pub struct DsqId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Queued,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub job_id: JobId,
    pub state: TaskState,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub priority: i64,
    pub remaining: Ticks,
    pub tier: Tier,
    pub first_dispatch: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

/// A FIFO ready queue backing one tier.
#[derive(Debug, Default)]
pub struct Dsq {
    tasks: VecDeque<TaskId>,
}

impl Dsq {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }
}

#[derive(Debug)]
pub struct KernelCtx {
    pub now: Ticks,
    // Task that ran the last slice and still has work left. It is put back on
    // a tier at the start of the next dispatch.
    pub current: Option<TaskId>,
    pub tasks: Vec<Task>,
    pub dsqs: SlotMap<DsqId, Dsq>,
    pub task_to_dsq: FxHashMap<TaskId, DsqId>,
    // Tier index --> DSQ, tier 0 first
    pub tier_dsq_ids: Vec<DsqId>,
}

impl KernelCtx {
    pub fn new(num_tiers: usize) -> Self {
        let mut dsqs = SlotMap::with_capacity_and_key(num_tiers);
        let tier_dsq_ids = (0..num_tiers).map(|_| dsqs.insert(Dsq::new())).collect();

        Self {
            now: 0,
            current: None,
            tasks: Vec::new(),
            dsqs,
            task_to_dsq: FxHashMap::default(),
            tier_dsq_ids,
        }
    }

    pub fn create_task(&mut self, job: &Job) -> TaskId {
        let id = self.tasks.len();
        self.tasks.push(Task {
            id,
            job_id: job.id,
            state: TaskState::Queued,
            arrival_time: job.arrival_time,
            burst_time: job.burst_time,
            priority: job.priority,
            remaining: job.burst_time,
            tier: 0,
            first_dispatch: None,
            completion_time: None,
        });
        id
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn num_tiers(&self) -> usize {
        self.tier_dsq_ids.len()
    }

    pub fn tier_dsq(&self, tier: Tier) -> DsqId {
        self.tier_dsq_ids[tier]
    }

    pub fn tier_len(&self, tier: Tier) -> usize {
        self.dsqs.get(self.tier_dsq(tier)).map_or(0, Dsq::len)
    }

    pub fn dsq_push_back(&mut self, tier: Tier, task_id: TaskId) {
        assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Task {task_id} already present in some DSQ"
        );
        assert!(tier < self.num_tiers(), "Tier {tier} out of range");

        let task = self.task_mut(task_id);
        debug_assert!(
            task.state != TaskState::Completed && task.remaining > 0,
            "Task {task_id} has no work left and must not be enqueued"
        );
        task.state = TaskState::Queued;
        task.tier = tier;

        let dsq_id = self.tier_dsq(tier);
        let dsq = self.dsqs.get_mut(dsq_id).expect("Unknown DSQ");
        dsq.tasks.push_back(task_id);
        self.task_to_dsq.insert(task_id, dsq_id);
    }

    /// Pops the head of the highest-priority non-empty tier.
    pub fn dsq_pop_first(&mut self) -> Option<(Tier, TaskId)> {
        let tier = (0..self.num_tiers()).find(|&tier| self.tier_len(tier) > 0)?;
        let dsq = self.dsqs.get_mut(self.tier_dsq_ids[tier])?;
        let task = dsq.tasks.pop_front()?;

        let removed = self.task_to_dsq.remove(&task);
        debug_assert!(removed.is_some(), "Task {task} missing DSQ membership");

        Some((tier, task))
    }

    pub fn all_dsqs_empty(&self) -> bool {
        self.task_to_dsq.is_empty()
    }

    pub fn task(&self, task_id: TaskId) -> &Task {
        &self.tasks[task_id]
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> &mut Task {
        &mut self.tasks[task_id]
    }

    pub fn set_running(&mut self, task_id: TaskId) {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Running task {task_id} must not be enqueued"
        );
        debug_assert!(self.current.is_none(), "CPU already holds a task");

        let now = self.now;
        let task = self.task_mut(task_id);
        task.state = TaskState::Running;
        task.first_dispatch.get_or_insert(now);
    }

    // Runs `task_id` for `slice` ticks and returns the remaining work
    pub fn run_slice(&mut self, task_id: TaskId, slice: Ticks) -> Ticks {
        let task = self.task_mut(task_id);
        debug_assert_eq!(task.state, TaskState::Running);
        debug_assert!(slice > 0 && slice <= task.remaining);
        task.remaining -= slice;
        let remaining = task.remaining;
        self.advance_time(slice);
        remaining
    }

    pub fn mark_completed(&mut self, task_id: TaskId) {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Completing task {task_id} that is still enqueued"
        );

        let now = self.now;
        let task = &mut self.tasks[task_id];
        debug_assert!(
            task.state == TaskState::Running,
            "Task {task_id} must have been running before marked complete"
        );
        debug_assert_eq!(task.remaining, 0);

        task.state = TaskState::Completed;
        task.completion_time = Some(now);
    }

    pub fn take_current(&mut self) -> Option<TaskId> {
        self.current.take()
    }
}
