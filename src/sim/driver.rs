use log::info;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use super::job::{CompletedJob, Job, JobId};
use super::metrics::Averages;
use crate::{
    core::{SchedCore, SchedCoreEvent, TaskId, TickDelta, Ticks, Timeline},
    error::SimError,
    scheduler::Scheduler,
};

/// When jobs enter the tier set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Admission {
    /// Every job is classified and queued before the first dispatch, in input
    /// order. Arrival times only feed the metrics.
    #[default]
    Upfront,
    /// A job is queued once the clock reaches its arrival time.
    OnArrival,
}

/// Output of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// In completion order.
    pub completed: Vec<CompletedJob>,
    pub timeline: Timeline,
}

impl Schedule {
    pub fn averages(&self) -> Option<Averages> {
        Averages::of(&self.completed)
    }

    pub fn completed_job(&self, id: JobId) -> Option<&CompletedJob> {
        self.completed.iter().find(|c| c.job.id == id)
    }
}

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    jobs: Vec<Job>,
    admission: Admission,
    job_cursor: usize,
    // TaskId --> jobs[index]; used to finalize completed tasks
    tasks_to_jobs: FxHashMap<TaskId, usize>,
    completed: Vec<CompletedJob>,
}

impl<S: Scheduler> Sim<S> {
    /// Takes its own copy of `jobs`; nothing the run does is visible to the
    /// caller's records.
    pub fn new(mut jobs: Vec<Job>, scheduler: S, admission: Admission) -> Result<Self, SimError> {
        validate(&jobs)?;
        if admission == Admission::OnArrival {
            // Stable, so jobs arriving together keep input order
            jobs.sort_by_key(|job| job.arrival_time);
        }

        Ok(Self {
            core: SchedCore::new(scheduler),
            jobs,
            admission,
            job_cursor: 0,
            tasks_to_jobs: FxHashMap::default(),
            completed: Vec::new(),
        })
    }

    pub fn step(&mut self) -> Vec<SchedCoreEvent> {
        let mut events = self.handle_arrivals();
        let dispatched = self.core.tick();

        for event in &dispatched {
            if let SchedCoreEvent::Completed { task, .. } = *event {
                self.finalize(task);
            }
        }

        events.extend(dispatched);
        events
    }

    pub fn run(mut self) -> Schedule {
        while !self.all_jobs_completed() {
            self.step();
        }

        info!(
            "{}: {} jobs completed at t={} in {} slices",
            self.core.scheduler.name(),
            self.completed.len(),
            self.core.now(),
            self.core.timeline().len()
        );

        Schedule {
            completed: self.completed,
            timeline: self.core.into_timeline(),
        }
    }

    fn handle_arrivals(&mut self) -> Vec<SchedCoreEvent> {
        let now = self.core.now();
        let admission = self.admission;
        let arriving = self.jobs[self.job_cursor..]
            .iter()
            .take_while(|job| admission == Admission::Upfront || job.arrival_time <= now)
            .count();

        let mut events = Vec::with_capacity(arriving);
        for index in self.job_cursor..self.job_cursor + arriving {
            let (task, event) = self.core.admit(&self.jobs[index]);
            self.tasks_to_jobs.insert(task, index);
            events.push(event);
        }
        self.job_cursor += arriving;
        events
    }

    fn finalize(&mut self, task_id: TaskId) {
        let job_index = *self
            .tasks_to_jobs
            .get(&task_id)
            .expect("Completed task missing associated job");

        let task = self.core.ctx.task(task_id);
        let completed = CompletedJob::finalize(self.jobs[job_index].clone(), task);
        self.completed.push(completed);
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.completed.len() == self.jobs.len()
    }

    pub fn completed(&self) -> &[CompletedJob] {
        &self.completed
    }

    pub fn timeline(&self) -> &Timeline {
        self.core.timeline()
    }
}

fn validate(jobs: &[Job]) -> Result<(), SimError> {
    let mut seen = FxHashSet::default();
    let mut total_burst: Ticks = 0;
    let mut latest_arrival: Ticks = 0;
    for job in jobs {
        if job.burst_time == 0 {
            return Err(SimError::ZeroBurst(job.id));
        }
        if !seen.insert(job.id) {
            return Err(SimError::DuplicateJob(job.id));
        }
        total_burst = total_burst
            .checked_add(job.burst_time)
            .ok_or(SimError::HorizonOverflow)?;
        latest_arrival = latest_arrival.max(job.arrival_time);
    }

    // No completion can land past the latest arrival plus all the work, and
    // every clock value must stay representable as a signed metric
    let horizon = latest_arrival
        .checked_add(total_burst)
        .ok_or(SimError::HorizonOverflow)?;
    if horizon > TickDelta::MAX as Ticks {
        return Err(SimError::HorizonOverflow);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{MlfqScheduler, MlqScheduler};

    #[test]
    fn rejects_zero_burst_before_running() {
        let jobs = vec![Job::new(1, 0, 3, 0), Job::new(2, 0, 0, 0)];
        let sim = Sim::new(jobs, MlqScheduler::with_quantum(2).unwrap(), Admission::Upfront);
        assert!(matches!(sim, Err(SimError::ZeroBurst(2))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let jobs = vec![Job::new(7, 0, 3, 0), Job::new(7, 1, 2, 0)];
        let sim = Sim::new(jobs, MlfqScheduler::new(3, 2).unwrap(), Admission::Upfront);
        assert!(matches!(sim, Err(SimError::DuplicateJob(7))));
    }

    #[test]
    fn rejects_bursts_that_overflow_the_clock() {
        let jobs = vec![Job::new(1, 0, u64::MAX, 0), Job::new(2, 0, 2, 0)];
        let sim = Sim::new(jobs, MlqScheduler::with_quantum(2).unwrap(), Admission::Upfront);
        assert!(matches!(sim, Err(SimError::HorizonOverflow)));

        // Fits in u64 but not in a signed metric
        let jobs = vec![Job::new(1, 0, i64::MAX as u64, 0), Job::new(2, 0, 1, 0)];
        let sim = Sim::new(jobs, MlfqScheduler::new(3, 2).unwrap(), Admission::Upfront);
        assert!(matches!(sim, Err(SimError::HorizonOverflow)));
    }

    #[test]
    fn rejects_arrival_near_the_end_of_the_clock() {
        let jobs = vec![Job::new(1, i64::MAX as u64 - 1, 2, 0)];
        let sim = Sim::new(jobs, MlqScheduler::with_quantum(2).unwrap(), Admission::OnArrival);
        assert!(matches!(sim, Err(SimError::HorizonOverflow)));

        let jobs = vec![Job::new(1, i64::MAX as u64 - 2, 2, 0)];
        let sim = Sim::new(jobs, MlqScheduler::with_quantum(2).unwrap(), Admission::Upfront);
        let schedule = sim.unwrap().run();
        let done = schedule.completed_job(1).unwrap();
        // Dispatched before arrival under upfront admission
        assert_eq!(done.response_time, -(i64::MAX - 2));
        assert_eq!(done.waiting_time, -(i64::MAX - 2));
    }

    #[test]
    fn completions_track_their_own_job() {
        // Unit bursts on a single FCFS tier complete in input order
        let jobs: Vec<_> = (0..2_000).map(|id| Job::new(id, id, 1, 0)).collect();
        let mut sim =
            Sim::new(jobs, MlfqScheduler::new(1, 1).unwrap(), Admission::Upfront).unwrap();

        let mut finished = Vec::new();
        while !sim.all_jobs_completed() {
            for event in sim.step() {
                if let SchedCoreEvent::Completed { job, task, at } = event {
                    finished.push((job, task, at));
                }
            }
        }

        assert_eq!(finished.len(), 2_000);
        for (index, &(job, task, at)) in finished.iter().enumerate() {
            assert_eq!(job, index as u64);
            assert_eq!(task, index);
            assert_eq!(at, index as u64 + 1);
            let done = &sim.completed()[index];
            assert_eq!(done.job.id, job);
            assert_eq!(done.completion_time, at);
            assert_eq!(done.waiting_time, 0);
        }
    }

    #[test]
    fn empty_input_is_an_empty_schedule() {
        let sim = Sim::new(Vec::new(), MlfqScheduler::new(3, 2).unwrap(), Admission::Upfront)
            .unwrap();
        let schedule = sim.run();
        assert!(schedule.completed.is_empty());
        assert!(schedule.timeline.is_empty());
        assert_eq!(schedule.averages(), None);
    }

    #[test]
    fn upfront_admits_everything_on_first_step() {
        let jobs = vec![Job::new(1, 0, 2, 5), Job::new(2, 50, 2, 0)];
        let mut sim =
            Sim::new(jobs, MlqScheduler::with_quantum(2).unwrap(), Admission::Upfront).unwrap();
        let events = sim.step();

        assert_eq!(
            &events[..3],
            &[
                SchedCoreEvent::Admitted { job: 1, tier: 2 },
                SchedCoreEvent::Admitted { job: 2, tier: 0 },
                SchedCoreEvent::Dispatched {
                    job: 2,
                    tier: 0,
                    start: 0,
                    end: 2
                },
            ]
        );
    }

    #[test]
    fn on_arrival_idles_until_first_job() {
        let jobs = vec![Job::new(1, 3, 2, 0)];
        let mut sim =
            Sim::new(jobs, MlqScheduler::with_quantum(2).unwrap(), Admission::OnArrival).unwrap();

        for at in 1..=3 {
            assert_eq!(sim.step(), vec![SchedCoreEvent::Idle { at }]);
        }
        let events = sim.step();
        assert_eq!(events[0], SchedCoreEvent::Admitted { job: 1, tier: 0 });
        assert!(sim.all_jobs_completed());

        let done = &sim.completed()[0];
        assert_eq!(done.completion_time, 5);
        assert_eq!(done.response_time, 0);
        assert_eq!(done.waiting_time, 0);
    }

    #[test]
    fn arrivals_are_queued_ahead_of_the_preempted_job() {
        // Job 2 arrives while job 1 is running and must be served first
        let jobs = vec![Job::new(1, 0, 4, 0), Job::new(2, 1, 1, 0)];
        let sim =
            Sim::new(jobs, MlqScheduler::with_quantum(2).unwrap(), Admission::OnArrival).unwrap();
        let schedule = sim.run();

        let order: Vec<_> = schedule.timeline.iter().map(|s| s.job).collect();
        assert_eq!(order, vec![1, 2, 1]);
    }
}
