use average::{Estimate, Mean};

use super::job::CompletedJob;

/// Mean turnaround, waiting and response time over a set of completed jobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Averages {
    pub turnaround: f64,
    pub waiting: f64,
    pub response: f64,
}

impl Averages {
    /// `None` for an empty set, where no mean exists.
    pub fn of(completed: &[CompletedJob]) -> Option<Self> {
        if completed.is_empty() {
            return None;
        }

        Some(Self {
            turnaround: avg(completed.iter().map(|j| j.turnaround_time as f64)),
            waiting: avg(completed.iter().map(|j| j.waiting_time as f64)),
            response: avg(completed.iter().map(|j| j.response_time as f64)),
        })
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}
