pub mod driver;
pub mod job;
pub mod metrics;

pub use driver::{Admission, Schedule, Sim};
pub use job::{CompletedJob, Job, JobId};
pub use metrics::Averages;
