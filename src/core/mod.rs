pub mod driver;
pub mod event;
pub mod observer;
pub mod state;
pub mod timeline;

pub use driver::SchedCore;
pub use event::SchedCoreEvent;
pub use state::{Dsq, DsqId, KernelCtx, Task, TaskId, TaskState, TickDelta, Ticks, Tier};
pub use timeline::{Slice, Timeline};
